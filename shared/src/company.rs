//! Company context: company, signed-in account and product catalog.

use crate::state::StateCell;
use crate::{Account, Branch, Company, CompanyProfile, Product};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyState {
    company: Option<Company>,
    account: Option<Account>,
    catalog: Vec<Product>,
}

/// Company context handle.
#[derive(Clone, Copy)]
pub struct CompanyStore<C> {
    cell: C,
}

impl<C: StateCell<CompanyState>> CompanyStore<C> {
    pub fn new(cell: C) -> Self {
        Self { cell }
    }

    pub fn company(&self) -> Option<Company> {
        self.cell.with(|s| s.company.clone())
    }

    pub fn account(&self) -> Option<Account> {
        self.cell.with(|s| s.account.clone())
    }

    pub fn catalog(&self) -> Vec<Product> {
        self.cell.with(|s| s.catalog.clone())
    }

    pub fn branches(&self) -> Vec<Branch> {
        self.cell
            .with(|s| s.company.as_ref().map(|c| c.branches.clone()))
            .unwrap_or_default()
    }

    pub fn branch(&self, branch_id: &str) -> Option<Branch> {
        self.cell.with(|s| {
            s.company
                .as_ref()
                .and_then(|c| c.branches.iter().find(|b| b.id == branch_id).cloned())
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.with(|s| s.company.is_some())
    }

    pub fn set_company(&self, company: Option<Company>) {
        self.cell.update(|s| s.company = company);
    }

    pub fn set_account(&self, account: Option<Account>) {
        self.cell.update(|s| s.account = account);
    }

    pub fn set_catalog(&self, catalog: Vec<Product>) {
        self.cell.update(|s| s.catalog = catalog);
    }

    /// Publishes a whole `GET /api/company` response.
    ///
    /// Three independent setters; no atomicity is implied.
    pub fn apply_profile(&self, profile: CompanyProfile) {
        let CompanyProfile {
            company,
            account,
            catalog,
        } = profile;
        self.set_company(Some(company));
        self.set_account(Some(account));
        self.set_catalog(catalog);
    }
}
