//! LocalStorage wrapper
//!
//! Only convenience values live here. The password and the session token
//! are never stored.

/// Email or phone of the last successful login, to prefill the form.
pub const LAST_MEDIUM_KEY: &str = "baiclass.last_medium";
/// Branch picked on `/select-branch`.
pub const ACTIVE_BRANCH_KEY: &str = "baiclass.active_branch";

/// Static access to `window.localStorage`.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// `None` when the key is absent or storage is unavailable.
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }
}
