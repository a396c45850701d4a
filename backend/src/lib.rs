use worker::*;

pub mod auth;
pub mod error;
pub mod logic;
pub mod proxy;

pub(crate) mod utils {
    pub mod request;
}

use auth::{LoginAction, LoginError};
use baiclass_shared::protocol::{HttpMethod, LoginRequest};
use baiclass_shared::{SessionToken, SystemClock};
use error::{ErrorResponse, PosError};
use logic::{LoginReply, RequestPlan};
use proxy::ApiProxy;
use utils::request::{WorkerHttpClient, from_worker_method};

// =========================================================
// Constants
// =========================================================
const DEFAULT_LOGIN_PATH: &str = "/auth/login";
const DEFAULT_ASSETS_BINDING: &str = "ASSETS";

// =========================================================
// Macros (logging)
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info { ($($t:tt)*) => (worker::console_log!($($t)*)) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info { ($($t:tt)*) => (println!($($t)*)) }

#[cfg(target_arch = "wasm32")]
macro_rules! log_error { ($($t:tt)*) => (worker::console_error!($($t)*)) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error { ($($t:tt)*) => (eprintln!($($t)*)) }

/// Maps a [`PosError`] onto a JSON error response. 5xx details stay in the log.
fn map_error_to_response(e: PosError) -> Result<Response> {
    let status = e.status_code();
    if e.is_server_error() {
        log_error!("Internal Error [{}]: {}", e.error_code(), e);
    }
    Ok(Response::from_json(&ErrorResponse::from(&e))?.with_status(status))
}

// =========================================================
// Runtime configuration
// =========================================================

struct RuntimeConfig {
    api_base_url: Option<String>,
    login_path: String,
    assets_binding: String,
}

impl RuntimeConfig {
    fn new(env: &Env) -> Self {
        Self {
            api_base_url: env
                .var("API_BASE_URL")
                .map(|v| v.to_string())
                .ok()
                .filter(|v| !v.trim().is_empty()),
            login_path: env
                .var("LOGIN_PATH")
                .map(|v| v.to_string())
                .unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
            assets_binding: env
                .var("ASSETS_BINDING")
                .map(|v| v.to_string())
                .unwrap_or_else(|_| DEFAULT_ASSETS_BINDING.to_string()),
        }
    }

    fn api_base_url(&self) -> error::Result<&str> {
        self.api_base_url
            .as_deref()
            .ok_or_else(|| PosError::config("API_BASE_URL is not set").in_op("config"))
    }
}

// =========================================================
// Handlers
// =========================================================

async fn login(mut req: Request, cfg: &RuntimeConfig) -> Result<Response> {
    let api_base_url = match cfg.api_base_url() {
        Ok(v) => v,
        Err(e) => return map_error_to_response(e),
    };

    let outcome = match req.json::<LoginRequest>().await {
        Ok(credentials) => {
            let client = WorkerHttpClient;
            LoginAction::new(&client, api_base_url, &cfg.login_path)
                .login(&credentials)
                .await
        }
        Err(_) => Err(LoginError::InvalidInput),
    };

    match &outcome {
        Ok(_) => log_info!("Login succeeded"),
        Err(e @ (LoginError::Unreachable | LoginError::MalformedResponse)) => {
            log_error!("Login failed: {}", e)
        }
        Err(e) => log_info!("Login failed: {}", e),
    }

    // The form always reads the outcome body; the status is informational.
    let reply = LoginReply::new(outcome, &SystemClock);
    let mut resp = Response::from_json(&reply.outcome)?.with_status(reply.status);
    if let Some(cookie) = reply.set_cookie {
        resp.headers_mut().set("Set-Cookie", &cookie)?;
    }
    Ok(resp)
}

async fn forward_api(
    mut req: Request,
    method: HttpMethod,
    upstream_path: &str,
    token: &SessionToken,
    cfg: &RuntimeConfig,
) -> Result<Response> {
    let api_base_url = match cfg.api_base_url() {
        Ok(v) => v,
        Err(e) => return map_error_to_response(e),
    };

    let content_type = req.headers().get("Content-Type")?;
    let body = if method.has_body() {
        Some(req.text().await?)
    } else {
        None
    };

    let client = WorkerHttpClient;
    let result = ApiProxy::new(&client, api_base_url)
        .forward(method, upstream_path, token, content_type.as_deref(), body)
        .await;

    match result {
        Ok(upstream) => {
            if upstream.status >= 500 {
                log_error!(
                    "POS API answered {} for {} {}",
                    upstream.status,
                    method.as_str(),
                    upstream_path
                );
            }
            let mut resp = Response::ok(upstream.body)?.with_status(upstream.status);
            if let Some(ct) = upstream.content_type {
                resp.headers_mut().set("Content-Type", &ct)?;
            }
            if let Some(cookie) = logic::proxy_set_cookie(upstream.status) {
                log_info!("POS API rejected the session, expiring cookie");
                resp.headers_mut().set("Set-Cookie", &cookie)?;
            }
            Ok(resp)
        }
        Err(e) => map_error_to_response(e),
    }
}

async fn serve_assets(req: Request, env: &Env, cfg: &RuntimeConfig) -> Result<Response> {
    env.assets(&cfg.assets_binding)?.fetch_request(req).await
}

// =========================================================
// Entry Points
// =========================================================

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let cfg = RuntimeConfig::new(&env);
    let url = req.url()?;
    let token = SessionToken::from_cookie_header(req.headers().get("Cookie")?.as_deref());
    let method = from_worker_method(&req.method());

    match logic::plan(method, url.path(), url.query(), token.as_ref()) {
        RequestPlan::Redirect { location, status } => {
            log_info!("Redirect {} -> {}", url.path(), location);
            let target = url
                .join(&location)
                .map_err(|e| Error::RustError(e.to_string()))?;
            Response::redirect_with_status(target, status)
        }
        RequestPlan::Login => login(req, &cfg).await,
        RequestPlan::Proxy {
            method,
            upstream_path,
        } => match token {
            Some(token) => forward_api(req, method, &upstream_path, &token, &cfg).await,
            None => map_error_to_response(PosError::unauthorized("No session")),
        },
        RequestPlan::Unauthorized => map_error_to_response(PosError::unauthorized("No session")),
        RequestPlan::MethodNotAllowed => map_error_to_response(PosError::method_not_allowed(
            format!("{:?} is not supported on {}", req.method(), url.path()),
        )),
        RequestPlan::Page(route) => {
            log_info!("Serving page {}", route);
            serve_assets(req, &env, &cfg).await
        }
        RequestPlan::Asset => serve_assets(req, &env, &cfg).await,
    }
}
