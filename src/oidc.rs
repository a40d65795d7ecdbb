//! OIDC identity token lookup.
//!
//! The token is read from the `VERCEL_OIDC_TOKEN` environment variable. When
//! it is not set, the `x-vercel-oidc-token` header of the inbound request the
//! current thread is serving is used instead. Request handlers make that
//! request visible with [`with_request_context`]:
//!
//! ```
//! use deploy_target::{get_oidc_token, with_request_context, RequestContext};
//! use reqwest::header::{HeaderMap, HeaderValue};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-vercel-oidc-token", HeaderValue::from_static("a.b.c"));
//!
//! let token = with_request_context(RequestContext::new(headers), get_oidc_token);
//! # if std::env::var("VERCEL_OIDC_TOKEN").is_err() {
//! assert_eq!(token.unwrap(), "a.b.c");
//! # }
//! ```

use std::{cell::RefCell, env};

use reqwest::header::HeaderMap;

use crate::{DeployError, Result};

pub const OIDC_TOKEN_ENV: &str = "VERCEL_OIDC_TOKEN";
pub const OIDC_TOKEN_HEADER: &str = "x-vercel-oidc-token";

/// The inbound request a handler is currently serving.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
}

impl RequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

thread_local! {
    static CONTEXTS: RefCell<Vec<RequestContext>> = const { RefCell::new(Vec::new()) };
}

// Pops the context pushed by with_request_context, also when `f` panics
struct ContextGuard;

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CONTEXTS.with(|contexts| {
            contexts.borrow_mut().pop();
        });
    }
}

/// Runs `f` with `context` as the ambient request context of this thread.
///
/// Calls nest: the innermost context is the one [`get_oidc_token`] sees.
pub fn with_request_context<F, T>(context: RequestContext, f: F) -> T
where
    F: FnOnce() -> T,
{
    CONTEXTS.with(|contexts| contexts.borrow_mut().push(context));
    let _guard = ContextGuard;
    f()
}

/// Returns the OIDC token from the environment or the ambient request context.
pub fn get_oidc_token() -> Result<String> {
    CONTEXTS.with(|contexts| get_oidc_token_from(contexts.borrow().last()))
}

/// Like [`get_oidc_token`] but with an explicit request context.
pub fn get_oidc_token_from(context: Option<&RequestContext>) -> Result<String> {
    if let Some(token) = token_from_env() {
        return Ok(token);
    }
    context
        .and_then(token_from_headers)
        .ok_or(DeployError::MissingToken)
}

fn token_from_env() -> Option<String> {
    match env::var(OIDC_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => {
            log::debug!("OIDC: Token found in {}", OIDC_TOKEN_ENV);
            Some(token)
        }
        _ => {
            log::debug!("OIDC: {} is not set", OIDC_TOKEN_ENV);
            None
        }
    }
}

fn token_from_headers(context: &RequestContext) -> Option<String> {
    let Some(value) = context.headers.get(OIDC_TOKEN_HEADER) else {
        log::debug!("OIDC: Request has no {} header", OIDC_TOKEN_HEADER);
        return None;
    };
    match value.to_str() {
        Ok(token) if !token.is_empty() => {
            log::debug!("OIDC: Token found in {} header", OIDC_TOKEN_HEADER);
            Some(token.into())
        }
        Ok(_) => {
            log::debug!("OIDC: {} header is empty", OIDC_TOKEN_HEADER);
            None
        }
        Err(_) => {
            log::debug!("OIDC: {} header is not valid text", OIDC_TOKEN_HEADER);
            None
        }
    }
}
