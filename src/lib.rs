//! `deploy-target` holds the small value-resolution pieces of a deployment CLI:
//! picking the deployment target from command line flags and finding the
//! OIDC identity token of the current deployment.
//!
//! ```
//! use deploy_target::{resolve_target, RecordingOutput, Target};
//!
//! let mut output = RecordingOutput::default();
//! let target = resolve_target(&mut output, None, Some(true));
//! assert_eq!(target, Some(Target::Production));
//! ```
//!
//! # Target precedence
//!
//! * `--target <NAME>` wins whenever it is given
//! * `--prod` selects `production`
//! * otherwise no target is selected
//!
//! `--target production` still works but emits a deprecation warning
//! recommending `--prod`.
//!
//! # OIDC token
//!
//! [`get_oidc_token`] returns `VERCEL_OIDC_TOKEN` when set, otherwise the
//! `x-vercel-oidc-token` header of the request installed with
//! [`with_request_context`].

use std::fmt;

#[macro_use]
extern crate lazy_static;

pub mod oidc;
pub mod output;
pub mod target;

pub use oidc::{get_oidc_token, get_oidc_token_from, with_request_context, RequestContext};
pub use output::{Diagnostic, LogOutput, Output, RecordingOutput, StderrOutput};
pub use target::{resolve_target, validate_target, Target};

pub type Result<T> = std::result::Result<T, DeployError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DeployError {
    /// Custom target name is not usable as an environment name
    InvalidTargetName(String),
    /// Neither the environment nor the request context provided an OIDC token
    MissingToken,
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeployError::InvalidTargetName(name) => write!(
                f,
                "The specified target \"{}\" is not valid: use letters, digits, '-' and '_'",
                name
            ),
            DeployError::MissingToken => write!(
                f,
                "The '{}' header is missing from the request. Do you have the OIDC \
                option enabled in the Vercel project settings?",
                oidc::OIDC_TOKEN_HEADER
            ),
        }
    }
}

impl std::error::Error for DeployError {}
