//! Deployment target resolution from the `--target` and `--prod` flags.

use std::fmt;

use regex::Regex;

use crate::{output::Output, DeployError, Result};

pub const PRODUCTION: &str = "production";
pub const STAGING: &str = "staging";

lazy_static! {
    static ref TARGET_NAME: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap();
}

const PRODUCTION_TARGET_DEPRECATED: &str =
    "We recommend using the much shorter `--prod` option instead of `--target production` (deprecated)";

/// Environment a deployment is directed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Production,
    Staging,
    /// User defined environment, name kept as given
    Custom(String),
}

impl Target {
    pub fn as_str(&self) -> &str {
        match self {
            Target::Production => PRODUCTION,
            Target::Staging => STAGING,
            Target::Custom(name) => name.as_str(),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        match name {
            PRODUCTION => Target::Production,
            STAGING => Target::Staging,
            _ => Target::Custom(name.into()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the deployment target selected by the command line.
///
/// An explicit `target` always wins over `prod`. `prod` set to `true` selects
/// production, `false` selects nothing. Empty `target` strings count as not
/// given. Using `--target production` emits a deprecation warning to `output`;
/// the returned value never depends on `output`.
///
/// ```
/// use deploy_target::{resolve_target, RecordingOutput, Target};
///
/// let mut output = RecordingOutput::default();
/// assert_eq!(
///     resolve_target(&mut output, Some("staging"), Some(true)),
///     Some(Target::Staging)
/// );
/// assert!(output.calls().is_empty());
/// ```
pub fn resolve_target(
    output: &mut dyn Output,
    target: Option<&str>,
    prod: Option<bool>,
) -> Option<Target> {
    let Some(name) = target.filter(|t| !t.is_empty()) else {
        return match prod {
            Some(true) => {
                log::debug!("Setting target to {} (--prod)", PRODUCTION);
                Some(Target::Production)
            }
            _ => {
                log::debug!("No target selected");
                None
            }
        };
    };

    if name == PRODUCTION {
        output.warn(PRODUCTION_TARGET_DEPRECATED);
    }
    log::debug!("Setting target to {}", name);
    Some(Target::from(name))
}

/// Checks that a target can be used as an environment name.
///
/// `production` and `staging` are always valid. Custom names must start with
/// an ascii letter or digit and contain only letters, digits, `-` and `_`.
pub fn validate_target(target: &Target) -> Result<()> {
    let Target::Custom(name) = target else {
        return Ok(());
    };
    if TARGET_NAME.is_match(name) {
        Ok(())
    } else {
        Err(DeployError::InvalidTargetName(name.clone()))
    }
}
