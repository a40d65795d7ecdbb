use std::{
    io::{self, Write},
    process::exit,
};

use clap::{Parser, Subcommand};
use deploy_target::{
    get_oidc_token, resolve_target, validate_target, Output, Result, StderrOutput,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the deployment target selected by the flags
    Target {
        /// Target environment name (production, staging or a custom name)
        #[arg(long)]
        target: Option<String>,
        /// Deploy to production
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        prod: Option<bool>,
        /// Reject custom target names that are not valid environment names
        #[arg(long)]
        strict: bool,
    },
    /// Print the OIDC identity token of the current deployment
    OidcToken,
}

/// Prints the resolved target, returns the exit code.
fn print_target(
    output: &mut dyn Output,
    out: &mut dyn Write,
    target: Option<&str>,
    prod: Option<bool>,
    strict: bool,
) -> i32 {
    let line = match resolve_target(output, target, prod) {
        Some(target) => {
            if strict {
                if let Err(e) = validate_target(&target) {
                    output.error(&e.to_string());
                    return 1;
                }
            }
            target.to_string()
        }
        None => "No target".into(),
    };
    print_line(output, out, &line)
}

/// Prints the token or reports why there is none, returns the exit code.
fn print_token(output: &mut dyn Output, out: &mut dyn Write, token: Result<String>) -> i32 {
    match token {
        Ok(token) => print_line(output, out, &token),
        Err(e) => {
            output.error(&e.to_string());
            1
        }
    }
}

fn print_line(output: &mut dyn Output, out: &mut dyn Write, line: &str) -> i32 {
    match writeln!(out, "{}", line) {
        Ok(()) => 0,
        Err(e) => {
            output.error(&format!("Failed to write output: {}", e));
            1
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut output = StderrOutput;
    let mut stdout = io::stdout().lock();

    let code = match cli.command {
        Command::Target {
            target,
            prod,
            strict,
        } => print_target(&mut output, &mut stdout, target.as_deref(), prod, strict),
        Command::OidcToken => print_token(&mut output, &mut stdout, get_oidc_token()),
    };
    exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;
    use deploy_target::{DeployError, Diagnostic, RecordingOutput};

    fn parse(args: &[&str]) -> Command {
        let args = ["deploy-target"].iter().chain(args);
        Cli::try_parse_from(args).unwrap().command
    }

    fn target_command(target: Option<&str>, prod: Option<bool>) -> Command {
        Command::Target {
            target: target.map(String::from),
            prod,
            strict: false,
        }
    }

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_prod_flag() {
        assert_eq!(parse(&["target"]), target_command(None, None));
        assert_eq!(parse(&["target", "--prod"]), target_command(None, Some(true)));
        assert_eq!(
            parse(&["target", "--prod=false"]),
            target_command(None, Some(false))
        );
        assert_eq!(
            parse(&["target", "--prod", "false"]),
            target_command(None, Some(false))
        );
        assert_eq!(
            parse(&["target", "--target", "staging", "--prod"]),
            target_command(Some("staging"), Some(true))
        );
        assert_eq!(parse(&["oidc-token"]), Command::OidcToken);

        assert!(Cli::try_parse_from(["deploy-target", "target", "--prod=maybe"]).is_err());
    }

    #[test]
    fn prints_resolved_target() {
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_target(&mut output, &mut out, Some("staging"), Some(true), true);
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "staging\n");
        assert!(output.calls().is_empty());

        let mut out = Vec::new();
        let code = print_target(&mut output, &mut out, None, Some(true), false);
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "production\n");
    }

    #[test]
    fn prints_no_target() {
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_target(&mut output, &mut out, None, Some(false), false);
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "No target\n");
        assert!(output.calls().is_empty());
    }

    #[test]
    fn strict_rejects_invalid_target() {
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_target(&mut output, &mut out, Some("qa env"), None, true);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(
            output.calls(),
            &[Diagnostic::Error(
                DeployError::InvalidTargetName("qa env".into()).to_string()
            )]
        );

        // without --strict the name passes through
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_target(&mut output, &mut out, Some("qa env"), None, false);
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "qa env\n");
        assert!(output.calls().is_empty());
    }

    #[test]
    fn production_target_warns_and_prints() {
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_target(&mut output, &mut out, Some("production"), None, true);
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "production\n");
        assert_eq!(output.warnings().len(), 1);
        assert!(output.errors().is_empty());
    }

    #[test]
    fn prints_token() {
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_token(&mut output, &mut out, Ok("a.b.c".into()));
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "a.b.c\n");
        assert!(output.calls().is_empty());
    }

    #[test]
    fn missing_token_fails() {
        let mut output = RecordingOutput::default();
        let mut out = Vec::new();
        let code = print_token(&mut output, &mut out, Err(DeployError::MissingToken));
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(
            output.errors(),
            vec![DeployError::MissingToken.to_string().as_str()]
        );
    }
}
