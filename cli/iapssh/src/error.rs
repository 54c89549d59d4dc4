//! Error handling and display for the CLI.

use colored::Colorize;
use iapssh_gce::GceError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("gcloud not found on PATH")]
    GcloudNotFound,

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("could not determine login name")]
    NoLoginName,
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::GcloudNotFound => {
                eprintln!(
                    "\n{}",
                    "Hint: install the Google Cloud CLI (https://cloud.google.com/sdk/docs/install)."
                        .yellow()
                );
            }
            CliError::NoLoginName => {
                eprintln!("\n{}", "Hint: pass -u/--user explicitly.".yellow());
            }
            _ => {}
        }
    }

    if let Some(gce_err) = err.downcast_ref::<GceError>() {
        match gce_err {
            GceError::TokenExchange { .. } | GceError::InvalidKey(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: check the service account key GOOGLE_APPLICATION_CREDENTIALS points at."
                        .yellow()
                );
            }
            GceError::Http(_) => {
                eprintln!("\n{}", "Hint: check your network connection.".yellow());
            }
            _ => {}
        }
    }
}
