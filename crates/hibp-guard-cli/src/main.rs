//! hibp-guard binary entry point.

use std::process::ExitCode;

use hibp_guard_cli::error::{CliError, ErrorCategory, exit_code_from_error};

#[tokio::main]
async fn main() -> ExitCode {
    match hibp_guard_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let breached = err
                .downcast_ref::<CliError>()
                .is_some_and(|e| e.category == ErrorCategory::Breached);
            if !breached {
                eprintln!("Error: {err}");
            }
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
