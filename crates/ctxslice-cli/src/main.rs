use std::process::ExitCode;

use clap::Parser;

mod args;
mod cmd;
mod errors;
mod output;
mod scenario;

use errors::UserError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    init_tracing(cli.verbose);
    output::init(cli.json);

    match cmd::dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::eprintln_line(&format!("Error: {}", user_message(&err)));
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Expected user mistakes exit 1; anything else is an internal failure.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    use ctxslice_core::SliceError;
    use ctxslice_orchestrator::OrchestratorError;
    use ctxslice_store::StoreError;

    if err.downcast_ref::<UserError>().is_some() {
        return 1;
    }
    if let Some(store) = err.downcast_ref::<StoreError>() {
        return match store {
            StoreError::FileNotFound(_) | StoreError::ParseFailure { .. } => 1,
            StoreError::Io(_) => 2,
        };
    }
    if let Some(core) = err.downcast_ref::<SliceError>() {
        return match core {
            SliceError::IncompatibleIrVersion { .. } => 1,
            _ => 2,
        };
    }
    if let Some(orch) = err.downcast_ref::<OrchestratorError>() {
        return match orch {
            OrchestratorError::UnsupportedLanguage
            | OrchestratorError::AdapterNotFound(_)
            | OrchestratorError::AdapterFailed { .. } => 1,
            _ => 2,
        };
    }
    2
}

/// One line, no stack traces.
fn user_message(err: &anyhow::Error) -> String {
    err.to_string().replace('\n', " ")
}
