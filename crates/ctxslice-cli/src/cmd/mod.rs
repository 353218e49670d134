use anyhow::Result;

use crate::args::{Cli, Command};

mod prompt;
mod record;
mod slice;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Record {
            scenario,
            config,
            run_args,
        } => {
            record::run(
                &cli.project_root,
                &scenario,
                config.as_deref(),
                run_args.as_deref(),
            )
            .await
        }
        Command::Slice => slice::run(&cli.project_root),
        Command::Prompt { task } => prompt::run(&cli.project_root, &task),
    }
}
