use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "ctxslice", version, about = "Runtime-grounded context slices")]
pub struct Cli {
    /// Raise diagnostic logging to debug.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Emit JSON summaries on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Target project root (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    pub project_root: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record a scenario: run the language adapter to produce IR files.
    Record {
        /// Scenario name, e.g. "submit-order".
        scenario: String,

        /// Scenario config file (default: <project-root>/ctxslice.json).
        #[arg(long)]
        config: Option<String>,

        /// Override run arguments passed to the scenario, space-separated.
        #[arg(long = "args")]
        run_args: Option<String>,
    },

    /// Build the slice artifacts from recorded IR.
    Slice,

    /// Assemble an AI prompt from the packaged slice.
    Prompt {
        /// The task to put in front of the slice context.
        task: String,
    },
}
