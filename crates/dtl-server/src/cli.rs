use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `dtl` binary.
#[derive(Debug, Parser)]
#[command(name = "dtl", version, about = "Digital Twin Legislation authoring API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP API.
    Serve(ServeArgs),
    /// Apply the schema and create the default user, then exit.
    InitDb(InitDbArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`
    #[arg(long)]
    pub bind: Option<String>,

    /// Database path or URL, overriding `database.url`
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Debug, Args)]
pub struct InitDbArgs {
    /// Database path or URL, overriding `database.url`
    #[arg(long)]
    pub database: Option<String>,
}
