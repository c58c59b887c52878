use crate::utils::cancel_on_signal;
use clap::{value_parser, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;

/// The main Sigil CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Sigil", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }

    /// Log filter of the sigil crates merged with `RUST_LOG`
    pub fn log_filter(&self) -> String {
        let level = self.get_log_level();
        let sigil = format!("sigil={level},sigil_session={level},sigil_passkey={level},sigil_rpc={level},sigil_contracts={level},sigil_primitives={level}");
        match std::env::var("RUST_LOG") {
            Ok(val) if !val.is_empty() => format!("{val},{sigil}"),
            _ => sigil,
        }
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a passkey and bind the smart account it controls
    #[command(name = "register")]
    Register(commands::RegisterCommand),

    /// Log in with an existing passkey
    #[command(name = "login")]
    Login(commands::LoginCommand),

    /// Print the smart account of the existing passkey
    #[command(name = "address")]
    Address(commands::AddressCommand),

    /// Log in and submit a sponsored user operation
    #[command(name = "send")]
    Send(Box<commands::SendCommand>),

    /// Keep a session alive and read actions from stdin
    #[command(name = "interactive")]
    Interactive(Box<commands::InteractiveCommand>),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(cli.log_filter())).init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(async move {
        let cancel = cancel_on_signal()?;
        match cli.command {
            Commands::Register(command) => command.execute(cancel).await,
            Commands::Login(command) => command.execute(cancel).await,
            Commands::Address(command) => command.execute(cancel).await,
            Commands::Send(command) => command.execute(cancel).await,
            Commands::Interactive(command) => command.execute(cancel).await,
        }
    })
}
