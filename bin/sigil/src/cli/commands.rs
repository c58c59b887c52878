use super::args::{SessionArgs, TargetArgs};
use crate::{launch::launch_orchestrator, utils::until_cancelled};
use clap::Parser;
use alloy_chains::Chain;
use ethers::types::Address;
use sigil_contracts::TargetContract;
use sigil_session::{
    account_link, Action, Notice, Orchestrator, Session, SessionError, SessionHandle, Status,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Creates a passkey and prints the smart account it controls
#[derive(Debug, Parser)]
pub struct RegisterCommand {
    /// Label of the passkey (username on the passkey server)
    identity: String,

    #[clap(flatten)]
    session: SessionArgs,
}

impl RegisterCommand {
    /// Execute the command
    pub async fn execute(self, cancel: CancellationToken) -> eyre::Result<()> {
        let orchestrator = launch_orchestrator(&self.session).await?;
        let mut session = Session::new();

        let res = until_cancelled(&cancel, async {
            Ok(orchestrator.register(&mut session, &self.identity).await)
        })
        .await?;
        report(Action::Register, res, &orchestrator.config().chain)
    }
}

/// Logs in with an existing passkey and prints the smart account it controls
#[derive(Debug, Parser)]
pub struct LoginCommand {
    /// Label recorded for the session
    identity: Option<String>,

    #[clap(flatten)]
    session: SessionArgs,
}

impl LoginCommand {
    /// Execute the command
    pub async fn execute(self, cancel: CancellationToken) -> eyre::Result<()> {
        let orchestrator = launch_orchestrator(&self.session).await?;
        let mut session = Session::new();

        let res = until_cancelled(&cancel, async {
            Ok(orchestrator.login(&mut session, self.identity.as_deref()).await)
        })
        .await?;
        report(Action::Login, res, &orchestrator.config().chain)
    }
}

/// Prints the smart account of the existing passkey
#[derive(Debug, Parser)]
pub struct AddressCommand {
    #[clap(flatten)]
    session: SessionArgs,
}

impl AddressCommand {
    /// Execute the command
    pub async fn execute(self, cancel: CancellationToken) -> eyre::Result<()> {
        let orchestrator = launch_orchestrator(&self.session).await?;
        let mut session = Session::new();

        let address =
            until_cancelled(&cancel, async { Ok(orchestrator.login(&mut session, None).await?) })
                .await?;
        println!("{address:?}");
        println!("{}", account_link(&address, &orchestrator.config().chain));
        Ok(())
    }
}

/// Logs in and submits a sponsored user operation calling the target contract
#[derive(Debug, Parser)]
pub struct SendCommand {
    /// Call arguments, the account address when none are given
    args: Vec<String>,

    #[clap(flatten)]
    target: TargetArgs,

    #[clap(flatten)]
    session: SessionArgs,
}

impl SendCommand {
    /// Execute the command
    pub async fn execute(self, cancel: CancellationToken) -> eyre::Result<()> {
        let target = TargetContract::new(self.target.target, &self.target.signatures())?;
        let orchestrator = launch_orchestrator(&self.session).await?;
        let mut session = Session::new();

        let address =
            until_cancelled(&cancel, async { Ok(orchestrator.login(&mut session, None).await?) })
                .await?;
        print_account(&address, &orchestrator.config().chain);

        let args = call_args(self.args, address);
        println!("{}", Status::Sending);
        let res =
            orchestrator.submit(&mut session, &target, &self.target.function, &args, &cancel).await;
        println!("{}", session.status());
        res?;
        Ok(())
    }
}

/// Keeps a session alive and reads actions from stdin
#[derive(Debug, Parser)]
pub struct InteractiveCommand {
    #[clap(flatten)]
    target: TargetArgs,

    #[clap(flatten)]
    session: SessionArgs,
}

const HELP: &str = "Commands:
  register <identity>   create a passkey and bind its account
  login [identity]      use an existing passkey and bind its account
  send [args...]        submit a sponsored user operation (defaults to the account address)
  address               print the bound account
  status                print the last user operation status
  help                  print this message
  quit                  leave";

impl InteractiveCommand {
    /// Execute the command
    pub async fn execute(self, cancel: CancellationToken) -> eyre::Result<()> {
        let target =
            Arc::new(TargetContract::new(self.target.target, &self.target.signatures())?);
        let function = Arc::new(self.target.function.clone());
        let orchestrator: Arc<Orchestrator> = Arc::new(launch_orchestrator(&self.session).await?);
        let chain = orchestrator.config().chain;
        let handle = SessionHandle::new(orchestrator, Session::new());

        let mut status = handle.subscribe();
        tokio::spawn(async move {
            while status.changed().await.is_ok() {
                let text = status.borrow_and_update().to_string();
                if !text.is_empty() {
                    println!("{text}");
                }
            }
        });

        println!("{HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };

            let mut words = line.split_whitespace().map(String::from);
            let Some(command) = words.next() else { continue };
            let words: Vec<String> = words.collect();

            match command.as_str() {
                "register" => {
                    let Some(identity) = (!words.is_empty()).then(|| words.join(" ")) else {
                        println!("Usage: register <identity>");
                        continue;
                    };
                    let handle = handle.clone();
                    tokio::spawn(async move {
                        let res = handle.register(&identity).await;
                        print_notice(Action::Register, res, &chain);
                    });
                }
                "login" => {
                    let identity = (!words.is_empty()).then(|| words.join(" "));
                    let handle = handle.clone();
                    tokio::spawn(async move {
                        let res = handle.login(identity.as_deref()).await;
                        print_notice(Action::Login, res, &chain);
                    });
                }
                "send" => {
                    let address = match handle.address() {
                        Ok(Some(address)) => address,
                        Ok(None) => {
                            println!("{}", SessionError::NotReady);
                            continue;
                        }
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    };
                    let args = call_args(words, address);
                    let (handle, target, function, cancel) =
                        (handle.clone(), target.clone(), function.clone(), cancel.clone());
                    tokio::spawn(async move {
                        let res = handle.submit(&target, function.as_str(), &args, &cancel).await;
                        // failures after submission started are rendered from the status
                        if let Err(err @ (SessionError::NotReady | SessionError::Busy)) = res {
                            println!("{err}");
                        }
                    });
                }
                "address" => match handle.address() {
                    Ok(Some(address)) => print_account(&address, &chain),
                    Ok(None) => println!("{}", SessionError::NotReady),
                    Err(err) => println!("{err}"),
                },
                "status" => println!("{}", handle.status()),
                "help" => println!("{HELP}"),
                "quit" | "exit" => break,
                other => println!("Unknown command {other:?}, try `help`"),
            }
        }

        Ok(())
    }
}

/// Arguments of the submitted call, the account itself when none are given
fn call_args(args: Vec<String>, account: Address) -> Vec<String> {
    if args.is_empty() {
        vec![format!("{account:?}")]
    } else {
        args
    }
}

fn print_account(address: &Address, chain: &Chain) {
    println!("Account: {address:?}");
    println!("View it here: {}", account_link(address, chain));
}

fn print_notice(action: Action, res: Result<Address, SessionError>, chain: &Chain) {
    println!("{}", Notice::new(action, &res));
    if let Ok(address) = res {
        print_account(&address, chain);
    }
}

fn report(action: Action, res: Result<Address, SessionError>, chain: &Chain) -> eyre::Result<()> {
    print_notice(action, res.clone(), chain);
    res?;
    Ok(())
}
