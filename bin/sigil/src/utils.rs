use dirs::home_dir;
use ethers::types::Address;
use expanded_pathbuf::ExpandedPathBuf;
use sigil_primitives::constants::{passkey::KEYSTORE_FILE, session::DATA_DIR};
use std::{future::Future, str::FromStr};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Unwrap path or returns the keystore inside the data directory in home
pub fn unwrap_path_or_home(path: Option<ExpandedPathBuf>) -> eyre::Result<ExpandedPathBuf> {
    if let Some(path) = path {
        Ok(path)
    } else {
        home_dir()
            .map(|h| h.join(DATA_DIR).join(KEYSTORE_FILE))
            .ok_or_else(|| eyre::eyre!("Get Home directory error"))
            .map(ExpandedPathBuf)
    }
}

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Returns a token cancelled once:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub fn cancel_on_signal() -> eyre::Result<CancellationToken> {
    let cancel = CancellationToken::new();

    let signal = shutdown_signal()?;
    let token = cancel.clone();
    tokio::spawn(async move {
        signal.await;
        token.cancel();
    });

    Ok(cancel)
}

#[cfg(unix)]
fn shutdown_signal() -> eyre::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut stream = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received ctrl-c signal.");
            },
            _ = stream.recv() => {
                info!("Received SIGTERM signal.");
            },
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> eyre::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received ctrl-c signal.");
    })
}

/// Runs the future to completion, or fails once the token is cancelled
pub async fn until_cancelled<F, T>(cancel: &CancellationToken, fut: F) -> eyre::Result<T>
where
    F: Future<Output = eyre::Result<T>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(eyre::eyre!("Interrupted")),
        res = fut => res,
    }
}
