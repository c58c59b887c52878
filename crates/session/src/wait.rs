use crate::{
    error::{SessionError, SessionResult},
    traits::Bundler,
};
use sigil_primitives::{
    constants::session::{INCLUSION_TIMEOUT, POLL_INTERVAL},
    UserOperationHash, UserOperationReceipt,
};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// How long and how often the receipt of a submitted user operation is polled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(INCLUSION_TIMEOUT),
            poll_interval: Duration::from_millis(POLL_INTERVAL),
        }
    }
}

/// Shortest interval between receipt queries
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls the receipt of `hash` until it shows up, bounded by the timeout and `cancel`
///
/// A zero poll interval is raised to one millisecond.
pub async fn wait_for_receipt<B: Bundler + ?Sized>(
    bundler: &B,
    hash: UserOperationHash,
    config: &WaitConfig,
    cancel: &CancellationToken,
) -> SessionResult<UserOperationReceipt> {
    let poll = async {
        let mut ticker = interval(config.poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Some(receipt) = bundler.get_user_operation_receipt(&hash).await? {
                debug!("User operation {hash} included in {:?}", receipt.tx_receipt.block_number);
                return Ok(receipt);
            }
            trace!("User operation {hash} not included yet");
        }
    };

    tokio::select! {
        _ = cancel.cancelled() => Err(SessionError::Cancelled { hash }),
        res = timeout(config.timeout, poll) => match res {
            Ok(res) => res,
            Err(_) => Err(SessionError::InclusionTimeout { hash, timeout: config.timeout }),
        },
    }
}
