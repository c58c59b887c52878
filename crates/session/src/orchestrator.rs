use crate::{
    client::SubmissionClient,
    error::{SessionError, SessionResult},
    session::{Binding, Session},
    status::{explorer_link, Status},
    traits::{AccountFactory, Bundler, CredentialService, Sponsor, Validator},
    wait::WaitConfig,
};
use alloy_chains::Chain;
use ethers::types::Address;
use sigil_contracts::TargetContract;
use sigil_primitives::{
    constants::session::CHAIN_ID, UserOperationHash, UserOperationReceipt,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Settings shared by every session of an orchestrator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Chain user operations are submitted on
    pub chain: Chain,
    /// Inclusion wait settings
    pub wait: WaitConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { chain: Chain::from_id(CHAIN_ID), wait: WaitConfig::default() }
    }
}

/// Result of a user operation that was included on chain
#[derive(Clone, Debug)]
pub struct Completion {
    pub hash: UserOperationHash,
    /// Block explorer page of the user operation
    pub link: String,
    pub receipt: UserOperationReceipt,
}

/// Sequences register or login, account binding and user operation submission
pub struct Orchestrator {
    credentials: Arc<dyn CredentialService>,
    accounts: Arc<dyn AccountFactory>,
    bundler: Arc<dyn Bundler>,
    sponsor: Arc<dyn Sponsor>,
    config: SessionConfig,
}

impl Orchestrator {
    pub fn new(
        credentials: Arc<dyn CredentialService>,
        accounts: Arc<dyn AccountFactory>,
        bundler: Arc<dyn Bundler>,
        sponsor: Arc<dyn Sponsor>,
        config: SessionConfig,
    ) -> Self {
        Self { credentials, accounts, bundler, sponsor, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Creates a passkey for `identity` and binds its account to the session
    ///
    /// The session is left untouched when any step fails.
    pub async fn register(&self, session: &mut Session, identity: &str) -> SessionResult<Address> {
        info!("Registering passkey for {identity:?}");
        let validator = self.credentials.register(identity).await?;
        let binding = self.bind(validator).await?;

        let address = binding.address();
        session.bind(Some(identity.into()), binding);
        Ok(address)
    }

    /// Resolves an existing passkey and binds its account to the session
    ///
    /// The identity is only recorded, the credential is picked by the authenticator.
    pub async fn login(
        &self,
        session: &mut Session,
        identity: Option<&str>,
    ) -> SessionResult<Address> {
        info!("Logging in with passkey");
        let validator = self.credentials.resolve().await?;
        let binding = self.bind(validator).await?;

        let address = binding.address();
        session.bind(identity.map(Into::into), binding);
        Ok(address)
    }

    /// Derives the account controlled by the validator and binds a submission client to it
    pub async fn bind(&self, validator: Arc<dyn Validator>) -> SessionResult<Binding> {
        let account = self.accounts.build(validator.clone()).await?;
        let client = SubmissionClient::new(
            account,
            self.config.chain,
            self.sponsor.clone(),
            self.bundler.clone(),
        );
        Ok(Binding::new(validator, client))
    }

    /// Submits a sponsored user operation calling `function` on `target` and waits for inclusion
    ///
    /// The status reads `Sending UserOp...` from submission until the wait resolves, and then
    /// carries the explorer link of the user operation.
    pub async fn submit<S: AsRef<str>>(
        &self,
        session: &mut Session,
        target: &TargetContract,
        function: &str,
        args: &[S],
        cancel: &CancellationToken,
    ) -> SessionResult<Completion> {
        let client = session.binding().ok_or(SessionError::NotReady)?.client().clone();

        let in_flight = InFlight::start(session);
        let res = self.submit_with(&client, target, function, args, cancel).await;

        in_flight.settle(match &res {
            Ok(completion) => {
                Status::Completed { hash: completion.hash, link: completion.link.clone() }
            }
            Err(error) => {
                warn!("User operation failed: {error}");
                Status::Failed { error: error.clone() }
            }
        });
        res
    }

    async fn submit_with<S: AsRef<str>>(
        &self,
        client: &SubmissionClient,
        target: &TargetContract,
        function: &str,
        args: &[S],
        cancel: &CancellationToken,
    ) -> SessionResult<Completion> {
        let call = target.call(function, args)?;
        let hash = client.send_user_operation(&[call]).await?;
        let receipt = client.wait_for_inclusion(hash, &self.config.wait, cancel).await?;
        if !receipt.success {
            warn!("User operation {hash} was included but reverted: {}", receipt.reason);
        }

        let link = explorer_link(&hash, &client.chain());
        info!("User operation {hash} completed: {link}");
        Ok(Completion { hash, link, receipt })
    }
}

/// Marks a session in flight until the submission settles
///
/// When the submission future is dropped first, the session goes back to bound with an idle
/// status.
struct InFlight<'a> {
    session: &'a mut Session,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(session: &'a mut Session) -> Self {
        session.set_in_flight(true);
        session.set_status(Status::Sending);
        Self { session, settled: false }
    }

    fn settle(mut self, status: Status) {
        self.session.set_status(status);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.set_in_flight(false);
        if !self.settled {
            debug!("User operation submission dropped before it settled");
            self.session.set_status(Status::Idle);
        }
    }
}
