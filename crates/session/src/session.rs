use crate::{client::SubmissionClient, status::Status, traits::Validator};
use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle state of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Neither registered nor logged in
    NoSession,
    /// Account and submission client are bound
    Bound,
    /// A user operation is being submitted or awaited
    InFlight,
}

/// Validator, account and submission client created by one register or login
#[derive(Clone)]
pub struct Binding {
    pub(crate) validator: Arc<dyn Validator>,
    pub(crate) client: SubmissionClient,
}

impl Binding {
    pub fn new(validator: Arc<dyn Validator>, client: SubmissionClient) -> Self {
        Self { validator, client }
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }

    pub fn validator(&self) -> &Arc<dyn Validator> {
        &self.validator
    }

    pub fn client(&self) -> &SubmissionClient {
        &self.client
    }
}

/// State of one user's session, passed to every orchestrator action
///
/// Status changes are published on a watch channel, so a presentation layer can render them
/// while an action is running.
pub struct Session {
    identity: Option<String>,
    binding: Option<Binding>,
    in_flight: bool,
    status: watch::Sender<Status>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (status, _) = watch::channel(Status::Idle);
        Self { identity: None, binding: None, in_flight: false, status }
    }

    pub fn state(&self) -> SessionState {
        match (&self.binding, self.in_flight) {
            (None, _) => SessionState::NoSession,
            (Some(_), false) => SessionState::Bound,
            (Some(_), true) => SessionState::InFlight,
        }
    }

    /// Whether user operations can be submitted
    pub fn is_ready(&self) -> bool {
        self.binding.is_some()
    }

    /// Address of the bound smart account
    pub fn address(&self) -> Option<Address> {
        self.binding.as_ref().map(Binding::address)
    }

    /// Label given at register or login
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Replaces the identity and binding at once
    pub(crate) fn bind(&mut self, identity: Option<String>, binding: Binding) {
        self.identity = identity;
        self.binding = Some(binding);
    }

    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    pub(crate) fn set_status(&self, status: Status) {
        self.status.send_replace(status);
    }
}
