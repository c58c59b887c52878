use crate::{
    error::{SessionError, SessionResult},
    orchestrator::{Completion, Orchestrator},
    session::Session,
    status::Status,
};
use ethers::types::Address;
use sigil_contracts::TargetContract;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Session shared between tasks
///
/// Actions never queue: while one is running, any other is rejected with
/// [Busy](SessionError::Busy).
#[derive(Clone)]
pub struct SessionHandle {
    orchestrator: Arc<Orchestrator>,
    session: Arc<Mutex<Session>>,
    status: watch::Receiver<Status>,
}

impl SessionHandle {
    pub fn new(orchestrator: Arc<Orchestrator>, session: Session) -> Self {
        let status = session.subscribe();
        Self { orchestrator, session: Arc::new(Mutex::new(session)), status }
    }

    fn lock(&self) -> SessionResult<MutexGuard<'_, Session>> {
        self.session.try_lock().map_err(|_| SessionError::Busy)
    }

    pub async fn register(&self, identity: &str) -> SessionResult<Address> {
        let mut session = self.lock()?;
        self.orchestrator.register(&mut session, identity).await
    }

    pub async fn login(&self, identity: Option<&str>) -> SessionResult<Address> {
        let mut session = self.lock()?;
        self.orchestrator.login(&mut session, identity).await
    }

    pub async fn submit<S: AsRef<str> + Sync>(
        &self,
        target: &TargetContract,
        function: &str,
        args: &[S],
        cancel: &CancellationToken,
    ) -> SessionResult<Completion> {
        let mut session = self.lock()?;
        self.orchestrator.submit(&mut session, target, function, args, cancel).await
    }

    /// Address of the bound account, `Busy` while an action is running
    pub fn address(&self) -> SessionResult<Option<Address>> {
        Ok(self.lock()?.address())
    }

    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    /// Receiver of status changes
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.clone()
    }
}
