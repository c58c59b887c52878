//! Passkey wallet session: binds a passkey-validated Kernel account and a sponsored submission
//! client to a session, then submits user operations and tracks their inclusion.
mod adapters;
mod client;
mod error;
mod handle;
pub mod kernel;
mod orchestrator;
mod session;
pub mod status;
pub mod traits;
mod wait;

pub use adapters::PasskeyCredentials;
pub use client::SubmissionClient;
pub use error::{SessionError, SessionResult};
pub use handle::SessionHandle;
pub use kernel::{KernelAccount, KernelAccountFactory};
pub use orchestrator::{Completion, Orchestrator, SessionConfig};
pub use session::{Binding, Session, SessionState};
pub use status::{account_link, explorer_link, Action, Notice, Status};
pub use wait::{wait_for_receipt, WaitConfig};
