//! mnvote Vote Submission Engine
//!
//! Loads the ballot, tracks the operator's session, and turns confirmed
//! choices into one signed, time-randomized vote per masternode and
//! proposal.

pub mod clock;
pub mod error;
pub mod loader;
pub mod orchestrator;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{EngineError, Result};
pub use loader::{load_ballot, LoadedBallot};
pub use orchestrator::{
    NoopObserver, Orchestrator, SubmissionEntry, SubmissionObserver, SubmissionOutcome,
    SubmissionReport,
};
pub use session::{Action, Session, SessionState, UserIntent};
