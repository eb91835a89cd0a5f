//! Node control interface
//!
//! The only way the voting engine talks to the network: read the open
//! proposals and existing votes, and relay signed votes. [`DashCli`]
//! drives a real node through its command-line client; [`MemoryNode`]
//! answers from canned data for tests.

pub mod dash_cli;
pub mod error;
pub mod interface;
pub mod memory;
pub mod records;

pub use dash_cli::DashCli;
pub use error::{NodeError, Result};
pub use interface::{is_success, NodeInterface, SignedVote, DEFAULT_SUCCESS_MARKER};
pub use memory::MemoryNode;
pub use records::{ProposalList, RejectedProposal};
