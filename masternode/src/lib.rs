//! mnvote Masternode Identities
//!
//! Resolves the masternodes the operator controls: their funding
//! outpoints and the keys that sign their votes.
//!
//! Identities come from `masternode.conf` when it has usable entries,
//! otherwise from the node's own config plus a directory lookup of the
//! funding outpoint.

pub mod config;
pub mod directory;
pub mod error;
pub mod identity;
pub mod node_conf;
pub mod store;

pub use config::{MalformedRecord, MasternodeConfig, MasternodeConfigEntry};
pub use directory::{DirectoryEntry, DirectoryLookup, HttpDirectory};
pub use error::{IdentityError, Result};
pub use identity::{FundingReference, IdentitySet, MasternodeIdentity, SigningSecret};
pub use node_conf::{NodeConf, NodeMasternodeSettings};
pub use store::{resolve_identities, IdentityLoad, IdentitySource, IdentitySources};

