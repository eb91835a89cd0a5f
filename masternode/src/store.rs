//! Identity resolution across the configured sources

use std::path::{Path, PathBuf};

use mnvote_crypto::MessageSigner;

use crate::config::{MalformedRecord, MasternodeConfig};
use crate::directory::{resolve_funding, DirectoryLookup};
use crate::error::{IdentityError, Result};
use crate::identity::{IdentitySet, MasternodeIdentity, SigningSecret};
use crate::node_conf::NodeConf;

/// Alias given to the identity resolved from the node config
pub const NODE_IDENTITY_ALIAS: &str = "node";

/// Where identities are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySources {
    pub masternode_conf: PathBuf,
    pub node_conf: PathBuf,
}

impl IdentitySources {
    /// Standard file names inside a node data directory
    pub fn in_datadir<P: AsRef<Path>>(datadir: P) -> Self {
        let datadir = datadir.as_ref();
        Self {
            masternode_conf: datadir.join("masternode.conf"),
            node_conf: datadir.join("dash.conf"),
        }
    }
}

/// Which source produced the identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    MasternodeConf(PathBuf),
    NodeConf(PathBuf),
}

#[derive(Debug)]
pub struct IdentityLoad {
    pub identities: IdentitySet,
    /// masternode.conf lines that were excluded
    pub malformed: Vec<MalformedRecord>,
    pub source: IdentitySource,
}

/// Resolve the operator's masternodes.
///
/// masternode.conf wins when it yields at least one entry. Otherwise the
/// node config is consulted and its funding outpoint looked up in the
/// directory; passing `None` disables that fallback.
///
/// Every private key is checked against `signer` here. A masternode.conf
/// entry with an unusable key is reported as malformed; an unusable key in
/// the node config is an error.
pub fn resolve_identities(
    sources: &IdentitySources,
    signer: &dyn MessageSigner,
    directory: Option<&dyn DirectoryLookup>,
) -> Result<IdentityLoad> {
    let mut malformed = Vec::new();

    if sources.masternode_conf.exists() {
        let mut config = MasternodeConfig::load_from_file(&sources.masternode_conf)?;
        config.reject_unusable_keys(signer);
        malformed = config.malformed().to_vec();

        if config.count() > 0 {
            let identities = config.to_identities()?;
            log::info!(
                "Loaded {} masternode(s) from {}",
                identities.len(),
                sources.masternode_conf.display()
            );
            return Ok(IdentityLoad {
                identities,
                malformed,
                source: IdentitySource::MasternodeConf(sources.masternode_conf.clone()),
            });
        }
    }

    log::info!(
        "No usable entries in {}, falling back to {}",
        sources.masternode_conf.display(),
        sources.node_conf.display()
    );

    let directory = directory.ok_or_else(|| {
        IdentityError::NoIdentities(format!(
            "{} has no usable entries and directory lookup is disabled",
            sources.masternode_conf.display()
        ))
    })?;

    if !sources.node_conf.exists() {
        return Err(IdentityError::NoIdentities(format!(
            "neither {} nor {} found",
            sources.masternode_conf.display(),
            sources.node_conf.display()
        )));
    }

    let settings = NodeConf::load_from_file(&sources.node_conf)?.masternode_settings()?;
    signer.check_key(&settings.private_key).map_err(|e| {
        IdentityError::InvalidSigningKey(format!(
            "masternodeprivkey in {}: {}",
            sources.node_conf.display(),
            e
        ))
    })?;
    let funding = resolve_funding(directory, &settings.address)?;
    log::info!("Directory resolved {} to {}", settings.address, funding);

    let identity = MasternodeIdentity::new(
        NODE_IDENTITY_ALIAS,
        funding,
        SigningSecret::new(settings.private_key),
    );

    Ok(IdentityLoad {
        identities: IdentitySet::new(vec![identity])?,
        malformed,
        source: IdentitySource::NodeConf(sources.node_conf.clone()),
    })
}
