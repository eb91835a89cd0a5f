//! Masternode configuration file (masternode.conf) support
//!
//! Format: alias IP:port masternodeprivkey collateral_txid collateral_output_index
//!
//! Example:
//! mn1 192.168.1.100:9999 9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60 2bcd3c84c84f87eaa86e4e56834c92927a07f9e18718810b92e0d0324456a67c 0
//!
//! A malformed line excludes only that masternode. It is reported back to
//! the caller and the rest of the file is still used.

use std::fmt;
use std::fs;
use std::path::Path;

use mnvote_crypto::MessageSigner;

use crate::error::{IdentityError, Result};
use crate::identity::{FundingReference, IdentitySet, MasternodeIdentity, SigningSecret};

/// A masternode.conf line that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub line: usize,
    pub reason: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Single masternode configuration entry
#[derive(Debug, Clone, PartialEq)]
pub struct MasternodeConfigEntry {
    /// 1-based line in masternode.conf
    pub line: usize,

    /// Alias/name for this masternode
    pub alias: String,

    /// IP address and port (e.g., "192.168.1.100:9999")
    pub ip_port: String,

    /// Masternode private key (for signing votes)
    pub masternode_privkey: String,

    /// Collateral transaction hash
    pub collateral_txid: String,

    /// Collateral output index
    pub collateral_output_index: u32,
}

impl MasternodeConfigEntry {
    /// Parse a single non-comment line from masternode.conf
    pub fn parse_line(line: &str, line_num: usize) -> std::result::Result<Self, MalformedRecord> {
        let malformed = |reason: String| MalformedRecord {
            line: line_num,
            reason,
        };

        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 5 {
            return Err(malformed(format!(
                "Expected 5 fields, got {}. Format: alias IP:port privkey txid index",
                parts.len()
            )));
        }

        let collateral_output_index = parts[4]
            .parse::<u32>()
            .map_err(|_| malformed(format!("Invalid output index: {}", parts[4])))?;

        let entry = Self {
            line: line_num,
            alias: parts[0].to_string(),
            ip_port: parts[1].to_string(),
            masternode_privkey: parts[2].to_string(),
            collateral_txid: parts[3].to_string(),
            collateral_output_index,
        };

        entry.validate().map_err(malformed)?;
        Ok(entry)
    }

    /// Validate the configuration entry
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.ip_port.contains(':') {
            return Err(format!("Invalid IP:port format: {}", self.ip_port));
        }

        if self.masternode_privkey.is_empty() {
            return Err("Empty private key".to_string());
        }

        if self.collateral_txid.len() != 64
            || !self.collateral_txid.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(format!(
                "Invalid transaction ID format: {}",
                self.collateral_txid
            ));
        }

        Ok(())
    }

    pub fn funding_reference(&self) -> FundingReference {
        FundingReference::new(self.collateral_txid.clone(), self.collateral_output_index)
    }

    pub fn to_identity(&self) -> MasternodeIdentity {
        MasternodeIdentity::new(
            self.alias.clone(),
            self.funding_reference(),
            SigningSecret::new(self.masternode_privkey.clone()),
        )
    }
}

/// Parsed masternode.conf: usable entries plus the lines that were skipped
#[derive(Debug, Clone, Default)]
pub struct MasternodeConfig {
    entries: Vec<MasternodeConfigEntry>,
    malformed: Vec<MalformedRecord>,
}

impl MasternodeConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| IdentityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Parse configuration from string
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match MasternodeConfigEntry::parse_line(line, line_num + 1) {
                Ok(entry) => config.entries.push(entry),
                Err(record) => {
                    log::warn!("Skipping masternode.conf {}", record);
                    config.malformed.push(record);
                }
            }
        }

        config
    }

    /// Move entries whose private key the signer cannot use to the
    /// malformed list, so they are reported before any vote is signed
    pub fn reject_unusable_keys<S: MessageSigner + ?Sized>(&mut self, signer: &S) {
        let entries = std::mem::take(&mut self.entries);
        for entry in entries {
            match signer.check_key(&entry.masternode_privkey) {
                Ok(()) => self.entries.push(entry),
                Err(e) => {
                    let record = MalformedRecord {
                        line: entry.line,
                        reason: format!("{} for {}", e, entry.alias),
                    };
                    log::warn!("Skipping masternode.conf {}", record);
                    self.malformed.push(record);
                }
            }
        }
        self.malformed.sort_by_key(|r| r.line);
    }

    /// Get all usable configuration entries
    pub fn entries(&self) -> &[MasternodeConfigEntry] {
        &self.entries
    }

    /// Lines that were excluded
    pub fn malformed(&self) -> &[MalformedRecord] {
        &self.malformed
    }

    /// Get the number of usable masternodes
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Convert entries into an identity set, rejecting duplicate funding references
    pub fn to_identities(&self) -> Result<IdentitySet> {
        IdentitySet::new(self.entries.iter().map(|e| e.to_identity()).collect())
    }
}
