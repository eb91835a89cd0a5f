//! Locally controlled masternode identities

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{IdentityError, Result};

/// Funding outpoint naming a masternode on the network, written `txid-index`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FundingReference {
    pub txid: String,
    pub output_index: u32,
}

impl FundingReference {
    pub fn new(txid: impl Into<String>, output_index: u32) -> Self {
        Self {
            txid: txid.into(),
            output_index,
        }
    }

    /// Key used to detect two records naming the same outpoint
    fn dedup_key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for FundingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.txid, self.output_index)
    }
}

impl FromStr for FundingReference {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        let (txid, index) = s
            .rsplit_once('-')
            .ok_or_else(|| IdentityError::InvalidFundingReference(s.to_string()))?;

        if txid.is_empty() {
            return Err(IdentityError::InvalidFundingReference(s.to_string()));
        }

        let output_index = index
            .parse::<u32>()
            .map_err(|_| IdentityError::InvalidFundingReference(s.to_string()))?;

        Ok(Self::new(txid, output_index))
    }
}

/// Masternode private key. Only the signer reads it; it never appears in
/// `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasternodeIdentity {
    pub alias: String,
    pub funding: FundingReference,
    pub secret: SigningSecret,
}

impl MasternodeIdentity {
    pub fn new(alias: impl Into<String>, funding: FundingReference, secret: SigningSecret) -> Self {
        Self {
            alias: alias.into(),
            funding,
            secret,
        }
    }

    pub fn funding_reference(&self) -> String {
        self.funding.to_string()
    }
}

/// The operator's masternodes, unique by funding reference and held in
/// case-insensitive funding reference order.
#[derive(Debug, Clone, Default)]
pub struct IdentitySet {
    identities: Vec<MasternodeIdentity>,
}

impl IdentitySet {
    /// Build the set, rejecting any funding reference that appears twice
    pub fn new(mut identities: Vec<MasternodeIdentity>) -> Result<Self> {
        let mut seen = HashSet::new();
        for identity in &identities {
            if !seen.insert(identity.funding.dedup_key()) {
                return Err(IdentityError::DuplicateFundingReference(
                    identity.funding_reference(),
                ));
            }
        }

        identities.sort_by(|a, b| {
            let (a, b) = (a.funding_reference(), b.funding_reference());
            a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(&b))
        });

        Ok(Self { identities })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MasternodeIdentity> {
        self.identities.iter()
    }

    /// Funding references in set order
    pub fn funding_references(&self) -> Vec<String> {
        self.identities.iter().map(|i| i.funding_reference()).collect()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl<'a> IntoIterator for &'a IdentitySet {
    type Item = &'a MasternodeIdentity;
    type IntoIter = std::slice::Iter<'a, MasternodeIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.identities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(funding: &str) -> MasternodeIdentity {
        MasternodeIdentity::new(
            "mn",
            funding.parse().unwrap(),
            SigningSecret::new("secret"),
        )
    }

    #[test]
    fn test_funding_reference_round_trip() {
        let funding: FundingReference = "tx1-0".parse().unwrap();
        assert_eq!(funding.txid, "tx1");
        assert_eq!(funding.output_index, 0);
        assert_eq!(funding.to_string(), "tx1-0");
    }

    #[test]
    fn test_invalid_funding_reference() {
        assert!("tx1".parse::<FundingReference>().is_err());
        assert!("tx1-x".parse::<FundingReference>().is_err());
        assert!("-3".parse::<FundingReference>().is_err());
    }

    #[test]
    fn test_set_is_sorted_case_insensitively() {
        let set = IdentitySet::new(vec![identity("Tx2-1"), identity("tx1-0"), identity("TX3-0")])
            .unwrap();
        assert_eq!(set.funding_references(), vec!["tx1-0", "Tx2-1", "TX3-0"]);
    }

    #[test]
    fn test_duplicate_funding_reference_rejected() {
        let result = IdentitySet::new(vec![identity("abc-0"), identity("ABC-0")]);
        assert!(matches!(
            result,
            Err(IdentityError::DuplicateFundingReference(_))
        ));
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let identity = MasternodeIdentity::new(
            "mn1",
            FundingReference::new("tx1", 0),
            SigningSecret::new("topsecretkey"),
        );
        let debug = format!("{:?}", identity);
        assert!(!debug.contains("topsecretkey"));
        assert_eq!(identity.secret.expose(), "topsecretkey");
    }
}
