//! Remote masternode directory, used to find the funding outpoint of a
//! masternode known only by its network address.
//!
//! One request, bounded by a timeout, no retry. The address must match
//! exactly one masternode; several matches are an error rather than a
//! guess.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{IdentityError, Result};
use crate::identity::FundingReference;

pub const DEFAULT_DIRECTORY_URL: &str = "https://dashninja.pl/api/masternodes";
pub const DEFAULT_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(10);

/// One masternode as listed by the directory
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DirectoryEntry {
    #[serde(rename = "MasternodeOutputHash")]
    pub output_hash: String,
    #[serde(rename = "MasternodeOutputIndex")]
    pub output_index: u32,
}

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    data: Vec<DirectoryEntry>,
}

pub trait DirectoryLookup {
    /// All directory entries registered at `address`
    fn lookup(&self, address: &str) -> Result<Vec<DirectoryEntry>>;
}

/// HTTP directory client
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    url: String,
    client: Client,
}

impl HttpDirectory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl DirectoryLookup for HttpDirectory {
    fn lookup(&self, address: &str) -> Result<Vec<DirectoryEntry>> {
        log::debug!("→ GET {} (ips: {})", self.url, address);

        let ips = format!("[\"{}\"]", address);
        let response = self
            .client
            .get(&self.url)
            .query(&[("ips", ips.as_str()), ("portcheck", "1")])
            .send()?;

        if !response.status().is_success() {
            return Err(IdentityError::Directory(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let body = response.text()?;
        parse_directory_response(&body)
    }
}

pub fn parse_directory_response(body: &str) -> Result<Vec<DirectoryEntry>> {
    let response: DirectoryResponse = serde_json::from_str(body)
        .map_err(|e| IdentityError::Directory(format!("invalid response: {}", e)))?;
    Ok(response.data)
}

/// Resolve the funding outpoint for `address`, requiring exactly one match
pub fn resolve_funding<D: DirectoryLookup + ?Sized>(
    directory: &D,
    address: &str,
) -> Result<FundingReference> {
    let entries = directory.lookup(address)?;

    match entries.as_slice() {
        [] => Err(IdentityError::DirectoryNoMatch(address.to_string())),
        [entry] => Ok(FundingReference::new(
            entry.output_hash.clone(),
            entry.output_index,
        )),
        many => Err(IdentityError::AmbiguousDirectoryMatch {
            address: address.to_string(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedDirectory(&'static str);

    impl DirectoryLookup for CannedDirectory {
        fn lookup(&self, _address: &str) -> Result<Vec<DirectoryEntry>> {
            parse_directory_response(self.0)
        }
    }

    #[test]
    fn test_single_match() {
        let directory = CannedDirectory(
            r#"{"status":"OK","data":[{"MasternodeOutputHash":"aa11","MasternodeOutputIndex":1,"MasternodeIP":"1.2.3.4"}]}"#,
        );
        let funding = resolve_funding(&directory, "1.2.3.4:9999").unwrap();
        assert_eq!(funding.to_string(), "aa11-1");
    }

    #[test]
    fn test_no_match() {
        let directory = CannedDirectory(r#"{"status":"OK","data":[]}"#);
        assert!(matches!(
            resolve_funding(&directory, "1.2.3.4:9999"),
            Err(IdentityError::DirectoryNoMatch(_))
        ));
    }

    #[test]
    fn test_several_matches_are_rejected() {
        let directory = CannedDirectory(
            r#"{"data":[{"MasternodeOutputHash":"aa","MasternodeOutputIndex":0},{"MasternodeOutputHash":"bb","MasternodeOutputIndex":3}]}"#,
        );
        match resolve_funding(&directory, "1.2.3.4:9999") {
            Err(IdentityError::AmbiguousDirectoryMatch { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_response() {
        assert!(matches!(
            parse_directory_response("<html>busy</html>"),
            Err(IdentityError::Directory(_))
        ));
    }
}
