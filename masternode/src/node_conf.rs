//! Node config (`key=value` lines) used as the fallback identity source

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{IdentityError, Result};

#[derive(Debug, Clone, Default)]
pub struct NodeConf {
    values: HashMap<String, String>,
}

/// The node's own masternode settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMasternodeSettings {
    /// External address with any IPv6 brackets removed
    pub address: String,
    pub private_key: String,
}

impl NodeConf {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| IdentityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    values.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => log::warn!("Ignoring node config line {} without '='", line_num + 1),
            }
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The masternode address and key, if this node runs as a masternode
    pub fn masternode_settings(&self) -> Result<NodeMasternodeSettings> {
        let require = |key: &str| {
            self.get(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| IdentityError::MissingNodeSetting(key.to_string()))
        };

        require("masternode")?;
        let address = require("masternodeaddr")?.replace(['[', ']'], "");
        let private_key = require("masternodeprivkey")?.to_string();

        Ok(NodeMasternodeSettings {
            address,
            private_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masternode_settings() {
        let conf = NodeConf::parse(
            "# node settings\nrpcuser=me\nmasternode=1\nmasternodeaddr = [2001:db8::1]:9999\nmasternodeprivkey=abcd\nrpcpassword=a=b\n",
        );
        let settings = conf.masternode_settings().unwrap();
        assert_eq!(settings.address, "2001:db8::1:9999");
        assert_eq!(settings.private_key, "abcd");
        assert_eq!(conf.get("rpcpassword"), Some("a=b"));
    }

    #[test]
    fn test_missing_masternode_key() {
        let conf = NodeConf::parse("masternode=1\nmasternodeaddr=1.2.3.4:9999\n");
        match conf.masternode_settings() {
            Err(IdentityError::MissingNodeSetting(key)) => assert_eq!(key, "masternodeprivkey"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_lines_without_separator_are_ignored() {
        let conf = NodeConf::parse("garbage\nmasternode=1\n");
        assert_eq!(conf.get("masternode"), Some("1"));
        assert_eq!(conf.get("garbage"), None);
    }
}
