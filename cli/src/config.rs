//! Command-line flags and the optional settings file
//!
//! Every setting has a default, the TOML file may override any of them,
//! and command-line flags override the file.

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use mnvote_masternode::directory::{DEFAULT_DIRECTORY_TIMEOUT, DEFAULT_DIRECTORY_URL};
use mnvote_masternode::IdentitySources;
use mnvote_node::dash_cli::DEFAULT_CLI_PROGRAM;
use mnvote_node::DEFAULT_SUCCESS_MARKER;

#[derive(Parser, Debug)]
#[command(name = "mnvote")]
#[command(about = "Cast budget proposal votes from all of your masternodes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Node data directory holding masternode.conf and dash.conf
    #[arg(short, long, value_name = "DIR")]
    pub datadir: Option<PathBuf>,

    /// Node command-line client to run
    #[arg(long, value_name = "PATH")]
    pub cli_path: Option<PathBuf>,

    /// Extra argument passed to every client call (repeatable)
    #[arg(long = "rpc-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub rpc_args: Vec<String>,

    /// masternode.conf location, overriding the data directory
    #[arg(long, value_name = "FILE")]
    pub masternode_conf: Option<PathBuf>,

    /// Node config location, overriding the data directory
    #[arg(long, value_name = "FILE")]
    pub node_conf: Option<PathBuf>,

    /// Masternode directory used to resolve the node's funding outpoint
    #[arg(long, value_name = "URL")]
    pub directory_url: Option<String>,

    /// Never query the masternode directory
    #[arg(long)]
    pub no_directory: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub node: NodeSettings,
    pub identity: IdentitySettings,
    pub directory: DirectorySettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeSettings {
    pub cli_path: PathBuf,
    pub extra_args: Vec<String>,
    /// Substring of the node's reply that marks an accepted vote
    pub success_marker: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            cli_path: PathBuf::from(DEFAULT_CLI_PROGRAM),
            extra_args: Vec::new(),
            success_marker: DEFAULT_SUCCESS_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdentitySettings {
    pub datadir: Option<PathBuf>,
    pub masternode_conf: Option<PathBuf>,
    pub node_conf: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectorySettings {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_DIRECTORY_URL.to_string(),
            timeout_secs: DEFAULT_DIRECTORY_TIMEOUT.as_secs(),
        }
    }
}

impl DirectorySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `~/.dash`, or `.dash` in the working directory without a home
pub fn default_datadir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".dash"))
        .unwrap_or_else(|| PathBuf::from(".dash"))
}

impl Settings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings file named by `--config` (if any) with flags applied on top
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };
        settings.merge_cli(cli);
        Ok(settings)
    }

    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.cli_path {
            self.node.cli_path = path.clone();
        }
        if !cli.rpc_args.is_empty() {
            self.node.extra_args = cli.rpc_args.clone();
        }
        if let Some(dir) = &cli.datadir {
            self.identity.datadir = Some(dir.clone());
        }
        if let Some(path) = &cli.masternode_conf {
            self.identity.masternode_conf = Some(path.clone());
        }
        if let Some(path) = &cli.node_conf {
            self.identity.node_conf = Some(path.clone());
        }
        if let Some(url) = &cli.directory_url {
            self.directory.url = url.clone();
        }
        if cli.no_directory {
            self.directory.enabled = false;
        }
    }

    pub fn identity_sources(&self) -> IdentitySources {
        let datadir = self.identity.datadir.clone().unwrap_or_else(default_datadir);
        let mut sources = IdentitySources::in_datadir(datadir);
        if let Some(path) = &self.identity.masternode_conf {
            sources.masternode_conf = path.clone();
        }
        if let Some(path) = &self.identity.node_conf {
            sources.node_conf = path.clone();
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mnvote"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&cli(&[])).unwrap();
        assert_eq!(settings.node.cli_path, PathBuf::from("dash-cli"));
        assert_eq!(settings.node.success_marker, "successfully");
        assert!(settings.directory.enabled);
        assert_eq!(settings.directory.timeout(), Duration::from_secs(10));
        assert!(settings
            .identity_sources()
            .masternode_conf
            .ends_with(".dash/masternode.conf"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[node]\nextra_args = [\"-testnet\"]\n\n[directory]\ntimeout_secs = 3"
        )
        .unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.node.extra_args, vec!["-testnet"]);
        assert_eq!(settings.node.cli_path, PathBuf::from("dash-cli"));
        assert_eq!(settings.directory.timeout_secs, 3);
        assert_eq!(settings.directory.url, DEFAULT_DIRECTORY_URL);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[node]\ncli_path = \"/opt/dash/bin/dash-cli\"\nextra_args = [\"-testnet\"]\n\n[identity]\ndatadir = \"/srv/dash\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let settings = Settings::resolve(&cli(&[
            "--config",
            path,
            "--rpc-arg",
            "-rpcport=19998",
            "--rpc-arg",
            "-rpcuser=alice",
            "--node-conf",
            "/etc/dash.conf",
            "--no-directory",
        ]))
        .unwrap();

        assert_eq!(settings.node.cli_path, PathBuf::from("/opt/dash/bin/dash-cli"));
        assert_eq!(settings.node.extra_args, vec!["-rpcport=19998", "-rpcuser=alice"]);
        assert!(!settings.directory.enabled);

        let sources = settings.identity_sources();
        assert_eq!(sources.masternode_conf, PathBuf::from("/srv/dash/masternode.conf"));
        assert_eq!(sources.node_conf, PathBuf::from("/etc/dash.conf"));
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let missing = Settings::load_from_file("/nonexistent/mnvote.toml");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[directory]\nenabled = \"sometimes\"").unwrap();
        let invalid = Settings::load_from_file(file.path());
        assert!(matches!(invalid, Err(ConfigError::Parse { .. })));
    }
}
