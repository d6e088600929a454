//! Settings file for the XBridge log subsystem.
//!
//! The node reads one JSON file. Only the pieces the loggers consume are
//! modelled here: where the data directory and application live, an optional
//! explicit transaction log directory, the file-logging switch, and the wallet
//! table that shares the same file.
//!
//! # Example config
//!
//! ```json
//! {
//!   "XBridge": { "module_name": "xbridgep2p", "log_level": "info" },
//!   "data_dir": "/home/user/.xbridge",
//!   "app_path": "/opt/xbridge",
//!   "log_path": "",
//!   "log_to_file": true,
//!   "wallets": [{ "currency": "BLOCK", "title": "Blocknet", "ip": "127.0.0.1", "port": "41414" }]
//! }
//! ```

use std::{collections::HashSet, path::PathBuf};

use serde::Deserialize;

use crate::{
    error::XbError,
    interfaces::{DataDirectory, LogSettings},
    wallet::WalletParam,
};

/// Directory under the home directory used when `data_dir` is not set.
const DEFAULT_DATA_SUBDIR: &str = ".xbridge";

/// Top-level node settings, deserialized from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Module metadata (name, default log level).
    #[serde(rename = "XBridge")]
    pub xbridge: Option<ModuleMeta>,

    /// Node data directory; the general log lives in its `log` subdirectory.
    pub data_dir: Option<PathBuf>,

    /// Application directory; fallback location of the transaction log.
    pub app_path: Option<String>,

    /// Explicit transaction log directory (empty or absent means unset).
    pub log_path: Option<String>,

    /// Whether the general log writes files at all (default: true).
    pub log_to_file: Option<bool>,

    /// Wallet connection parameters, one per currency.
    #[serde(default)]
    pub wallets: Vec<WalletParam>,
}

/// Module metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Returns the file-logging switch, defaulting to `true`.
    pub fn effective_log_to_file(&self) -> bool {
        self.log_to_file.unwrap_or(true)
    }

    /// Returns the data directory, defaulting to `~/.xbridge` (or `./.xbridge`
    /// when no home directory is known).
    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(DEFAULT_DATA_SUBDIR))
    }

    /// Returns the application directory, defaulting to the current directory.
    pub fn effective_app_path(&self) -> String {
        self.app_path.clone().unwrap_or_else(|| {
            std::env::current_dir().map(|p| p.display().to_string()).unwrap_or_else(|_| ".".to_owned())
        })
    }

    /// Returns the module name used for diagnostics file names.
    pub fn module_name(&self) -> String {
        self.xbridge
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| "xbridgep2p".to_owned())
    }

    /// Returns the configured diagnostics log level, if any.
    pub fn log_level(&self) -> Option<String> {
        self.xbridge.as_ref().and_then(|m| m.log_level.clone())
    }

    /// Look up a wallet by currency code.
    pub fn wallet(&self, currency: &str) -> Option<&WalletParam> {
        self.wallets.iter().find(|w| w.currency == currency)
    }

    /// Reject wallet tables the node could not use.
    pub fn validate(&self) -> Result<(), XbError> {
        let mut seen = HashSet::new();
        for (idx, wallet) in self.wallets.iter().enumerate() {
            if wallet.currency.is_empty() {
                return Err(XbError::Config(format!("wallets[{idx}]: empty currency")));
            }
            if !seen.insert(wallet.currency.as_str()) {
                return Err(XbError::Config(format!("wallets[{idx}]: duplicate currency {}", wallet.currency)));
            }
        }
        Ok(())
    }
}

impl DataDirectory for AppConfig {
    fn data_directory(&self, create: bool) -> PathBuf {
        let dir = self.effective_data_dir();
        if create {
            let _ = std::fs::create_dir_all(&dir);
        }
        dir
    }
}

impl LogSettings for AppConfig {
    fn log_path(&self) -> String {
        self.log_path.clone().unwrap_or_default()
    }

    fn app_path(&self) -> String {
        self.effective_app_path()
    }
}

/// Load, parse and validate a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let json = r#"{
            "XBridge": { "module_name": "xb-test", "log_level": "debug" },
            "data_dir": "/srv/xbridge",
            "app_path": "/opt/xbridge",
            "log_path": "/var/log/xbridge",
            "log_to_file": false,
            "wallets": [
                { "currency": "BLOCK", "title": "Blocknet", "ip": "127.0.0.1", "port": "41414", "fee_per_byte": 20 },
                { "currency": "LTC" }
            ]
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.module_name(), "xb-test");
        assert_eq!(config.log_level().as_deref(), Some("debug"));
        assert!(!config.effective_log_to_file());
        assert_eq!(config.data_directory(false), PathBuf::from("/srv/xbridge"));
        assert_eq!(LogSettings::log_path(&config), "/var/log/xbridge");
        assert_eq!(LogSettings::app_path(&config), "/opt/xbridge");
        assert_eq!(config.wallet("BLOCK").unwrap().fee_per_byte, 20);
        assert_eq!(config.wallet("LTC").unwrap().fee_per_byte, 300);
        assert!(config.wallet("BTC").is_none());
    }

    #[test]
    fn minimal_config_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert!(config.effective_log_to_file());
        assert_eq!(config.module_name(), "xbridgep2p");
        assert_eq!(LogSettings::log_path(&config), "");
        assert!(!LogSettings::app_path(&config).is_empty());
        assert!(config.effective_data_dir().ends_with(".xbridge"));
        assert!(config.wallets.is_empty());
    }

    #[test]
    fn rejects_duplicate_and_empty_currencies() {
        let dup: AppConfig =
            serde_json::from_str(r#"{ "wallets": [{ "currency": "BLOCK" }, { "currency": "BLOCK" }] }"#).unwrap();
        assert!(matches!(dup.validate(), Err(XbError::Config(msg)) if msg.contains("duplicate")));

        let empty: AppConfig = serde_json::from_str(r#"{ "wallets": [{ "title": "nameless" }] }"#).unwrap();
        assert!(matches!(empty.validate(), Err(XbError::Config(msg)) if msg.contains("empty currency")));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("xbridge.json");
        std::fs::write(&path, r#"{ "app_path": "/opt/xb", "log_to_file": true }"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.effective_app_path(), "/opt/xb");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_config(&path).is_err());
        assert!(load_config(&tmp.path().join("absent.json")).is_err());
    }
}
