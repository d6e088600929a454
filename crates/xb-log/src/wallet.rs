//! Wallet connection parameters.
//!
//! Plain data describing one blockchain wallet endpoint as configured for the
//! node. Nothing in this crate acts on these values; they ride along in the
//! settings file next to the log configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default fee rate in the coin's smallest unit per byte.
pub const DEFAULT_FEE_PER_BYTE: u64 = 300;

/// Parameters for one wallet (one currency).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletParam {
    /// Ticker, e.g. `"BLOCK"`.
    pub currency: String,
    pub title: String,
    pub address: String,

    // --- RPC endpoint ---
    pub ip: String,
    pub port: String,
    pub user: String,
    pub passwd: String,

    // --- Address encoding ---
    pub addr_prefix: String,
    pub script_prefix: String,
    pub secret_prefix: String,

    /// Smallest units per coin.
    pub coin: u64,
    pub min_tx_fee: u64,
    pub fee_per_byte: u64,
    pub min_amount: u64,
    pub dust_amount: u64,
    /// Target block interval in seconds.
    pub block_time: u32,
    pub required_confirmations: u32,
    pub tx_version: u32,

    // --- Capability flags ---
    pub is_get_new_pub_key_supported: bool,
    pub is_import_with_no_scan_supported: bool,
}

impl Default for WalletParam {
    fn default() -> Self {
        Self {
            currency: String::new(),
            title: String::new(),
            address: String::new(),
            ip: String::new(),
            port: String::new(),
            user: String::new(),
            passwd: String::new(),
            addr_prefix: String::new(),
            script_prefix: String::new(),
            secret_prefix: String::new(),
            coin: 0,
            min_tx_fee: 0,
            fee_per_byte: DEFAULT_FEE_PER_BYTE,
            min_amount: 0,
            dust_amount: 0,
            block_time: 0,
            required_confirmations: 0,
            tx_version: 1,
            is_get_new_pub_key_supported: false,
            is_import_with_no_scan_supported: false,
        }
    }
}

// Hand-written so RPC passwords never end up in a log record.
impl fmt::Debug for WalletParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletParam")
            .field("currency", &self.currency)
            .field("title", &self.title)
            .field("address", &self.address)
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("passwd", &if self.passwd.is_empty() { "" } else { "***" })
            .field("addr_prefix", &self.addr_prefix)
            .field("script_prefix", &self.script_prefix)
            .field("secret_prefix", &self.secret_prefix)
            .field("coin", &self.coin)
            .field("min_tx_fee", &self.min_tx_fee)
            .field("fee_per_byte", &self.fee_per_byte)
            .field("min_amount", &self.min_amount)
            .field("dust_amount", &self.dust_amount)
            .field("block_time", &self.block_time)
            .field("required_confirmations", &self.required_confirmations)
            .field("tx_version", &self.tx_version)
            .field("is_get_new_pub_key_supported", &self.is_get_new_pub_key_supported)
            .field("is_import_with_no_scan_supported", &self.is_import_with_no_scan_supported)
            .finish()
    }
}
