//! Deposit/withdrawal ledger event.

use crate::domain::{Address, Sats, TimeMs};
use serde::{Deserialize, Serialize};

/// A deposit (positive amount) or withdrawal (negative amount) of bitcoin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub user: Address,
    pub amount: Sats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub timestamp: TimeMs,
}

impl Deposit {
    pub fn new(user: Address, amount: Sats, tx_hash: Option<String>, timestamp: TimeMs) -> Self {
        Self {
            user,
            amount,
            tx_hash: normalize_tx_hash(tx_hash),
            timestamp,
        }
    }

    /// Stable unique key for this event.
    ///
    /// Priority: `tx_hash` (if present) > hash of (user, timestamp, amount).
    ///
    /// The fallback truncates a SHA-256 digest to 128 bits, which leaves about
    /// 2^64 collision resistance by the birthday bound.
    pub fn event_key(&self) -> String {
        if let Some(tx) = self.tx_hash.as_deref().filter(|s| !s.trim().is_empty()) {
            return tx.trim().to_lowercase();
        }

        use sha2::{Digest, Sha256};

        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u32).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        hash_var(&mut hasher, self.user.as_str());
        hasher.update(self.timestamp.as_ms().to_le_bytes());
        hash_var(&mut hasher, &self.amount.to_string());

        let hash = hasher.finalize();
        format!("hash:{}", hex::encode(&hash[..16]))
    }
}

fn normalize_tx_hash(tx_hash: Option<String>) -> Option<String> {
    tx_hash
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
}
