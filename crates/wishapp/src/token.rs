//! Sync codes.
//!
//! A [`SyncToken`] names one shared remote document. Clients that hold the same
//! code read and overwrite the same list. Codes are short so they can be read
//! out loud or typed on a phone: uppercase ASCII letters and digits only.

use crate::error::{Result, WishError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TOKEN_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncToken(String);

impl SyncToken {
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code = (0..TOKEN_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Normalizes a user-typed code (trim + uppercase) and validates it.
    pub fn parse(input: &str) -> Result<Self> {
        let code = input.trim().to_ascii_uppercase();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(WishError::InvalidSyncToken(input.to_string()));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
