//! Account address validation

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

const ADDRESS_HEX_LEN: usize = 40;

/// A validated `0x`-prefixed, 40 hex digit account address.
///
/// The string is kept exactly as the user typed it: it is what goes out in
/// RPC params, what is shown, and what the history deduplicates on.
/// Comparing two `Address` values ignores hex case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Validate `input` against `^0x[a-fA-F0-9]{40}$`.
    pub fn parse(input: &str) -> Option<Self> {
        let payload = input.strip_prefix("0x")?;
        if payload.len() != ADDRESS_HEX_LEN {
            return None;
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(payload, &mut bytes).ok()?;
        Some(Self(input.to_string()))
    }

    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form, used only where identity must ignore case.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
