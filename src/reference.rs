// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content-addressed message references.
//!
//! A `MessageRef` is the hash of a message together with the algorithm (feed format) which was
//! used to derive it. The textual form is `%<hex hash>.<algorithm>`, for example:
//!
//! ```text
//! %b177ec1bf26dfb3b7010d473e6d44713b29b765b99c6e60ecbfae742de496543.blake3
//! ```
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::MessageId;

/// Size of message reference hashes.
pub const REF_HASH_LEN: usize = 32;

/// Sigil prefixing the textual form of message references.
const SIGIL: char = '%';

/// Algorithms (feed formats) a message reference can be derived with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefAlgo {
    /// Legacy SHA256 message hashes.
    Sha256,
    Bamboo,
    BendyButt,
    Gabby,
    Blake3,
}

impl RefAlgo {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefAlgo::Sha256 => "sha256",
            RefAlgo::Bamboo => "bamboo",
            RefAlgo::BendyButt => "bendybutt-v1",
            RefAlgo::Gabby => "gabbygrove-v1",
            RefAlgo::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for RefAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RefAlgo {
    type Err = RefError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sha256" => Ok(RefAlgo::Sha256),
            "bamboo" => Ok(RefAlgo::Bamboo),
            "bendybutt-v1" => Ok(RefAlgo::BendyButt),
            "gabbygrove-v1" => Ok(RefAlgo::Gabby),
            "blake3" => Ok(RefAlgo::Blake3),
            _ => Err(RefError::UnknownAlgo(value.to_string())),
        }
    }
}

/// Reference to a message, identified by its hash.
///
/// References are ordered by the bytes of their hash first and their algorithm second.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageRef {
    hash: [u8; REF_HASH_LEN],
    algo: RefAlgo,
}

impl MessageRef {
    /// Derive a reference from the given message bytes by hashing them with BLAKE3.
    pub fn from_content(content: impl AsRef<[u8]>) -> Self {
        Self {
            hash: *blake3::hash(content.as_ref()).as_bytes(),
            algo: RefAlgo::Blake3,
        }
    }

    /// Create a reference from an already computed hash.
    pub fn from_bytes(bytes: &[u8], algo: RefAlgo) -> Result<Self, RefError> {
        let hash: [u8; REF_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| RefError::InvalidLength(bytes.len(), REF_HASH_LEN))?;
        Ok(Self { hash, algo })
    }

    pub fn algo(&self) -> RefAlgo {
        self.algo
    }

    /// Bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; REF_HASH_LEN] {
        &self.hash
    }

    /// Truncated textual form, handy for log output.
    pub fn short(&self) -> String {
        format!("{SIGIL}{}.{}", hex::encode(&self.hash[..4]), self.algo)
    }
}

impl MessageId for MessageRef {}

impl AsRef<[u8]> for MessageRef {
    fn as_ref(&self) -> &[u8] {
        &self.hash
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SIGIL}{}.{}", hex::encode(self.hash), self.algo)
    }
}

impl fmt::Debug for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageRef").field(&self.short()).finish()
    }
}

impl FromStr for MessageRef {
    type Err = RefError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some(rest) = value.strip_prefix(SIGIL) else {
            return Err(RefError::InvalidFormat(value.to_string()));
        };

        let Some((hash, algo)) = rest.split_once('.') else {
            return Err(RefError::InvalidFormat(value.to_string()));
        };

        let algo: RefAlgo = algo.parse()?;
        Self::from_bytes(&hex::decode(hash)?, algo)
    }
}

impl Serialize for MessageRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MessageRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value
            .parse()
            .map_err(|err: RefError| serde::de::Error::custom(err.to_string()))
    }
}

/// Error types for `MessageRef` struct.
#[derive(Error, Debug)]
pub enum RefError {
    /// Hash has an invalid length.
    #[error("invalid hash length {0} bytes, expected {1} bytes")]
    InvalidLength(usize, usize),

    /// Hash string contains invalid hexadecimal characters.
    #[error("invalid hex encoding in message reference")]
    InvalidHexEncoding(#[from] hex::FromHexError),

    #[error("unknown reference algorithm '{0}'")]
    UnknownAlgo(String),

    /// String is not of the form `%<hex>.<algo>`.
    #[error("invalid message reference '{0}'")]
    InvalidFormat(String),
}
