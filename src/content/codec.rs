//! Binary encoding of the whole catalog.
//!
//! # Format
//! ```text
//! varint u16   format version
//! bincode      ContentCatalog (varint integers, little endian)
//! ```
//!
//! Only value fidelity across an encode/decode pair of the same version is
//! guaranteed; the byte layout may change between versions.

use bincode::Options;
use thiserror::Error;

use crate::content::catalog::ContentCatalog;

/// Current blob format version.
pub const FORMAT_VERSION: u16 = 1;

/// Default ceiling for an encoded blob (64 MiB).
pub const DEFAULT_MAX_ENCODED_BYTES: u64 = 64 * 1024 * 1024;

/// Errors produced while encoding a catalog.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A rule body holds a value the format cannot round-trip.
    #[error("rule {rule} contains an unsupported value at {path}")]
    UnsupportedValue { rule: String, path: String },

    /// The encoded blob would exceed the configured ceiling.
    #[error("encoded content exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("serialization failed: {0}")]
    Serialize(#[source] bincode::Error),
}

impl EncodingError {
    /// Short machine-friendly name, used as a log field and metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            EncodingError::UnsupportedValue { .. } => "unsupported_value",
            EncodingError::TooLarge { .. } => "too_large",
            EncodingError::Serialize(_) => "serialize",
        }
    }
}

/// Errors produced while decoding a blob.
#[derive(Debug, Error)]
pub enum DecodingError {
    #[error("unsupported content format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("malformed content blob: {0}")]
    Malformed(#[source] bincode::Error),

    #[error("malformed content blob: {0} trailing bytes")]
    TrailingBytes(usize),
}

/// Encodes and decodes catalogs with a shared size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct ContentEncoder {
    max_bytes: u64,
}

impl Default for ContentEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENCODED_BYTES)
    }
}

impl ContentEncoder {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    fn options(&self) -> impl Options {
        bincode::DefaultOptions::new().with_limit(self.max_bytes)
    }

    /// Encode every rule in the catalog into one blob.
    ///
    /// Either the full blob is returned or nothing is.
    pub fn encode(&self, catalog: &ContentCatalog) -> Result<Vec<u8>, EncodingError> {
        for rule in catalog.all_rules() {
            if let Some(path) = rule.body.find_unsupported() {
                return Err(EncodingError::UnsupportedValue {
                    rule: rule.plugin_id().to_string(),
                    path,
                });
            }
        }

        self.options()
            .serialize(&(FORMAT_VERSION, catalog))
            .map_err(|e| match *e {
                bincode::ErrorKind::SizeLimit => EncodingError::TooLarge { limit: self.max_bytes },
                _ => EncodingError::Serialize(e),
            })
    }

    /// Rebuild a catalog from a blob produced by [`ContentEncoder::encode`].
    pub fn decode(&self, bytes: &[u8]) -> Result<ContentCatalog, DecodingError> {
        let mut reader = bytes;

        let version: u16 = self
            .options()
            .deserialize_from(&mut reader)
            .map_err(DecodingError::Malformed)?;
        if version != FORMAT_VERSION {
            return Err(DecodingError::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let catalog: ContentCatalog = self
            .options()
            .deserialize_from(&mut reader)
            .map_err(DecodingError::Malformed)?;

        if !reader.is_empty() {
            return Err(DecodingError::TrailingBytes(reader.len()));
        }
        Ok(catalog)
    }
}
