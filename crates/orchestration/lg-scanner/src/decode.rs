//! Payload decompression.
//!
//! Objects are decompressed fully into memory before any line is scanned, so
//! a payload that fails to decode never produces partial output.

use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use lg_error::{DecodeError, Result};
use lg_types::ObjectKey;
use serde::{Deserialize, Serialize};
use std::io;
use tokio::io::{AsyncReadExt, BufReader};

/// Compression applied to stored log objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Gzip, including concatenated multi-member streams (default)
    #[default]
    Gzip,

    /// Zstandard
    Zstd,

    /// Stored uncompressed
    None,

    /// Detect per object from the key suffix
    Auto,
}

impl Compression {
    /// Detect compression from an object key or filename.
    pub fn from_key(key: &str) -> Self {
        let key_lower = key.to_lowercase();
        if key_lower.ends_with(".gz") || key_lower.ends_with(".gzip") {
            Compression::Gzip
        } else if key_lower.ends_with(".zst") || key_lower.ends_with(".zstd") {
            Compression::Zstd
        } else {
            Compression::None
        }
    }

    /// Resolve [`Compression::Auto`] against `key`; other values pass through.
    pub fn resolve(self, key: &str) -> Self {
        match self {
            Compression::Auto => Self::from_key(key),
            other => other,
        }
    }
}

/// Turns raw object payloads into text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    compression: Compression,
}

impl Decoder {
    /// Create a decoder for the given compression setting.
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    /// Decompress `payload` and interpret it as UTF-8 text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected; access logs
    /// occasionally carry raw bytes in user-agent or URL columns.
    pub async fn decode(&self, key: &ObjectKey, payload: &[u8]) -> Result<String> {
        let compression = self.compression.resolve(key.as_str());
        let mut decoded = Vec::with_capacity(payload.len().saturating_mul(4));

        let result = match compression {
            Compression::Gzip => {
                let mut decoder = GzipDecoder::new(BufReader::new(payload));
                decoder.multiple_members(true);
                decoder.read_to_end(&mut decoded).await
            }
            Compression::Zstd => {
                let mut decoder = ZstdDecoder::new(BufReader::new(payload));
                decoder.multiple_members(true);
                decoder.read_to_end(&mut decoded).await
            }
            Compression::None | Compression::Auto => {
                decoded.extend_from_slice(payload);
                Ok(payload.len())
            }
        };

        result.map_err(|e| decode_error(key, e))?;

        Ok(match String::from_utf8(decoded) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

fn decode_error(key: &ObjectKey, error: io::Error) -> DecodeError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        DecodeError::Truncated(format!("{key}: {error}"))
    } else {
        DecodeError::Malformed(format!("{key}: {error}"))
    }
}
