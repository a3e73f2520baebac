use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::trace;

use crate::error::UtilError;

/// Gzip + base64 codec used for compact save strings
pub struct Gzip;

impl Gzip {
    /// Compresses a string and encodes it as base64
    pub fn zip(data: &str) -> Result<String, UtilError> {
        let compressed = Self::compress(data.as_bytes())?;
        trace!(raw = data.len(), compressed = compressed.len(), "gzip");
        Ok(BASE64.encode(compressed))
    }

    /// Decodes a base64 string and decompresses it
    pub fn unzip(data: &str) -> Result<String, UtilError> {
        let decoded = BASE64.decode(data.trim())?;
        let bytes = Self::decompress(&decoded)?;
        Ok(String::from_utf8(bytes)?)
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>, UtilError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(compressed: &[u8]) -> Result<Vec<u8>, UtilError> {
        let mut decoder = GzDecoder::new(compressed);
        let mut result = Vec::new();
        decoder.read_to_end(&mut result)?;
        Ok(result)
    }
}
