//! Codec and hash-function tables for the XOR-URL envelope.
//!
//! The envelope carries a numeric codec code; on the wire the network
//! uses the standard `raw` code plus an application range for
//! `mime/<content-type>` codecs. Only codes present in these tables are
//! considered well-formed.

/// Standard multicodec code for raw (untyped) content.
pub const RAW_CODEC: u64 = 0x55;

/// First code of the application range used for `mime/<content-type>`
/// codecs. Codes are assigned by position in [`MIME_TYPES`].
pub const MIME_CODEC_BASE: u64 = 0x0300_0000;

/// Multihash code for sha3-256, the network's address hash.
pub const SHA3_256: u64 = 0x16;

/// Content types with a registered `mime/` codec, in code order.
const MIME_TYPES: &[&str] = &[
    "text/html",
    "text/plain",
    "text/css",
    "text/markdown",
    "application/json",
    "application/javascript",
    "application/xml",
    "application/octet-stream",
    "application/pdf",
    "application/wasm",
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/svg+xml",
    "audio/mpeg",
    "video/mp4",
];

/// Known hash functions: (multihash code, name, digest length).
const HASHERS: &[(u64, &str, usize)] = &[
    (0x12, "sha2-256", 32),
    (0x13, "sha2-512", 64),
    (0x14, "sha3-512", 64),
    (0x15, "sha3-384", 48),
    (SHA3_256, "sha3-256", 32),
    (0x17, "sha3-224", 28),
    (0x1e, "blake3", 32),
];

/// Resolve a codec code to its name: `raw` or `mime/<content-type>`.
pub fn codec_name(code: u64) -> Option<String> {
    if code == RAW_CODEC {
        return Some("raw".to_string());
    }
    let index = code.checked_sub(MIME_CODEC_BASE)? as usize;
    MIME_TYPES.get(index).map(|mime| format!("mime/{}", mime))
}

/// Resolve a codec name back to its code.
pub fn codec_code(name: &str) -> Option<u64> {
    if name == "raw" {
        return Some(RAW_CODEC);
    }
    let mime = name.strip_prefix("mime/")?;
    MIME_TYPES
        .iter()
        .position(|candidate| *candidate == mime)
        .map(|index| MIME_CODEC_BASE + index as u64)
}

pub fn hash_by_code(code: u64) -> Option<(&'static str, usize)> {
    HASHERS
        .iter()
        .find(|(candidate, _, _)| *candidate == code)
        .map(|(_, name, len)| (*name, *len))
}

pub fn hash_by_name(name: &str) -> Option<(u64, usize)> {
    HASHERS
        .iter()
        .find(|(_, candidate, _)| *candidate == name)
        .map(|(code, _, len)| (*code, *len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_codec_round_trip() {
        assert_eq!(codec_name(RAW_CODEC).as_deref(), Some("raw"));
        assert_eq!(codec_code("raw"), Some(RAW_CODEC));
    }

    #[test]
    fn test_mime_codec_round_trip() {
        for (index, mime) in MIME_TYPES.iter().enumerate() {
            let code = MIME_CODEC_BASE + index as u64;
            let name = codec_name(code).unwrap();
            assert_eq!(name, format!("mime/{}", mime));
            assert_eq!(codec_code(&name), Some(code));
        }
    }

    #[test]
    fn test_unknown_codec_code() {
        assert_eq!(codec_name(0x71), None);
        assert_eq!(codec_name(MIME_CODEC_BASE + MIME_TYPES.len() as u64), None);
        assert_eq!(codec_code("mime/application/x-nonexistent"), None);
    }

    #[test]
    fn test_hash_tables_agree() {
        for (code, name, len) in HASHERS {
            assert_eq!(hash_by_code(*code), Some((*name, *len)));
            assert_eq!(hash_by_name(name), Some((*code, *len)));
        }
        assert_eq!(hash_by_code(0xff), None);
    }
}
