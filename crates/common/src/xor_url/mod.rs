//! XOR-URL identifier codec.
//!
//! A XOR-URL addresses network content with a self-describing envelope:
//! a CID wrapping a multihash digest (the XoR name) and a codec code
//! that maps to either `raw` or `mime/<content-type>`. The text form is
//! multibase base32-lower.
//!
//! Decoding is lossless: the `raw` → `NONE` rule some callers want for
//! display lives in the report layer, never here, so a decoded
//! [`XorUrl`] always re-encodes to byte-equal text.

mod codecs;

pub use codecs::{MIME_CODEC_BASE, RAW_CODEC, SHA3_256};

use cid::{Cid, Version};
use multibase::Base;
use multihash::Multihash;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum XorUrlError {
    /// The text is not a valid multibase/CID envelope
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),
    /// The digest does not have the length the hash function declares
    #[error("digest length {actual} does not match {hash} ({expected} bytes)")]
    DigestLength {
        hash: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The envelope carries a codec code with no registered name
    #[error("unknown codec code {0:#x}")]
    UnknownCodec(u64),
    /// The envelope carries a hash-function code with no registered name
    #[error("unknown hash function code {0:#x}")]
    UnknownHash(u64),
    /// Re-encoding was asked for a codec name with no registered code
    #[error("unknown codec name '{0}'")]
    UnknownCodecName(String),
}

/// A decoded XOR-URL identifier. Immutable once decoded, except for the
/// type tag, which is asserted by the locator (its port component)
/// rather than by the envelope itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XorUrl {
    /// Numeric type tag from the locator, if one was asserted
    pub type_tag: Option<u64>,
    /// The XoR name: the multihash digest bytes
    pub address: Vec<u8>,
    /// Name of the hash function that produced the address
    pub hash_name: &'static str,
    /// Codec name: `raw` or `mime/<content-type>`
    pub codec: String,
    /// CID envelope version
    pub version: u64,
}

impl XorUrl {
    /// Decode the text form of an identifier.
    pub fn decode(text: &str) -> Result<Self, XorUrlError> {
        let cid =
            Cid::try_from(text).map_err(|e| XorUrlError::MalformedIdentifier(e.to_string()))?;

        let codec =
            codecs::codec_name(cid.codec()).ok_or(XorUrlError::UnknownCodec(cid.codec()))?;

        let hash = cid.hash();
        let (hash_name, expected) =
            codecs::hash_by_code(hash.code()).ok_or(XorUrlError::UnknownHash(hash.code()))?;
        let digest = hash.digest();
        if digest.len() != expected {
            return Err(XorUrlError::DigestLength {
                hash: hash_name,
                expected,
                actual: digest.len(),
            });
        }

        Ok(Self {
            type_tag: None,
            address: digest.to_vec(),
            hash_name,
            codec,
            version: match cid.version() {
                Version::V0 => 0,
                Version::V1 => 1,
            },
        })
    }

    /// Re-encode this identifier to its canonical text form.
    pub fn encode(&self) -> Result<String, XorUrlError> {
        let (hash_code, _) = codecs::hash_by_name(self.hash_name)
            .ok_or(XorUrlError::MalformedIdentifier(self.hash_name.to_string()))?;
        encode(hash_code, &self.address, &self.codec)
    }

    /// The content type the codec asserts, if any. `raw` content has no
    /// content type.
    pub fn content_type(&self) -> Option<&str> {
        self.codec.strip_prefix("mime/")
    }

    /// The address rendered as `0x`-prefixed hex.
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.address))
    }
}

/// Encode an identifier from its parts: hash-function code, digest and
/// codec name (`raw` or `mime/<content-type>`).
pub fn encode(hash_code: u64, digest: &[u8], codec: &str) -> Result<String, XorUrlError> {
    let codec_code =
        codecs::codec_code(codec).ok_or_else(|| XorUrlError::UnknownCodecName(codec.to_string()))?;

    let (hash_name, expected) =
        codecs::hash_by_code(hash_code).ok_or(XorUrlError::UnknownHash(hash_code))?;
    if digest.len() != expected {
        return Err(XorUrlError::DigestLength {
            hash: hash_name,
            expected,
            actual: digest.len(),
        });
    }

    let hash = Multihash::<64>::wrap(hash_code, digest)
        .map_err(|e| XorUrlError::MalformedIdentifier(e.to_string()))?;
    Cid::new_v1(codec_code, hash)
        .to_string_of_base(Base::Base32Lower)
        .map_err(|e| XorUrlError::MalformedIdentifier(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_raw_envelope() {
        let digest = [0xab; 32];
        let text = encode(SHA3_256, &digest, "raw").unwrap();

        let xor_url = XorUrl::decode(&text).unwrap();
        assert_eq!(xor_url.address, digest.to_vec());
        assert_eq!(xor_url.hash_name, "sha3-256");
        assert_eq!(xor_url.codec, "raw");
        assert_eq!(xor_url.content_type(), None);
        assert_eq!(xor_url.version, 1);
        assert_eq!(xor_url.type_tag, None);
    }

    #[test]
    fn test_decode_mime_envelope() {
        let digest = [7; 32];
        let text = encode(SHA3_256, &digest, "mime/text/html").unwrap();

        let xor_url = XorUrl::decode(&text).unwrap();
        assert_eq!(xor_url.codec, "mime/text/html");
        assert_eq!(xor_url.content_type(), Some("text/html"));
    }

    #[test]
    fn test_round_trip_is_byte_equal() {
        for codec in ["raw", "mime/text/html", "mime/application/json"] {
            let text = encode(SHA3_256, &[0x42; 32], codec).unwrap();
            let decoded = XorUrl::decode(&text).unwrap();
            assert_eq!(decoded.encode().unwrap(), text);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            XorUrl::decode("alice"),
            Err(XorUrlError::MalformedIdentifier(_))
        ));
        assert!(matches!(
            XorUrl::decode(""),
            Err(XorUrlError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_codec() {
        // dag-pb (0x70) is a valid multicodec but not registered here
        let hash = Multihash::<64>::wrap(SHA3_256, &[1; 32]).unwrap();
        let text = Cid::new_v1(0x70, hash)
            .to_string_of_base(Base::Base32Lower)
            .unwrap();
        assert_eq!(XorUrl::decode(&text), Err(XorUrlError::UnknownCodec(0x70)));
    }

    #[test]
    fn test_decode_rejects_digest_length_mismatch() {
        // sha3-256 declares 32 bytes; wrap 16
        let hash = Multihash::<64>::wrap(SHA3_256, &[1; 16]).unwrap();
        let text = Cid::new_v1(RAW_CODEC, hash)
            .to_string_of_base(Base::Base32Lower)
            .unwrap();
        assert_eq!(
            XorUrl::decode(&text),
            Err(XorUrlError::DigestLength {
                hash: "sha3-256",
                expected: 32,
                actual: 16,
            })
        );
    }

    #[test]
    fn test_encode_rejects_unknown_parts() {
        assert!(matches!(
            encode(SHA3_256, &[0; 32], "cbor"),
            Err(XorUrlError::UnknownCodecName(_))
        ));
        assert!(matches!(
            encode(0xff, &[0; 32], "raw"),
            Err(XorUrlError::UnknownHash(0xff))
        ));
        assert!(matches!(
            encode(SHA3_256, &[0; 31], "raw"),
            Err(XorUrlError::DigestLength { .. })
        ));
    }

    #[test]
    fn test_address_hex() {
        let text = encode(SHA3_256, &[0xff; 32], "raw").unwrap();
        let xor_url = XorUrl::decode(&text).unwrap();
        assert_eq!(xor_url.address_hex(), format!("0x{}", "ff".repeat(32)));
    }
}
