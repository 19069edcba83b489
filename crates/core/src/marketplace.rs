//! Marketplace account-deletion webhook: challenge handshake and
//! notification signature verification.
//!
//! The marketplace proves endpoint ownership with a challenge code and
//! signs every notification with ECDSA P-256. The signature header is
//! base64-encoded JSON naming the key id (`kid`) used for signing; the
//! public key itself is fetched separately by the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::pkcs8::DecodePublicKey;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Header carrying the notification signature.
pub const SIGNATURE_HEADER: &str = "x-ebay-signature";

const PEM_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_END: &str = "-----END PUBLIC KEY-----";
const PEM_LINE_WIDTH: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Signature header is not valid base64 JSON: {0}")]
    MalformedHeader(String),

    #[error("Public key could not be parsed")]
    MalformedKey,

    #[error("Signature could not be decoded")]
    MalformedSignature,

    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedDigest(String),

    #[error("Signature does not match payload")]
    Mismatch,
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

/// Hex SHA-256 of `challenge + token + endpoint`, byte for byte.
pub fn challenge_response(challenge: &str, verification_token: &str, endpoint_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(challenge.as_bytes());
    hasher.update(verification_token.as_bytes());
    hasher.update(endpoint_url.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Signature header
// ---------------------------------------------------------------------------

/// Decoded contents of the signature header.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SignatureHeader {
    pub kid: String,
    pub signature: String,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
}

impl SignatureHeader {
    /// Decode the base64 JSON header value.
    pub fn decode(value: &str) -> Result<Self, SignatureError> {
        let raw = STANDARD
            .decode(value.trim())
            .map_err(|e| SignatureError::MalformedHeader(e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| SignatureError::MalformedHeader(e.to_string()))
    }
}

/// Hash applied to the payload before ECDSA verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Parse a digest name such as `SHA1`, `sha-256`.
    pub fn parse(name: &str) -> Result<Self, SignatureError> {
        match name.trim().to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            _ => Err(SignatureError::UnsupportedDigest(name.to_string())),
        }
    }

    /// Pick the digest from the header, then the key record, then SHA-1.
    pub fn select(header: Option<&str>, key_record: Option<&str>) -> Result<Self, SignatureError> {
        match header.or(key_record) {
            Some(name) if !name.trim().is_empty() => Self::parse(name),
            _ => Ok(Self::default()),
        }
    }

    fn hash(self, payload: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(payload).to_vec(),
            Self::Sha256 => Sha256::digest(payload).to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Re-wrap a PEM public key at 64 columns.
///
/// The key-lookup service returns the PEM body on a single line, which
/// strict PEM parsers reject.
pub fn normalize_pem(key: &str) -> String {
    let body: String = key
        .replace(PEM_BEGIN, "")
        .replace(PEM_END, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(PEM_BEGIN);
    out.push('\n');
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(PEM_LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(PEM_END);
    out.push('\n');
    out
}

/// Verify a base64 DER ECDSA signature over `payload`.
pub fn verify_signature(
    public_key_pem: &str,
    signature_b64: &str,
    payload: &[u8],
    digest: DigestAlgorithm,
) -> Result<(), SignatureError> {
    let key = VerifyingKey::from_public_key_pem(&normalize_pem(public_key_pem))
        .map_err(|_| SignatureError::MalformedKey)?;
    let der = STANDARD
        .decode(signature_b64.trim())
        .map_err(|_| SignatureError::MalformedSignature)?;
    let signature = Signature::from_der(&der).map_err(|_| SignatureError::MalformedSignature)?;

    key.verify_prehash(&digest.hash(payload), &signature)
        .map_err(|_| SignatureError::Mismatch)
}
