//! Usage: PKCE verifier/challenge and state generation for the code flow.

use crate::shared::error::OAuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

const VERIFIER_ENTROPY_BYTES: usize = 32;
const STATE_ENTROPY_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub(crate) struct PkcePair {
    pub(crate) code_verifier: String,
    pub(crate) code_challenge: String,
}

impl PkcePair {
    /// Mint a fresh verifier/challenge pair for one authorization attempt.
    pub(crate) fn generate() -> Result<Self, OAuthError> {
        let mut random = [0u8; VERIFIER_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut random)
            .map_err(|_| OAuthError::FailedCodeVerifier)?;

        let code_verifier = URL_SAFE_NO_PAD.encode(random);
        let code_challenge = code_challenge_s256(&code_verifier);

        Ok(Self {
            code_verifier,
            code_challenge,
        })
    }
}

pub(crate) fn code_challenge_s256(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// CSRF state: 32 random bytes, hex-encoded.
pub(crate) fn generate_state() -> Result<String, OAuthError> {
    let mut bytes = [0u8; STATE_ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| OAuthError::FailedCodeVerifier)?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
