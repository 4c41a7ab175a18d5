//! Peppered token verifiers.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::auth::ApiTokenError;

type HmacSha256 = Hmac<Sha256>;

/// Keys an HMAC-SHA256 over token verifier input with a server-side pepper.
///
/// A leaked `api_tokens` table is not enough to mint or check tokens without the pepper.
#[derive(Clone)]
pub struct TokenVerifier {
    pepper: Zeroizing<Vec<u8>>,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(pepper: impl Into<Vec<u8>>) -> Self {
        Self {
            pepper: Zeroizing::new(pepper.into()),
        }
    }

    fn mac(&self, input: &[u8]) -> Result<HmacSha256, ApiTokenError> {
        let mut mac = HmacSha256::new_from_slice(self.pepper.as_slice())
            .map_err(|_error| ApiTokenError::InvalidVerifierKey)?;

        mac.update(input);

        Ok(mac)
    }

    /// Hex-encoded `HMAC-SHA256(pepper, input)`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiTokenError::InvalidVerifierKey`] if the pepper cannot key the MAC.
    pub fn hash(&self, input: &[u8]) -> Result<String, ApiTokenError> {
        Ok(hex::encode(self.mac(input)?.finalize().into_bytes()))
    }

    /// Checks `expected` against the MAC of `input` in constant time.
    ///
    /// Stored values that are not valid hex never verify.
    #[must_use]
    pub fn verify(&self, input: &[u8], expected: &str) -> bool {
        let Ok(expected) = hex::decode(expected) else {
            return false;
        };

        self.mac(input)
            .is_ok_and(|mac| mac.verify_slice(&expected).is_ok())
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenVerifier(**redacted**)")
    }
}
