use crate::blinding::{blinded_base_mul, random_scalar};
use crate::constants::{FIELD_ELEMENT_SIZE, MAX_SIGNING_ATTEMPTS, SCALAR_SIZE};
use crate::errors::CryptoError;
use crate::secp_math::{
    array32, decode_hex, lift_x, nonzero_scalar_from_bytes, scalar_to_bytes, x_bytes,
};
use k256::{AffinePoint, Scalar};
use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// One-time private randomness `k`. Signing two messages with it reveals the private key.
pub struct PrivateRand {
    pub(crate) secret: Secret<Scalar>,
}

impl fmt::Debug for PrivateRand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivateRand { .. }")
    }
}

impl Clone for PrivateRand {
    fn clone(&self) -> Self {
        PrivateRand {
            secret: Secret::new(*self.secret.expose_secret()),
        }
    }
}

impl PrivateRand {
    /// Parses 32 bytes, reducing mod n. Zero is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SCALAR_SIZE {
            return Err(CryptoError::length(SCALAR_SIZE, bytes.len()));
        }
        let scalar = nonzero_scalar_from_bytes(&array32(bytes)?)?;
        Ok(PrivateRand {
            secret: Secret::new(scalar),
        })
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(scalar_to_bytes(self.secret.expose_secret()))
    }

    /// The public randomness `(k * G).x`.
    pub fn public_rand<R>(&self, rng: &mut R) -> Result<PublicRand, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let point = blinded_base_mul(self.secret.expose_secret(), rng)?.to_affine();
        PublicRand::from_bytes(&x_bytes(&point))
    }

    pub(crate) fn secret(&self) -> &Scalar {
        self.secret.expose_secret()
    }
}

/// Public randomness `R.x`, committed to before signing.
///
/// Only the X coordinate is published; it is lifted to the even-Y point.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PublicRand {
    point: AffinePoint,
}

impl PublicRand {
    /// Parses a 32-byte X coordinate. Fails if no curve point has that X.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != FIELD_ELEMENT_SIZE {
            return Err(CryptoError::length(FIELD_ELEMENT_SIZE, bytes.len()));
        }
        let point = lift_x(&array32(bytes)?)?;
        Ok(PublicRand { point })
    }

    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode_hex(encoded)?)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        x_bytes(&self.point)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The even-Y point with this X coordinate.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }
}

impl TryFrom<Vec<u8>> for PublicRand {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<PublicRand> for Vec<u8> {
    fn from(pub_rand: PublicRand) -> Vec<u8> {
        pub_rand.to_bytes().to_vec()
    }
}

/// Draws fresh one-time randomness and its public commitment.
#[tracing::instrument(name = "Generating EOTS randomness", skip_all)]
pub fn rand_gen<R>(rng: &mut R) -> Result<(PrivateRand, PublicRand), CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let candidate = random_scalar(rng)?;
        if bool::from(candidate.is_zero()) {
            tracing::debug!(attempt, "drew zero randomness, retrying");
            continue;
        }
        let private_rand = PrivateRand {
            secret: Secret::new(candidate),
        };
        let public_rand = private_rand.public_rand(rng)?;
        return Ok((private_rand, public_rand));
    }
    tracing::warn!(attempts = MAX_SIGNING_ATTEMPTS, "no usable randomness drawn");
    Err(CryptoError::EntropyFailure)
}
