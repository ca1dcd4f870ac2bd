use crate::blinding::{blinded_base_mul, random_scalar};
use crate::constants::{MAX_SIGNING_ATTEMPTS, SCALAR_SIZE};
use crate::errors::CryptoError;
use crate::keys_management::XOnlyPublicKey;
use crate::secp_math::{
    array32, conditional_negate, scalar_from_bytes_checked, scalar_to_bytes, to_even_y,
};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::Scalar;
use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// Long-term EOTS signing key `x`.
pub struct PrivateKey {
    pub(crate) secret: Secret<Scalar>,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivateKey { .. }")
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        PrivateKey {
            secret: Secret::new(*self.secret.expose_secret()),
        }
    }
}

impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret.expose_secret().ct_eq(other.secret.expose_secret())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PrivateKey {}

impl PrivateKey {
    /// Parses a 32-byte scalar as is. Zero and values `>= n` are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SCALAR_SIZE {
            return Err(CryptoError::length(SCALAR_SIZE, bytes.len()));
        }
        let scalar = scalar_from_bytes_checked(&array32(bytes)?)?;
        if bool::from(scalar.is_zero()) {
            return Err(CryptoError::InvalidScalar);
        }
        Ok(PrivateKey {
            secret: Secret::new(scalar),
        })
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(scalar_to_bytes(self.secret.expose_secret()))
    }

    /// The BIP340 public key of this private key.
    pub fn public_key<R>(&self, rng: &mut R) -> Result<XOnlyPublicKey, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        pub_gen(self, rng)
    }

    pub(crate) fn secret(&self) -> &Scalar {
        self.secret.expose_secret()
    }
}

/// Generates a long-term private key.
///
/// The key is returned parity-normalized: `x * G` has even Y, so `x` is
/// exactly the scalar that extraction recovers.
#[tracing::instrument(name = "Generating an EOTS private key", skip_all)]
pub fn key_gen<R>(rng: &mut R) -> Result<PrivateKey, CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let candidate = Zeroizing::new(random_scalar(rng)?);
        if bool::from(candidate.is_zero()) {
            tracing::debug!(attempt, "drew a zero private key, retrying");
            continue;
        }
        let point = blinded_base_mul(&candidate, rng)?.to_affine();
        return Ok(PrivateKey {
            secret: Secret::new(conditional_negate(&candidate, point.y_is_odd())),
        });
    }
    tracing::warn!(attempts = MAX_SIGNING_ATTEMPTS, "no usable private key drawn");
    Err(CryptoError::EntropyFailure)
}

/// Computes the BIP340 public key `x * G` with Y forced even.
pub fn pub_gen<R>(private_key: &PrivateKey, rng: &mut R) -> Result<XOnlyPublicKey, CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let point = blinded_base_mul(private_key.secret(), rng)?.to_affine();
    Ok(XOnlyPublicKey::from_even_point(to_even_y(point)))
}
