use crate::blinding::{blinded_base_mul, random_scalar};
use crate::constants::{MAX_SIGNING_ATTEMPTS, XONLY_PUBLIC_KEY_SIZE};
use crate::errors::CryptoError;
use crate::secp_math::{
    array32, conditional_negate, decode_hex, lift_x, scalar_from_bytes_checked, x_bytes,
};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::{AffinePoint, Scalar};
use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// A BIP340 public key: a curve point with even Y, serialized as its X coordinate.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct XOnlyPublicKey {
    point: AffinePoint,
}

impl XOnlyPublicKey {
    /// Lifts a 32-byte X coordinate to the even-Y point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != XONLY_PUBLIC_KEY_SIZE {
            return Err(CryptoError::length(XONLY_PUBLIC_KEY_SIZE, bytes.len()));
        }
        let point = lift_x(&array32(bytes)?)?;
        Ok(XOnlyPublicKey { point })
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

    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Wraps a point already known to have even Y.
    pub(crate) fn from_even_point(point: AffinePoint) -> Self {
        XOnlyPublicKey { point }
    }
}

impl TryFrom<Vec<u8>> for XOnlyPublicKey {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<XOnlyPublicKey> for Vec<u8> {
    fn from(key: XOnlyPublicKey) -> Vec<u8> {
        key.to_bytes().to_vec()
    }
}

/// A BIP340 key pair.
///
/// The private key is stored parity-normalized: if `x * G` has odd Y the
/// stored scalar is `-x`, so `private_key * G` always equals the lifted
/// public key.
pub struct KeyPair {
    pub(crate) private_key: Secret<Scalar>,
    pub public_key: XOnlyPublicKey,
}

use std::fmt;
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the KeyPair struct without including private_key
        write!(f, "KeyPair {{ public_key: {} }}", self.public_key.to_hex())
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        let private_key_clone = Secret::new(*self.private_key.expose_secret());
        let public_key_clone = self.public_key;

        KeyPair {
            private_key: private_key_clone,
            public_key: public_key_clone,
        }
    }
}

impl KeyPair {
    /// Generates a fresh key pair from `rng`.
    pub fn create<R>(rng: &mut R) -> Result<KeyPair, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        for _ in 0..MAX_SIGNING_ATTEMPTS {
            let candidate = random_scalar(rng)?;
            if bool::from(candidate.is_zero()) {
                continue;
            }
            return Self::create_from_private_key(Secret::new(candidate), rng);
        }
        Err(CryptoError::EntropyFailure)
    }

    /// Builds a key pair from a nonzero private scalar, negating it if the
    /// public point has odd Y.
    pub fn create_from_private_key<R>(
        private_key: Secret<Scalar>,
        rng: &mut R,
    ) -> Result<KeyPair, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let point = blinded_base_mul(private_key.expose_secret(), rng)?.to_affine();
        let odd = point.y_is_odd();
        let normalized = Secret::new(conditional_negate(private_key.expose_secret(), odd));
        let public_key = if bool::from(odd) { -point } else { point };
        Ok(KeyPair {
            private_key: normalized,
            public_key: XOnlyPublicKey::from_even_point(public_key),
        })
    }

    /// Parses a 32-byte private key. Zero and values `>= n` are rejected.
    pub fn from_bytes<R>(bytes: &[u8], rng: &mut R) -> Result<KeyPair, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let scalar = scalar_from_bytes_checked(&array32(bytes)?)?;
        Self::create_from_private_key(Secret::new(scalar), rng)
    }

    pub fn get_public_key(&self) -> XOnlyPublicKey {
        self.public_key
    }

    /// The parity-normalized private scalar `d`.
    pub(crate) fn secret(&self) -> &Scalar {
        self.private_key.expose_secret()
    }
}
