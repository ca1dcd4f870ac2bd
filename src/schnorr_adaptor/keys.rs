use crate::blinding::{blinded_base_mul, random_scalar};
use crate::constants::{MAX_SIGNING_ATTEMPTS, SCALAR_SIZE};
use crate::errors::CryptoError;
use crate::secp_math::{
    array32, compress, conditional_negate, decode_hex, decompress, is_identity,
    nonzero_scalar_from_bytes, scalar_to_bytes, to_even_y,
};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::{AffinePoint, ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// Encryption key `T` of an adaptor signature. Always affine with even Y.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct EncryptionKey {
    pub(crate) point: AffinePoint,
}

impl EncryptionKey {
    /// Adopts a point as an encryption key, negating it if its Y is odd.
    ///
    /// Fails with [`CryptoError::InvalidPoint`] for the identity.
    pub fn from_point(point: &ProjectivePoint) -> Result<Self, CryptoError> {
        let point = point.to_affine();
        if is_identity(&point) {
            return Err(CryptoError::InvalidPoint);
        }
        Ok(EncryptionKey {
            point: to_even_y(point),
        })
    }

    /// Parses a 33-byte compressed point. Both prefixes are accepted; an odd
    /// point is normalized the same way as [`EncryptionKey::from_point`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let point = decompress(bytes)?;
        Ok(EncryptionKey {
            point: to_even_y(point),
        })
    }

    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode_hex(encoded)?)
    }

    /// Compressed form. The prefix is always `0x02`.
    pub fn to_bytes(&self) -> [u8; 33] {
        compress(&self.point)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }
}

impl TryFrom<Vec<u8>> for EncryptionKey {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<EncryptionKey> for Vec<u8> {
    fn from(key: EncryptionKey) -> Vec<u8> {
        key.to_bytes().to_vec()
    }
}

/// Decryption key `t`: a nonzero scalar whose point `t * G` has even Y.
///
/// Holding it is enough to complete any pre-signature made under the
/// matching [`EncryptionKey`].
pub struct DecryptionKey {
    pub(crate) secret: Secret<Scalar>,
    pub(crate) encryption_key: EncryptionKey,
}

impl fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DecryptionKey {{ encryption_key: {} }}",
            self.encryption_key.to_hex()
        )
    }
}

impl Clone for DecryptionKey {
    fn clone(&self) -> Self {
        DecryptionKey {
            secret: Secret::new(*self.secret.expose_secret()),
            encryption_key: self.encryption_key,
        }
    }
}

impl ConstantTimeEq for DecryptionKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret.expose_secret().ct_eq(other.secret.expose_secret())
    }
}

impl PartialEq for DecryptionKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for DecryptionKey {}

impl DecryptionKey {
    /// Draws a fresh decryption key from `rng`.
    pub fn generate<R>(rng: &mut R) -> Result<Self, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        for _ in 0..MAX_SIGNING_ATTEMPTS {
            let candidate = random_scalar(rng)?;
            if bool::from(candidate.is_zero()) {
                continue;
            }
            return Self::from_scalar(Secret::new(candidate), rng);
        }
        Err(CryptoError::EntropyFailure)
    }

    /// Builds the key from a scalar, negating it if `t * G` has odd Y.
    ///
    /// Fails with [`CryptoError::InvalidScalar`] for zero.
    pub fn from_scalar<R>(scalar: Secret<Scalar>, rng: &mut R) -> Result<Self, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let point = blinded_base_mul(scalar.expose_secret(), rng)?.to_affine();
        let odd = point.y_is_odd();
        let secret = Secret::new(conditional_negate(scalar.expose_secret(), odd));
        Ok(DecryptionKey {
            secret,
            encryption_key: EncryptionKey {
                point: to_even_y(point),
            },
        })
    }

    /// Parses 32 big-endian bytes, reducing mod n. Zero is rejected.
    pub fn from_bytes<R>(bytes: &[u8], rng: &mut R) -> Result<Self, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if bytes.len() != SCALAR_SIZE {
            return Err(CryptoError::length(SCALAR_SIZE, bytes.len()));
        }
        let scalar = nonzero_scalar_from_bytes(&array32(bytes)?)?;
        Self::from_scalar(Secret::new(scalar), rng)
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(scalar_to_bytes(self.secret.expose_secret()))
    }

    pub fn encryption_key(&self) -> EncryptionKey {
        self.encryption_key
    }

    pub(crate) fn secret(&self) -> &Scalar {
        self.secret.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decryption_key_rejects_zero() {
        let mut rng = StdRng::seed_from_u64(20);
        assert_eq!(
            DecryptionKey::from_scalar(Secret::new(Scalar::ZERO), &mut rng).unwrap_err(),
            CryptoError::InvalidScalar
        );
        assert_eq!(
            DecryptionKey::from_bytes(&[0u8; 32], &mut rng).unwrap_err(),
            CryptoError::InvalidScalar
        );
        // n reduces to zero.
        assert_eq!(
            DecryptionKey::from_bytes(
                &hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"),
                &mut rng
            )
            .unwrap_err(),
            CryptoError::InvalidScalar
        );
    }

    #[test]
    fn test_encryption_key_rejects_identity() {
        assert_eq!(
            EncryptionKey::from_point(&ProjectivePoint::IDENTITY),
            Err(CryptoError::InvalidPoint)
        );
    }

    #[test]
    fn test_decryption_key_normalizes_both_parities() {
        let mut rng = StdRng::seed_from_u64(21);
        // 2 * G has even Y.
        let even = DecryptionKey::from_scalar(Secret::new(Scalar::from(2u64)), &mut rng).unwrap();
        assert_eq!(*even.secret(), Scalar::from(2u64));
        assert_eq!(
            even.encryption_key().to_hex(),
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"
        );

        // 6 * G has odd Y.
        let odd = DecryptionKey::from_scalar(Secret::new(Scalar::from(6u64)), &mut rng).unwrap();
        assert_eq!(*odd.secret(), -Scalar::from(6u64));
        let point = (ProjectivePoint::GENERATOR * odd.secret()).to_affine();
        assert_eq!(&point, odd.encryption_key().as_affine());
        assert_eq!(odd.encryption_key().to_bytes()[0], 0x02);
    }

    #[test]
    fn test_encryption_key_normalizes_odd_points() {
        let odd = (ProjectivePoint::GENERATOR * Scalar::from(6u64)).to_affine();
        assert!(bool::from(odd.y_is_odd()));

        let from_point = EncryptionKey::from_point(&ProjectivePoint::from(odd)).unwrap();
        assert_eq!(from_point.as_affine(), &-odd);

        let from_bytes = EncryptionKey::from_bytes(&compress(&odd)).unwrap();
        assert_eq!(from_bytes, from_point);
    }

    #[test]
    fn test_keys_round_trip() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..8 {
            let key = DecryptionKey::generate(&mut rng).unwrap();
            let parsed = DecryptionKey::from_bytes(&key.to_bytes()[..], &mut rng).unwrap();
            assert_eq!(parsed, key);
            assert_eq!(parsed.encryption_key(), key.encryption_key());

            let encryption_key = key.encryption_key();
            assert_eq!(
                EncryptionKey::from_hex(&encryption_key.to_hex()).unwrap(),
                encryption_key
            );
            let serialized = bincode::serialize(&encryption_key).unwrap();
            let deserialized: EncryptionKey = bincode::deserialize(&serialized).unwrap();
            assert_eq!(deserialized, encryption_key);
        }
    }

    #[test]
    fn test_encryption_key_parse_errors() {
        assert_eq!(
            EncryptionKey::from_bytes(&[0x02; 32]),
            Err(CryptoError::InvalidInputLength {
                expected: 33,
                actual: 32
            })
        );
        let mut off_curve = [0u8; 33];
        off_curve[0] = 0x02;
        off_curve[32] = 5;
        assert_eq!(
            EncryptionKey::from_bytes(&off_curve),
            Err(CryptoError::InvalidPoint)
        );
    }

    #[test]
    fn test_debug_hides_decryption_key() {
        let mut rng = StdRng::seed_from_u64(23);
        let key = DecryptionKey::generate(&mut rng).unwrap();
        let rendered = format!("{:?}", key);
        assert!(rendered.starts_with("DecryptionKey { encryption_key: "));
        assert!(!rendered.contains(&hex::encode(&key.to_bytes()[..])));
    }
}
