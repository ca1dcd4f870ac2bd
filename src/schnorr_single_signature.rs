use crate::blinding::blinded_base_mul;
use crate::constants::{BIP340_AUX_TAG, BIP340_NONCE_TAG, SCHNORR_SIGNATURE_SIZE};
use crate::errors::CryptoError;
use crate::keys_management::{KeyPair, XOnlyPublicKey};
use crate::secp_math::{
    array32, bip340_challenge, conditional_negate, decode_hex, has_even_y, is_identity,
    message_digest, scalar_from_bytes_checked, scalar_from_bytes_reduced, scalar_to_bytes,
    tagged_hash, x_bytes,
};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// BIP340 Schnorr signature: `(R.x, s)` where `R` has even Y.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SchnorrSignature {
    pub(crate) r_x: [u8; 32],
    pub(crate) s: Scalar,
}

impl SchnorrSignature {
    /// Signs a 32-byte message digest following BIP340:
    /// (R,s) = (kG, k + H(R.x,P.x,m)d)
    ///
    /// # Arguments
    ///
    /// * `message` - The 32-byte message digest.
    /// * `key_pair` - The key pair for signing.
    /// * `aux_rand` - 32 bytes of auxiliary randomness mixed into the nonce.
    /// * `rng` - Entropy for blinding the nonce multiplication.
    ///
    /// # Returns
    ///
    /// The signature, or an error for a malformed message or a failed entropy source.
    ///
    #[tracing::instrument(name = "Signing the message with BIP340 Schnorr signature", skip_all)]
    pub fn sign<R>(
        message: &[u8],
        key_pair: &KeyPair,
        aux_rand: &[u8; 32],
        rng: &mut R,
    ) -> Result<Self, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let message = message_digest(message)?;
        let d = key_pair.secret();
        let p_x = key_pair.public_key.to_bytes();

        let aux_hash = tagged_hash(BIP340_AUX_TAG, &[aux_rand]);
        let mut masked_key = Zeroizing::new(scalar_to_bytes(d));
        masked_key
            .iter_mut()
            .zip(aux_hash.iter())
            .for_each(|(byte, mask)| *byte ^= mask);

        let nonce_hash = Zeroizing::new(tagged_hash(
            BIP340_NONCE_TAG,
            &[masked_key.as_slice(), &p_x, &message],
        ));
        let k0 = Zeroizing::new(scalar_from_bytes_reduced(&nonce_hash));
        if bool::from(k0.is_zero()) {
            return Err(CryptoError::InvalidScalar);
        }

        let nonce_point = blinded_base_mul(&k0, rng)?.to_affine();
        let k = Zeroizing::new(conditional_negate(&k0, nonce_point.y_is_odd()));
        let r_x = x_bytes(&nonce_point);

        let e = bip340_challenge(&r_x, &p_x, &message);
        let s = *k + e * d;

        Ok(SchnorrSignature { r_x, s })
    }

    /// Verifies a BIP340 signature:
    /// sG - eP = R, with R.y even and R.x = r
    ///
    /// # Arguments
    ///
    /// * `public_key` - The X-only public key to verify the signature.
    /// * `message` - The 32-byte message digest that was signed.
    ///
    /// # Returns
    ///
    /// `true` if the signature is valid, `false` otherwise.
    ///
    #[tracing::instrument(name = "Verifying the BIP340 Schnorr signature", skip_all)]
    pub fn verify(&self, public_key: &XOnlyPublicKey, message: &[u8]) -> bool {
        let message = match message_digest(message) {
            Ok(message) => message,
            Err(_) => return false,
        };
        let e = bip340_challenge(&self.r_x, &public_key.to_bytes(), &message);

        let point = (ProjectivePoint::GENERATOR * self.s
            - ProjectivePoint::from(*public_key.as_affine()) * e)
            .to_affine();

        !is_identity(&point) && has_even_y(&point) && x_bytes(&point) == self.r_x
    }

    /// Parses `R.x || s`. Fails if `s >= n`; an invalid `R.x` only fails verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SCHNORR_SIGNATURE_SIZE {
            return Err(CryptoError::length(SCHNORR_SIGNATURE_SIZE, bytes.len()));
        }
        let r_x = array32(&bytes[..32])?;
        let s = scalar_from_bytes_checked(&array32(&bytes[32..])?)?;
        Ok(SchnorrSignature { r_x, s })
    }

    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode_hex(encoded)?)
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; SCHNORR_SIGNATURE_SIZE];
        out[..32].copy_from_slice(&self.r_x);
        out[32..].copy_from_slice(&scalar_to_bytes(&self.s));
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The X coordinate of the nonce point.
    pub fn r_x(&self) -> &[u8; 32] {
        &self.r_x
    }
}

impl TryFrom<Vec<u8>> for SchnorrSignature {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<SchnorrSignature> for Vec<u8> {
    fn from(signature: SchnorrSignature) -> Vec<u8> {
        signature.to_bytes().to_vec()
    }
}
