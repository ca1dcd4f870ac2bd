use super::adaptor_math::{derive_nonce, recover_encryption_point};
use super::keys::{DecryptionKey, EncryptionKey};
use crate::blinding::blinded_base_mul;
use crate::constants::{ADAPTOR_SIGNATURE_SIZE, COMPRESSED_POINT_SIZE, MAX_SIGNING_ATTEMPTS};
use crate::errors::CryptoError;
use crate::keys_management::{KeyPair, XOnlyPublicKey};
use crate::schnorr_single_signature::SchnorrSignature;
use crate::secp_math::{
    array32, bip340_challenge, compress, conditional_negate, decode_hex, decompress, is_identity,
    message_digest, scalar_from_bytes_checked, scalar_to_bytes, x_bytes,
};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::{AffinePoint, Scalar};
use rand::{CryptoRng, RngCore};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Schnorr adaptor pre-signature `(R0, s)`.
///
/// `R0 = R + T` is the masked nonce point. Completing the pre-signature with
/// the decryption key of `T` yields the BIP340 signature `(R0.x, s')`.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct AdaptorSignature {
    r0: AffinePoint,
    s: Scalar,
}

impl AdaptorSignature {
    /// Pre-signs a 32-byte message under an encryption key:
    /// (R0,s) = (k0G + T, k + H(R0.x,P.x,m)d), with k = -k0 if R0 has odd Y
    ///
    /// # Arguments
    ///
    /// * `key_pair` - The signer's BIP340 key pair.
    /// * `encryption_key` - The encryption key `T` the signature is locked to.
    /// * `message` - The 32-byte message digest.
    /// * `aux_rand` - Auxiliary randomness. When `None`, 32 bytes are drawn from `rng`.
    /// * `rng` - Entropy for the default auxiliary randomness and for blinding.
    ///
    /// # Returns
    ///
    /// The pre-signature. The output is deterministic given an explicit `aux_rand`.
    ///
    #[tracing::instrument(name = "Pre-signing the message with an adaptor signature", skip_all)]
    pub fn enc_sign<R>(
        key_pair: &KeyPair,
        encryption_key: &EncryptionKey,
        message: &[u8],
        aux_rand: Option<&[u8; 32]>,
        rng: &mut R,
    ) -> Result<Self, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let message = message_digest(message)?;
        let aux = match aux_rand {
            Some(aux) => *aux,
            None => {
                let mut aux = [0u8; 32];
                rng.try_fill_bytes(&mut aux)
                    .map_err(|_| CryptoError::EntropyFailure)?;
                aux
            }
        };

        let d = key_pair.secret();
        let p_x = key_pair.public_key.to_bytes();
        let t_bytes = encryption_key.to_bytes();

        for attempt in 0..MAX_SIGNING_ATTEMPTS {
            let k0 = derive_nonce(d, &aux, attempt, &t_bytes, &p_x, &message);
            if bool::from(k0.is_zero()) {
                tracing::debug!(attempt, "derived nonce is zero, retrying");
                continue;
            }

            let r0 = (blinded_base_mul(&k0, rng)? + *encryption_key.as_affine()).to_affine();
            if is_identity(&r0) {
                tracing::debug!(attempt, "masked nonce point is the identity, retrying");
                continue;
            }

            let k = Zeroizing::new(conditional_negate(&k0, r0.y_is_odd()));
            let e = bip340_challenge(&x_bytes(&r0), &p_x, &message);
            let s = *k + e * d;

            let signature = AdaptorSignature { r0, s };
            match signature.enc_verify(&message, &key_pair.public_key, encryption_key) {
                Ok(()) => return Ok(signature),
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "pre-signature failed self-check, retrying");
                }
            }
        }

        tracing::warn!(
            attempts = MAX_SIGNING_ATTEMPTS,
            "no usable nonce found for the pre-signature"
        );
        Err(CryptoError::EntropyFailure)
    }

    /// Checks that the pre-signature was made by `public_key` over `message`
    /// and locked to `encryption_key`.
    ///
    /// Recovers `T' = R0 -/+ (sG - eP)` and compares it with `T`. A `T'`
    /// matching in X but not in Y reports [`CryptoError::ParityMismatch`].
    #[tracing::instrument(name = "Verifying the adaptor pre-signature", skip_all)]
    pub fn enc_verify(
        &self,
        message: &[u8],
        public_key: &XOnlyPublicKey,
        encryption_key: &EncryptionKey,
    ) -> Result<(), CryptoError> {
        let message = message_digest(message)?;
        if bool::from(self.s.is_zero()) {
            return Err(CryptoError::InvalidScalar);
        }
        if is_identity(&self.r0) {
            return Err(CryptoError::InvalidPoint);
        }

        let e = bip340_challenge(&x_bytes(&self.r0), &public_key.to_bytes(), &message);
        let t_prime = recover_encryption_point(&self.r0, &self.s, &e, public_key.as_affine())
            .ok_or(CryptoError::SignatureVerificationFailed)?;

        let expected = encryption_key.as_affine();
        if x_bytes(&t_prime) != x_bytes(expected) {
            return Err(CryptoError::SignatureVerificationFailed);
        }
        if t_prime != *expected {
            return Err(CryptoError::ParityMismatch);
        }
        Ok(())
    }

    /// Completes the pre-signature into a BIP340 signature:
    /// s' = s + t if R0 has even Y, s - t otherwise
    #[tracing::instrument(name = "Decrypting the adaptor pre-signature", skip_all)]
    pub fn decrypt(&self, decryption_key: &DecryptionKey) -> SchnorrSignature {
        let t = Zeroizing::new(conditional_negate(
            decryption_key.secret(),
            self.r0.y_is_odd(),
        ));
        SchnorrSignature {
            r_x: x_bytes(&self.r0),
            s: self.s + *t,
        }
    }

    /// Recovers the decryption scalar from the pre-signature and its completed signature:
    /// t = s - s0 if R0 has even Y, s0 - s otherwise
    ///
    /// The scalar is returned as found, without parity normalization. Use
    /// [`AdaptorSignature::extract_decryption_key`] to get a [`DecryptionKey`].
    #[tracing::instrument(name = "Extracting the decryption key", skip_all)]
    pub fn extract(&self, signature: &SchnorrSignature) -> Result<Secret<Scalar>, CryptoError> {
        if bool::from(self.s.is_zero()) || bool::from(signature.s.is_zero()) {
            return Err(CryptoError::InvalidScalar);
        }
        if signature.r_x != x_bytes(&self.r0) {
            return Err(CryptoError::SignatureVerificationFailed);
        }

        let difference = signature.s - self.s;
        let t = conditional_negate(&difference, self.r0.y_is_odd());
        if bool::from(t.is_zero()) {
            return Err(CryptoError::InvalidScalar);
        }
        Ok(Secret::new(t))
    }

    /// [`AdaptorSignature::extract`] followed by parity normalization.
    pub fn extract_decryption_key<R>(
        &self,
        signature: &SchnorrSignature,
        rng: &mut R,
    ) -> Result<DecryptionKey, CryptoError>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        DecryptionKey::from_scalar(self.extract(signature)?, rng)
    }

    /// Parses `compressed(R0) || s`. Fails on a malformed or identity point
    /// and on `s >= n`.
    ///
    /// A non-canonical `s` is rejected on purpose rather than reduced mod n:
    /// `enc_sign` never emits one, and rejecting it keeps the encoding unique.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != ADAPTOR_SIGNATURE_SIZE {
            return Err(CryptoError::length(ADAPTOR_SIGNATURE_SIZE, bytes.len()));
        }
        let r0 = decompress(&bytes[..COMPRESSED_POINT_SIZE])?;
        let s = scalar_from_bytes_checked(&array32(&bytes[COMPRESSED_POINT_SIZE..])?)?;
        Ok(AdaptorSignature { r0, s })
    }

    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode_hex(encoded)?)
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; ADAPTOR_SIGNATURE_SIZE];
        out[..COMPRESSED_POINT_SIZE].copy_from_slice(&compress(&self.r0));
        out[COMPRESSED_POINT_SIZE..].copy_from_slice(&scalar_to_bytes(&self.s));
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The masked nonce point `R0`.
    pub fn nonce_point(&self) -> &AffinePoint {
        &self.r0
    }
}

impl TryFrom<Vec<u8>> for AdaptorSignature {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<AdaptorSignature> for Vec<u8> {
    fn from(signature: AdaptorSignature) -> Vec<u8> {
        signature.to_bytes().to_vec()
    }
}
