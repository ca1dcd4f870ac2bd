use super::keys::PrivateKey;
use super::rand_nonce::{PrivateRand, PublicRand};
use crate::blinding::blinded_base_mul;
use crate::constants::{EOTS_SIGNATURE_SIZE, FIELD_ELEMENT_SIZE, SCALAR_SIZE};
use crate::errors::CryptoError;
use crate::keys_management::XOnlyPublicKey;
use crate::schnorr_single_signature::SchnorrSignature;
use crate::secp_math::{
    array32, bip340_challenge, conditional_negate, decode_hex, message_digest, scalar_from_bytes_checked,
    scalar_to_bytes, x_bytes,
};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// EOTS signature: the response scalar `s`. The nonce `R.x` is the public
/// randomness committed to in advance.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Signature {
    s: Scalar,
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SCALAR_SIZE {
            return Err(CryptoError::length(SCALAR_SIZE, bytes.len()));
        }
        let s = scalar_from_bytes_checked(&array32(bytes)?)?;
        Ok(Signature { s })
    }

    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode_hex(encoded)?)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        scalar_to_bytes(&self.s)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The 64-byte `(R.x, s)` form, which verifies as a BIP340 signature.
    pub fn to_schnorr_signature(&self, pub_rand: &PublicRand) -> SchnorrSignature {
        SchnorrSignature {
            r_x: pub_rand.to_bytes(),
            s: self.s,
        }
    }

    /// Serializes the BIP340 form as `R.x || s`.
    pub fn to_bytes_with_rand(&self, pub_rand: &PublicRand) -> [u8; EOTS_SIGNATURE_SIZE] {
        let mut out = [0u8; EOTS_SIGNATURE_SIZE];
        out[..FIELD_ELEMENT_SIZE].copy_from_slice(&pub_rand.to_bytes());
        out[FIELD_ELEMENT_SIZE..].copy_from_slice(&self.to_bytes());
        out
    }
}

impl TryFrom<Vec<u8>> for Signature {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<Signature> for Vec<u8> {
    fn from(signature: Signature) -> Vec<u8> {
        signature.to_bytes().to_vec()
    }
}

/// Signs a 32-byte message under one-time randomness:
/// s = k + H(R.x,P.x,m)d, with k and d negated when R or P has odd Y
///
/// # Arguments
///
/// * `private_key` - The long-term signing key.
/// * `private_rand` - The one-time randomness whose public part was committed.
/// * `message` - The 32-byte message digest.
/// * `rng` - Entropy for blinding the base multiplications.
///
#[tracing::instrument(name = "Signing the message with EOTS", skip_all)]
pub fn sign<R>(
    private_key: &PrivateKey,
    private_rand: &PrivateRand,
    message: &[u8],
    rng: &mut R,
) -> Result<Signature, CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let message = message_digest(message)?;

    let r = blinded_base_mul(private_rand.secret(), rng)?.to_affine();
    let k = Zeroizing::new(conditional_negate(private_rand.secret(), r.y_is_odd()));

    let p = blinded_base_mul(private_key.secret(), rng)?.to_affine();
    let d = Zeroizing::new(conditional_negate(private_key.secret(), p.y_is_odd()));

    let e = bip340_challenge(&x_bytes(&r), &x_bytes(&p), &message);
    Ok(Signature { s: *k + e * *d })
}

/// Verifies an EOTS signature: sG = R + H(R.x,P.x,m)P
#[tracing::instrument(name = "Verifying the EOTS signature", skip_all)]
pub fn verify(
    public_key: &XOnlyPublicKey,
    pub_rand: &PublicRand,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    let message = message_digest(message)?;
    let e = bip340_challenge(&pub_rand.to_bytes(), &public_key.to_bytes(), &message);

    let lhs = ProjectivePoint::GENERATOR * signature.s;
    let rhs = ProjectivePoint::from(*pub_rand.as_affine())
        + ProjectivePoint::from(*public_key.as_affine()) * e;
    if lhs != rhs {
        return Err(CryptoError::SignatureVerificationFailed);
    }
    Ok(())
}

/// Recovers the private key from two signatures made with the same randomness:
/// x = (s1 - s2) / (e1 - e2)
///
/// Both signatures are verified first. The recovered `x` satisfies
/// `x * G = lift_x(P.x)`, so a key from [`super::key_gen`] comes back unchanged.
#[tracing::instrument(name = "Extracting the EOTS private key", skip_all)]
pub fn extract(
    public_key: &XOnlyPublicKey,
    pub_rand: &PublicRand,
    message_1: &[u8],
    signature_1: &Signature,
    message_2: &[u8],
    signature_2: &Signature,
) -> Result<PrivateKey, CryptoError> {
    let message_1 = message_digest(message_1)?;
    let message_2 = message_digest(message_2)?;
    if message_1 == message_2 {
        return Err(CryptoError::EquivocationOnSameMessage);
    }
    verify(public_key, pub_rand, &message_1, signature_1)?;
    verify(public_key, pub_rand, &message_2, signature_2)?;

    let r_x = pub_rand.to_bytes();
    let p_x = public_key.to_bytes();
    let e_1 = bip340_challenge(&r_x, &p_x, &message_1);
    let e_2 = bip340_challenge(&r_x, &p_x, &message_2);

    let denominator = Option::<Scalar>::from((e_1 - e_2).invert())
        .ok_or(CryptoError::SignatureVerificationFailed)?;
    // Both signatures verify against the even-Y lifts of R and P, so
    // (s1 - s2) G = (e1 - e2) P and the quotient is already parity-fixed.
    let x = (signature_1.s - signature_2.s) * denominator;
    if bool::from(x.is_zero()) {
        return Err(CryptoError::InvalidScalar);
    }
    Ok(PrivateKey {
        secret: Secret::new(x),
    })
}

/// [`sign`] over the SHA-256 digest of an arbitrary message.
pub fn sign_message<R>(
    private_key: &PrivateKey,
    private_rand: &PrivateRand,
    message: &[u8],
    rng: &mut R,
) -> Result<Signature, CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    sign(private_key, private_rand, &Sha256::digest(message), rng)
}

/// [`verify`] over the SHA-256 digest of an arbitrary message.
pub fn verify_message(
    public_key: &XOnlyPublicKey,
    pub_rand: &PublicRand,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    verify(public_key, pub_rand, &Sha256::digest(message), signature)
}

/// [`extract`] over the SHA-256 digests of two arbitrary messages.
pub fn extract_from_messages(
    public_key: &XOnlyPublicKey,
    pub_rand: &PublicRand,
    message_1: &[u8],
    signature_1: &Signature,
    message_2: &[u8],
    signature_2: &Signature,
) -> Result<PrivateKey, CryptoError> {
    extract(
        public_key,
        pub_rand,
        &Sha256::digest(message_1),
        signature_1,
        &Sha256::digest(message_2),
        signature_2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eots::{key_gen, pub_gen, rand_gen};
    use hex_literal::hex;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use secrecy::ExposeSecret;

    fn padded(text: &[u8]) -> [u8; 32] {
        let mut message = [0u8; 32];
        message[..text.len()].copy_from_slice(text);
        message
    }

    #[test]
    fn test_equivocation_reveals_private_key() {
        let mut rng = StdRng::seed_from_u64(70);
        let private_key = key_gen(&mut rng).unwrap();
        let public_key = pub_gen(&private_key, &mut rng).unwrap();
        let (private_rand, pub_rand) = rand_gen(&mut rng).unwrap();

        let alpha = padded(b"alpha");
        let beta = padded(b"beta");
        let signature_1 = sign(&private_key, &private_rand, &alpha, &mut rng).unwrap();
        let signature_2 = sign(&private_key, &private_rand, &beta, &mut rng).unwrap();

        let extracted = extract(
            &public_key,
            &pub_rand,
            &alpha,
            &signature_1,
            &beta,
            &signature_2,
        )
        .unwrap();
        assert_eq!(extracted, private_key);
    }

    #[test]
    fn test_sign_verify_extract_random_keys() {
        let mut rng = StdRng::seed_from_u64(71);
        for _ in 0..32 {
            let private_key = key_gen(&mut rng).unwrap();
            let public_key = pub_gen(&private_key, &mut rng).unwrap();
            let (private_rand, pub_rand) = rand_gen(&mut rng).unwrap();
            let message_1: [u8; 32] = rng.gen();
            let message_2: [u8; 32] = rng.gen();

            let signature_1 = sign(&private_key, &private_rand, &message_1, &mut rng).unwrap();
            let signature_2 = sign(&private_key, &private_rand, &message_2, &mut rng).unwrap();
            assert_eq!(verify(&public_key, &pub_rand, &message_1, &signature_1), Ok(()));
            assert_eq!(verify(&public_key, &pub_rand, &message_2, &signature_2), Ok(()));

            let extracted = extract(
                &public_key,
                &pub_rand,
                &message_1,
                &signature_1,
                &message_2,
                &signature_2,
            )
            .unwrap();
            assert_eq!(extracted, private_key);
        }
    }

    #[test]
    fn test_odd_keys_and_randomness_are_normalized() {
        let mut rng = StdRng::seed_from_u64(72);
        // 6 * G has odd Y for both the key and the randomness.
        let private_key = PrivateKey::from_bytes(&hex!(
            "0000000000000000000000000000000000000000000000000000000000000006"
        ))
        .unwrap();
        let private_rand = PrivateRand::from_bytes(&hex!(
            "0000000000000000000000000000000000000000000000000000000000000006"
        ))
        .unwrap();
        let public_key = private_key.public_key(&mut rng).unwrap();
        let pub_rand = private_rand.public_rand(&mut rng).unwrap();

        let signature_1 = sign(&private_key, &private_rand, &[1u8; 32], &mut rng).unwrap();
        let signature_2 = sign(&private_key, &private_rand, &[2u8; 32], &mut rng).unwrap();
        assert!(verify(&public_key, &pub_rand, &[1u8; 32], &signature_1).is_ok());

        let extracted = extract(
            &public_key,
            &pub_rand,
            &[1u8; 32],
            &signature_1,
            &[2u8; 32],
            &signature_2,
        )
        .unwrap();
        assert_eq!(*extracted.secret.expose_secret(), -Scalar::from(6u64));
    }

    #[test]
    fn test_sign_rejects_zero_randomness() {
        assert_eq!(
            PrivateRand::from_bytes(&[0u8; 32]).unwrap_err(),
            CryptoError::InvalidScalar
        );

        let mut rng = StdRng::seed_from_u64(73);
        let private_key = key_gen(&mut rng).unwrap();
        let zero_rand = PrivateRand {
            secret: Secret::new(Scalar::ZERO),
        };
        assert_eq!(
            sign(&private_key, &zero_rand, &[0u8; 32], &mut rng),
            Err(CryptoError::InvalidScalar)
        );
    }

    #[test]
    fn test_verification_failures() {
        let mut rng = StdRng::seed_from_u64(74);
        let private_key = key_gen(&mut rng).unwrap();
        let public_key = pub_gen(&private_key, &mut rng).unwrap();
        let other_key = pub_gen(&key_gen(&mut rng).unwrap(), &mut rng).unwrap();
        let (private_rand, pub_rand) = rand_gen(&mut rng).unwrap();
        let (_, other_rand) = rand_gen(&mut rng).unwrap();
        let message = [9u8; 32];

        let signature = sign(&private_key, &private_rand, &message, &mut rng).unwrap();
        assert_eq!(
            verify(&public_key, &pub_rand, &[8u8; 32], &signature),
            Err(CryptoError::SignatureVerificationFailed)
        );
        assert_eq!(
            verify(&other_key, &pub_rand, &message, &signature),
            Err(CryptoError::SignatureVerificationFailed)
        );
        assert_eq!(
            verify(&public_key, &other_rand, &message, &signature),
            Err(CryptoError::SignatureVerificationFailed)
        );
        assert_eq!(
            sign(&private_key, &private_rand, b"not a digest", &mut rng),
            Err(CryptoError::InvalidInputLength {
                expected: 32,
                actual: 12
            })
        );
    }

    #[test]
    fn test_extract_rejections() {
        let mut rng = StdRng::seed_from_u64(75);
        let private_key = key_gen(&mut rng).unwrap();
        let public_key = pub_gen(&private_key, &mut rng).unwrap();
        let (private_rand, pub_rand) = rand_gen(&mut rng).unwrap();
        let (other_private_rand, _) = rand_gen(&mut rng).unwrap();

        let signature_1 = sign(&private_key, &private_rand, &[1u8; 32], &mut rng).unwrap();
        assert_eq!(
            extract(
                &public_key,
                &pub_rand,
                &[1u8; 32],
                &signature_1,
                &[1u8; 32],
                &signature_1
            )
            .unwrap_err(),
            CryptoError::EquivocationOnSameMessage
        );

        let unrelated = sign(&private_key, &other_private_rand, &[2u8; 32], &mut rng).unwrap();
        assert_eq!(
            extract(
                &public_key,
                &pub_rand,
                &[1u8; 32],
                &signature_1,
                &[2u8; 32],
                &unrelated
            )
            .unwrap_err(),
            CryptoError::SignatureVerificationFailed
        );
    }

    #[test]
    fn test_arbitrary_messages() {
        let mut rng = StdRng::seed_from_u64(76);
        let private_key = key_gen(&mut rng).unwrap();
        let public_key = pub_gen(&private_key, &mut rng).unwrap();
        let (private_rand, pub_rand) = rand_gen(&mut rng).unwrap();

        let vote_1 = b"finality vote for block 1000 hash aa";
        let vote_2 = b"finality vote for block 1000 hash bb";
        let signature_1 = sign_message(&private_key, &private_rand, vote_1, &mut rng).unwrap();
        let signature_2 = sign_message(&private_key, &private_rand, vote_2, &mut rng).unwrap();
        assert!(verify_message(&public_key, &pub_rand, vote_1, &signature_1).is_ok());
        assert!(verify_message(&public_key, &pub_rand, vote_2, &signature_1).is_err());

        let extracted = extract_from_messages(
            &public_key,
            &pub_rand,
            vote_1,
            &signature_1,
            vote_2,
            &signature_2,
        )
        .unwrap();
        assert_eq!(extracted, private_key);
    }

    #[test]
    fn test_signature_is_bip340_compatible() {
        let mut rng = StdRng::seed_from_u64(77);
        let private_key = key_gen(&mut rng).unwrap();
        let public_key = pub_gen(&private_key, &mut rng).unwrap();
        let (private_rand, pub_rand) = rand_gen(&mut rng).unwrap();
        let message = [0x77; 32];

        let signature = sign(&private_key, &private_rand, &message, &mut rng).unwrap();
        let schnorr = signature.to_schnorr_signature(&pub_rand);
        assert!(schnorr.verify(&public_key, &message));
        assert_eq!(&schnorr.to_bytes()[..32], &pub_rand.to_bytes());
        assert_eq!(signature.to_bytes_with_rand(&pub_rand), schnorr.to_bytes());
        assert_eq!(
            SchnorrSignature::from_bytes(&signature.to_bytes_with_rand(&pub_rand)).unwrap(),
            schnorr
        );
        assert_eq!(Signature::from_hex("xx"), Err(CryptoError::InvalidHex));

        assert_eq!(Signature::from_hex(&signature.to_hex()).unwrap(), signature);
        let serialized = bincode::serialize(&signature).unwrap();
        let deserialized: Signature = bincode::deserialize(&serialized).unwrap();
        assert_eq!(deserialized, signature);
    }
}
