use crate::constants::{ADAPTOR_AUX_TAG, ADAPTOR_NONCE_TAG};
use crate::secp_math::{scalar_from_bytes_reduced, scalar_to_bytes, tagged_hash};
use k256::elliptic_curve::point::AffineCoordinates;
use k256::{AffinePoint, ProjectivePoint, Scalar};
use zeroize::Zeroizing;

// Hashes the auxiliary randomness for a signing attempt.
//
// Attempt 0 hashes `aux` alone. Later attempts append the attempt counter as
// four big-endian bytes, so each retry yields an unrelated nonce while the
// whole sequence stays reproducible from `aux`.
pub(crate) fn aux_hash(aux: &[u8; 32], attempt: u32) -> [u8; 32] {
    if attempt == 0 {
        tagged_hash(ADAPTOR_AUX_TAG, &[aux])
    } else {
        tagged_hash(ADAPTOR_AUX_TAG, &[aux, &attempt.to_be_bytes()])
    }
}

// Derives the raw nonce k0 for one signing attempt:
// u  = bytes(d) XOR hash_aux(aux)
// k0 = int(hash_nonce(u || enc(T) || P.x || m)) mod n
//
// The result may be zero, in which case the caller retries.
pub(crate) fn derive_nonce(
    d: &Scalar,
    aux: &[u8; 32],
    attempt: u32,
    encryption_key: &[u8; 33],
    p_x: &[u8; 32],
    message: &[u8; 32],
) -> Zeroizing<Scalar> {
    let mask = aux_hash(aux, attempt);
    let mut masked_key = Zeroizing::new(scalar_to_bytes(d));
    masked_key
        .iter_mut()
        .zip(mask.iter())
        .for_each(|(byte, mask)| *byte ^= mask);

    let nonce_hash = Zeroizing::new(tagged_hash(
        ADAPTOR_NONCE_TAG,
        &[masked_key.as_slice(), encryption_key, p_x, message],
    ));
    Zeroizing::new(scalar_from_bytes_reduced(&nonce_hash))
}

// Recovers T' from a pre-signature:
// R' = sG - eP
// T' = R0 - R' if R0 has even Y, R0 + R' otherwise
//
// Returns `None` if R' or T' is the identity.
pub(crate) fn recover_encryption_point(
    r0: &AffinePoint,
    s: &Scalar,
    e: &Scalar,
    public_key: &AffinePoint,
) -> Option<AffinePoint> {
    let r_prime = ProjectivePoint::GENERATOR * s - ProjectivePoint::from(*public_key) * e;
    if r_prime == ProjectivePoint::IDENTITY {
        return None;
    }
    let t_prime = if bool::from(r0.y_is_odd()) {
        ProjectivePoint::from(*r0) + r_prime
    } else {
        ProjectivePoint::from(*r0) - r_prime
    };
    if t_prime == ProjectivePoint::IDENTITY {
        return None;
    }
    Some(t_prime.to_affine())
}
