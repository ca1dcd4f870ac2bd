//! Blinded base-point multiplication.
//!
//! Every product of a secret scalar with the generator goes through
//! [`blinded_base_mul`]. The secret `k` is split as `(k + r) - r` for a fresh
//! random `r`, so neither base multiplication sees `k` itself.
use crate::constants::SCALAR_SIZE;
use crate::errors::CryptoError;
use crate::secp_math::scalar_from_bytes_reduced;
use k256::elliptic_curve::Group;
use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Draws a uniformly distributed scalar from `rng`.
pub fn random_scalar<R>(rng: &mut R) -> Result<Scalar, CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
    rng.try_fill_bytes(&mut bytes[..])
        .map_err(|_| CryptoError::EntropyFailure)?;
    Ok(scalar_from_bytes_reduced(&bytes))
}

/// Computes `k * G` as `(k + r) * G + (-r) * G` with a per-call random `r`.
///
/// Fails with [`CryptoError::InvalidScalar`] for `k = 0` and with
/// [`CryptoError::EntropyFailure`] if the blinding scalar cannot be drawn.
pub fn blinded_base_mul<R>(k: &Scalar, rng: &mut R) -> Result<ProjectivePoint, CryptoError>
where
    R: CryptoRng + RngCore + ?Sized,
{
    if bool::from(k.is_zero()) {
        return Err(CryptoError::InvalidScalar);
    }
    let blinding = Zeroizing::new(random_scalar(rng)?);
    let masked = Zeroizing::new(*k + *blinding);

    let masked_point = (ProjectivePoint::GENERATOR * *masked).to_affine();
    let blinding_point = (ProjectivePoint::GENERATOR * -*blinding).to_affine();
    let point = ProjectivePoint::from(masked_point) + blinding_point;

    if bool::from(point.is_identity()) {
        return Err(CryptoError::InvalidPoint);
    }
    Ok(point)
}
