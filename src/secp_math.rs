//! secp256k1 helpers shared by the BIP340, adaptor and EOTS code.
//!
//! Scalars and field elements are 32-byte big-endian. Points leave this
//! module either as 33-byte compressed encodings or as 32-byte X-only
//! (BIP340) encodings, and are never the point at infinity.
use crate::constants::{
    BIP340_CHALLENGE_TAG, COMPRESSED_POINT_SIZE, MESSAGE_SIZE, SCALAR_SIZE,
};
use crate::errors::CryptoError;
use k256::elliptic_curve::bigint::U256;
use k256::elliptic_curve::group::prime::PrimeCurveAffine;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, Scalar};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConditionallySelectable};

/// Returns a SHA-256 state primed with `SHA256(tag) || SHA256(tag)`.
pub fn tagged_hasher(tag: &[u8]) -> Sha256 {
    let tag_hash = Sha256::digest(tag);
    let mut digest = Sha256::new();
    digest.update(tag_hash);
    digest.update(tag_hash);
    digest
}

/// BIP340 tagged hash: `SHA256(SHA256(tag) || SHA256(tag) || data...)`.
pub fn tagged_hash(tag: &[u8], data: &[&[u8]]) -> [u8; 32] {
    let mut digest = tagged_hasher(tag);
    for chunk in data {
        digest.update(chunk);
    }
    digest.finalize().into()
}

/// Interprets 32 big-endian bytes as an integer reduced mod n. Never fails.
pub fn scalar_from_bytes_reduced(bytes: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
}

/// Parses a canonical scalar, rejecting values `>= n`.
pub fn scalar_from_bytes_checked(bytes: &[u8; 32]) -> Result<Scalar, CryptoError> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or(CryptoError::InvalidScalar)
}

/// Reduces 32 bytes mod n and rejects the zero scalar.
pub fn nonzero_scalar_from_bytes(bytes: &[u8; 32]) -> Result<Scalar, CryptoError> {
    let scalar = scalar_from_bytes_reduced(bytes);
    if bool::from(scalar.is_zero()) {
        return Err(CryptoError::InvalidScalar);
    }
    Ok(scalar)
}

pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; 32] {
    scalar.to_bytes().into()
}

/// Returns `-scalar` when `negate` is set, in constant time.
pub fn conditional_negate(scalar: &Scalar, negate: Choice) -> Scalar {
    Scalar::conditional_select(scalar, &-*scalar, negate)
}

/// 32-byte big-endian X coordinate.
pub fn x_bytes(point: &AffinePoint) -> [u8; 32] {
    point.x().into()
}

pub fn has_even_y(point: &AffinePoint) -> bool {
    !bool::from(point.y_is_odd())
}

pub fn is_identity(point: &AffinePoint) -> bool {
    bool::from(point.is_identity())
}

/// Negates the point if its Y coordinate is odd.
pub fn to_even_y(point: AffinePoint) -> AffinePoint {
    if has_even_y(&point) {
        point
    } else {
        -point
    }
}

/// SEC1 compressed encoding: `0x02`/`0x03` parity byte followed by X.
pub fn compress(point: &AffinePoint) -> [u8; 33] {
    let mut out = [0u8; COMPRESSED_POINT_SIZE];
    out[0] = if has_even_y(point) { 0x02 } else { 0x03 };
    out[1..].copy_from_slice(&x_bytes(point));
    out
}

/// Parses a 33-byte compressed point. Fails on a bad prefix, `X >= p`,
/// an X with no curve point, or the identity.
pub fn decompress(bytes: &[u8]) -> Result<AffinePoint, CryptoError> {
    if bytes.len() != COMPRESSED_POINT_SIZE {
        return Err(CryptoError::length(COMPRESSED_POINT_SIZE, bytes.len()));
    }
    let y_is_odd = match bytes[0] {
        0x02 => Choice::from(0),
        0x03 => Choice::from(1),
        _ => return Err(CryptoError::InvalidPoint),
    };
    let x = FieldBytes::from(array32(&bytes[1..])?);
    let point = Option::<AffinePoint>::from(AffinePoint::decompress(&x, y_is_odd))
        .ok_or(CryptoError::InvalidPoint)?;
    if is_identity(&point) {
        return Err(CryptoError::InvalidPoint);
    }
    Ok(point)
}

/// Decodes a hex string. Any decoding failure is [`CryptoError::InvalidHex`];
/// the length of the decoded bytes is left to the caller's `from_bytes`.
pub fn decode_hex(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(encoded).map_err(|_| CryptoError::InvalidHex)
}

/// BIP340 `lift_x`: the curve point with X coordinate `x` and even Y.
pub fn lift_x(x: &[u8; 32]) -> Result<AffinePoint, CryptoError> {
    Option::<AffinePoint>::from(AffinePoint::decompress(
        &FieldBytes::from(*x),
        Choice::from(0),
    ))
    .ok_or(CryptoError::InvalidPoint)
}

/// `e = int(hash_BIP0340/challenge(R.x || P.x || m)) mod n`
pub fn bip340_challenge(r_x: &[u8; 32], p_x: &[u8; 32], message: &[u8; 32]) -> Scalar {
    let digest = tagged_hash(BIP340_CHALLENGE_TAG, &[r_x, p_x, message]);
    scalar_from_bytes_reduced(&digest)
}

/// Checks that a message is a 32-byte digest.
pub fn message_digest(message: &[u8]) -> Result<[u8; 32], CryptoError> {
    message
        .try_into()
        .map_err(|_| CryptoError::length(MESSAGE_SIZE, message.len()))
}

pub(crate) fn array32(bytes: &[u8]) -> Result<[u8; 32], CryptoError> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::length(SCALAR_SIZE, bytes.len()))
}
