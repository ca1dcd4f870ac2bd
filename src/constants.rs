//! Sizes, hash tags and limits shared by the signing schemes.

/// Size of a serialized scalar (big-endian, reduced mod n).
pub const SCALAR_SIZE: usize = 32;

/// Size of a serialized field element (big-endian).
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Size of a SEC1 compressed point: parity byte followed by the X coordinate.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Size of a BIP340 X-only public key.
pub const XONLY_PUBLIC_KEY_SIZE: usize = 32;

/// Size of a message digest accepted by the signing primitives.
pub const MESSAGE_SIZE: usize = 32;

/// Size of a BIP340 signature: `R.x || s`.
pub const SCHNORR_SIGNATURE_SIZE: usize = 64;

/// Size of an adaptor pre-signature: compressed `R0 || s`.
pub const ADAPTOR_SIGNATURE_SIZE: usize = COMPRESSED_POINT_SIZE + SCALAR_SIZE;

/// Size of an EOTS signature in its BIP340 form: `R.x || s`.
pub const EOTS_SIGNATURE_SIZE: usize = FIELD_ELEMENT_SIZE + SCALAR_SIZE;

pub const BIP340_CHALLENGE_TAG: &[u8] = b"BIP0340/challenge";
pub const BIP340_AUX_TAG: &[u8] = b"BIP0340/aux";
pub const BIP340_NONCE_TAG: &[u8] = b"BIP0340/nonce";
pub const ADAPTOR_AUX_TAG: &[u8] = b"SchnorrAdaptor/aux";
pub const ADAPTOR_NONCE_TAG: &[u8] = b"SchnorrAdaptor/nonce";

/// Upper bound on nonce re-derivations inside a single signing call.
///
/// A retry only happens when a derived nonce is zero or the masked nonce
/// point is the identity, so hitting this limit means the entropy source
/// is broken.
pub const MAX_SIGNING_ATTEMPTS: u32 = 16;
