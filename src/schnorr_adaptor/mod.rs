//! Schnorr adaptor signatures compatible with BIP340.
//!
//! A signer pre-signs a message under an encryption key `T = t * G`. The
//! pre-signature verifies on its own but is not a valid signature; whoever
//! holds `t` completes it into a BIP340 signature, and anyone who sees both
//! the pre-signature and the completed signature learns `t`.
//!
//! Nonce derivation follows BIP340 with the `SchnorrAdaptor/aux` and
//! `SchnorrAdaptor/nonce` tags, and additionally commits to `T`.
mod adaptor_math;
pub mod keys;
pub mod signature;

pub use keys::{DecryptionKey, EncryptionKey};
pub use signature::AdaptorSignature;
