//! # Extractable Schnorr Library
//!
//! This Rust library provides BIP340-compatible Schnorr adaptor signatures and extractable one-time signatures (EOTS) over secp256k1, built on the k256 library.
//!
//! ## Overview of BIP340 Schnorr Signatures
//!
//! BIP340 fixes a Schnorr signature scheme for Bitcoin. Public keys are 32-byte X coordinates, and every point that is hashed or serialized is normalized to even Y: a scalar whose point has odd Y is negated first.
//!
//! - Key Pair Generation: a private key d with public key P = dG, where d is negated if P has odd Y.
//! - Signing: (R,s) = (kG, k + H(R.x,P.x,m)d), with the nonce k derived from d, the message and auxiliary randomness.
//! - Verification: sG - H(R.x,P.x,m)P = R, with R.y even and R.x equal to the first half of the signature.
//!
//! ## Adaptor Signatures
//!
//! An adaptor pre-signature commits to a message under an encryption key T = tG:
//!
//! - Pre-signing: (R0,s) = (kG + T, k + H(R0.x,P.x,m)d), with k negated if R0 has odd Y
//! - Pre-signature verification: R0 -/+ (sG - eP) = T
//! - Decryption: s' = s +/- t turns (R0,s) into the BIP340 signature (R0.x, s')
//! - Extraction: t = +/-(s' - s), so publishing the completed signature reveals t
//!
//! ## Extractable One-Time Signatures
//!
//! EOTS signers publish the X coordinate of their nonce point ahead of time. Signing two different messages with the same nonce reveals the long-term key:
//!
//! - Signing: s = k + H(R.x,P.x,m)x
//! - Verification: sG = R + H(R.x,P.x,m)P
//! - Extraction: x = (s1 - s2) / (e1 - e2)
//!
//! ## Side channels
//!
//! Every multiplication of a secret scalar by the generator goes through [`blinding::blinded_base_mul`], which splits the scalar with a fresh random mask. All entropy is injected by the caller as a `rand::CryptoRng + rand::RngCore`.
//!
//! ## Usage
//!
//! To use this library in your Rust project, include it as a dependency and refer to the provided functions and types in your code. The `demos/` directory shows an atomic swap driven by adaptor signatures and an EOTS equivocation being punished.

pub mod blinding;
pub mod constants;
pub mod eots;
pub mod errors;
pub mod keys_management;
pub mod schnorr_adaptor;
pub mod schnorr_single_signature;
pub mod secp_math;

#[cfg(feature = "tracing")]
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_rng;

pub use crate::errors::CryptoError;
pub use crate::keys_management::{KeyPair, XOnlyPublicKey};
pub use crate::schnorr_adaptor::{AdaptorSignature, DecryptionKey, EncryptionKey};
pub use crate::schnorr_single_signature::SchnorrSignature;
