//! Extractable one-time signatures (EOTS).
//!
//! EOTS is BIP340 Schnorr with the nonce published ahead of time as public
//! randomness `R.x`. A signer who uses the same randomness for two different
//! messages hands out two equations in the same unknowns, and anyone can
//! solve them for the long-term private key:
//!
//! - Signing: s = k + H(R.x,P.x,m)x
//! - Verification: sG = R + H(R.x,P.x,m)P
//! - Extraction: x = (s1 - s2) / (e1 - e2)
pub mod eots_math;
pub mod keys;
pub mod rand_nonce;

pub use eots_math::{
    extract, extract_from_messages, sign, sign_message, verify, verify_message, Signature,
};
pub use keys::{key_gen, pub_gen, PrivateKey};
pub use rand_nonce::{rand_gen, PrivateRand, PublicRand};
