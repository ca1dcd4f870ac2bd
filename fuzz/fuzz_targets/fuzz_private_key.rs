#![no_main]

use libfuzzer_sys::fuzz_target;

use extractable_schnorr::{AdaptorSignature, DecryptionKey, KeyPair};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

fuzz_target!(|data: &[u8]| {
    // Message to be signed
    let message = Sha256::digest(b"Hello world");

    // Randomness source
    let mut seeded_rng = StdRng::seed_from_u64(123);

    let private_key: [u8; 32] = Sha256::digest(data).into();
    let Ok(keys) = KeyPair::from_bytes(&private_key, &mut seeded_rng) else {
        return;
    };
    let decryption_key = DecryptionKey::generate(&mut seeded_rng).expect("Error");
    let encryption_key = decryption_key.encryption_key();

    let pre_signature =
        AdaptorSignature::enc_sign(&keys, &encryption_key, &message, None, &mut seeded_rng)
            .expect("Error");
    pre_signature
        .enc_verify(&message, &keys.get_public_key(), &encryption_key)
        .expect("Error");

    let signature = pre_signature.decrypt(&decryption_key);
    assert!(signature.verify(&keys.get_public_key(), &message));

    let recovered = pre_signature
        .extract_decryption_key(&signature, &mut seeded_rng)
        .expect("Error");
    assert!(recovered == decryption_key);
});
