#![no_main]

use libfuzzer_sys::fuzz_target;

use extractable_schnorr::{AdaptorSignature, EncryptionKey, KeyPair};
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary bytes never panics
    let parsed = AdaptorSignature::from_bytes(data);
    let _ = EncryptionKey::from_bytes(data);

    if let Ok(pre_signature) = parsed {
        assert_eq!(pre_signature.to_bytes().as_slice(), data);

        // A parsed pre-signature only verifies for the key that made it
        let mut seeded_rng = StdRng::seed_from_u64(123);
        let keys = KeyPair::create(&mut seeded_rng).expect("Error");
        let encryption_key = EncryptionKey::from_bytes(&data[..33]).expect("Error");
        assert!(pre_signature
            .enc_verify(&[0u8; 32], &keys.get_public_key(), &encryption_key)
            .is_err());
    }
});
