use extractable_schnorr::{AdaptorSignature, DecryptionKey, KeyPair};
use rand_core::OsRng;
use sha2::{Digest, Sha256};

fn main() {
    let mut csprng = OsRng;

    // Alice and Bob each hold a key on their own chain
    let alice = KeyPair::create(&mut csprng).expect("Error");
    let bob = KeyPair::create(&mut csprng).expect("Error");

    // Alice picks the swap secret and shares only the encryption key
    let swap_secret = DecryptionKey::generate(&mut csprng).expect("Error");
    let encryption_key = swap_secret.encryption_key();

    // Transactions to be signed, one on each chain
    let pay_bob = Sha256::digest(b"alice pays 1 BTC to bob");
    let pay_alice = Sha256::digest(b"bob pays 100 units to alice");

    // Both sides pre-sign their payment under the same encryption key
    let alice_pre_signature =
        AdaptorSignature::enc_sign(&alice, &encryption_key, &pay_bob, None, &mut csprng)
            .expect("Error");
    let bob_pre_signature =
        AdaptorSignature::enc_sign(&bob, &encryption_key, &pay_alice, None, &mut csprng)
            .expect("Error");

    // Each side checks the other's pre-signature before going further
    bob_pre_signature
        .enc_verify(&pay_alice, &bob.get_public_key(), &encryption_key)
        .expect("Error");
    alice_pre_signature
        .enc_verify(&pay_bob, &alice.get_public_key(), &encryption_key)
        .expect("Error");

    // Alice claims her payment, which publishes a BIP340 signature
    let alice_claim = bob_pre_signature.decrypt(&swap_secret);
    assert!(alice_claim.verify(&bob.get_public_key(), &pay_alice));

    // Bob learns the swap secret from the published signature and claims his side
    let learned_secret = bob_pre_signature
        .extract_decryption_key(&alice_claim, &mut csprng)
        .expect("Error");
    let bob_claim = alice_pre_signature.decrypt(&learned_secret);
    let result = bob_claim.verify(&alice.get_public_key(), &pay_bob);

    println!("Pre-signature: {}", alice_pre_signature.to_hex());
    println!("Completed signature: {}", bob_claim.to_hex());
    println!("Verification result: {:?}", result);
    assert!(result);
}
