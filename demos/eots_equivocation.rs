use extractable_schnorr::eots;
use rand_core::OsRng;

fn main() {
    let mut csprng = OsRng;

    // A finality provider registers its key and commits to randomness for one height
    let private_key = eots::key_gen(&mut csprng).expect("Error");
    let public_key = eots::pub_gen(&private_key, &mut csprng).expect("Error");
    let (private_rand, pub_rand) = eots::rand_gen(&mut csprng).expect("Error");

    // An honest vote verifies against the committed randomness
    let vote = b"height 1000: block aa";
    let signature = eots::sign_message(&private_key, &private_rand, vote, &mut csprng)
        .expect("Error");
    eots::verify_message(&public_key, &pub_rand, vote, &signature).expect("Error");

    // Voting for a conflicting block at the same height reuses the randomness
    let conflicting_vote = b"height 1000: block bb";
    let conflicting_signature =
        eots::sign_message(&private_key, &private_rand, conflicting_vote, &mut csprng)
            .expect("Error");

    // Anyone holding both votes recovers the private key
    let extracted = eots::extract_from_messages(
        &public_key,
        &pub_rand,
        vote,
        &signature,
        conflicting_vote,
        &conflicting_signature,
    )
    .expect("Error");

    let result = extracted == private_key;
    println!("Public randomness: {}", pub_rand.to_hex());
    println!("Extraction result: {:?}", result);
    assert!(result);
}
