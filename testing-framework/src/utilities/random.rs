// File: testing-framework/src/utilities/random.rs

use rand::Rng;

/// `len` random ASCII lowercase letters
pub fn random_lowercase(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(rng.gen_range(b'a'..=b'z'))).collect()
}
