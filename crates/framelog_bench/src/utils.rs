//! Benchmark utilities.

use rand::Rng;

/// Generate random payload data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a batch of payloads with the specified size.
pub fn generate_payloads(count: usize, payload_size: usize) -> Vec<Vec<u8>> {
    (0..count).map(|_| random_data(payload_size)).collect()
}
