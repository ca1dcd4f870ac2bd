//! Entropy sources for exercising failure paths in unit tests.
use rand::{CryptoRng, RngCore};
use rand_core::{impls, Error};

/// An entropy source whose `try_fill_bytes` always fails.
pub(crate) struct BrokenRng;

impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 {
        0
    }
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), Error> {
        Err(Error::new("entropy source unavailable"))
    }
}

impl CryptoRng for BrokenRng {}
