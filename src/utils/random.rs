use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, RngCore, SeedableRng};
use std::sync::Mutex;

pub trait RandomSource: Send + Sync {
    fn with_rng(&self, f: &mut dyn FnMut(&mut dyn RngCore));
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn with_rng(&self, f: &mut dyn FnMut(&mut dyn RngCore)) {
        f(&mut thread_rng());
    }
}

#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn with_rng(&self, f: &mut dyn FnMut(&mut dyn RngCore)) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *rng);
    }
}

pub fn shuffle<T>(source: &dyn RandomSource, items: &mut [T]) {
    source.with_rng(&mut |rng| items.shuffle(rng));
}
