//! Sampler
//!
//! Seeded ordering of a window's records into mini-batches for one training
//! epoch.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

// A sampler decides which records feed each gradient step of an epoch.
pub trait Sampler {
    /// Split the index into batches, consuming randomness from `rng`.
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> Vec<Vec<usize>>;
}

pub struct MiniBatchSampler {
    batch_size: usize,
}

impl MiniBatchSampler {
    pub fn new(batch_size: usize) -> Self {
        MiniBatchSampler {
            batch_size: batch_size.max(1),
        }
    }
}

impl Sampler for MiniBatchSampler {
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> Vec<Vec<usize>> {
        let mut shuffled = index.to_vec();
        shuffled.shuffle(rng);
        shuffled.chunks(self.batch_size).map(|c| c.to_vec()).collect()
    }
}
