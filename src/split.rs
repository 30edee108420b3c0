use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Shuffle `0..n_samples` with a seeded RNG and split off the test share
///
/// The test set holds `ceil(n_samples * test_size)` indices; `test_size` is clamped to [0, 1].
/// Returns `(train, test)`.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_samples as f64) * test_size.clamp(0.0, 1.0)).ceil() as usize;
    let train = indices.split_off(n_test.min(n_samples));
    (train, indices)
}

/// Gather the items at `indices`
pub fn take<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}
