//! Isolation forest anomaly scoring.
//!
//! Each tree recursively partitions a random subsample on a random feature at
//! a random threshold. Anomalies are isolated in fewer splits, so their
//! average path length across the forest is short. Scores are normalized to
//! `2^(-E[h(x)] / c(psi))`: values near 1 are anomalous, values at or below 0.5
//! are normal.

use super::features::{Sample, FEATURE_COUNT};
use super::AnalysisError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Euler-Mascheroni constant, used to approximate harmonic numbers.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Score above which a sample is considered anomalous.
pub const ANOMALY_THRESHOLD: f64 = 0.5;

/// Training parameters for an isolation forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub trees: usize,
    /// Maximum subsample size per tree.
    pub max_samples: usize,
    /// Seed for the random number generator.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A trained isolation forest.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<Node>,
    subsample: usize,
}

impl IsolationForest {
    /// Trains a forest on the given samples.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientSamples`] if fewer than two
    /// samples are provided.
    pub fn fit(samples: &[Sample], params: ForestParams) -> Result<Self, AnalysisError> {
        if samples.len() < 2 {
            return Err(AnalysisError::InsufficientSamples {
                found: samples.len(),
            });
        }

        let subsample = params.max_samples.clamp(2, samples.len());
        let depth_limit = subsample.ilog2() as usize + usize::from(!subsample.is_power_of_two());
        let mut rng = StdRng::seed_from_u64(params.seed);

        let trees = (0..params.trees.max(1))
            .map(|_| {
                let picked: Vec<&Sample> =
                    rand::seq::index::sample(&mut rng, samples.len(), subsample)
                        .into_iter()
                        .map(|i| &samples[i])
                        .collect();
                build(&picked, 0, depth_limit, &mut rng)
            })
            .collect();

        Ok(Self { trees, subsample })
    }

    /// Returns the anomaly score of a sample in `(0, 1]`.
    #[must_use]
    pub fn score(&self, sample: &Sample) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let mean_path = self
            .trees
            .iter()
            .map(|tree| path_length(tree, sample, 0))
            .sum::<f64>()
            / self.trees.len() as f64;

        2f64.powf(-mean_path / average_path_length(self.subsample))
    }

    /// Returns true if the sample is predicted anomalous.
    #[must_use]
    pub fn is_anomaly(&self, sample: &Sample) -> bool {
        self.score(sample) > ANOMALY_THRESHOLD
    }
}

fn build(samples: &[&Sample], depth: usize, depth_limit: usize, rng: &mut StdRng) -> Node {
    if depth >= depth_limit || samples.len() <= 1 {
        return Node::Leaf {
            size: samples.len(),
        };
    }

    let splittable: Vec<(usize, f64, f64)> = (0..FEATURE_COUNT)
        .filter_map(|feature| {
            let (min, max) = samples.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
                (lo.min(s[feature]), hi.max(s[feature]))
            });
            (min < max).then_some((feature, min, max))
        })
        .collect();

    if splittable.is_empty() {
        return Node::Leaf {
            size: samples.len(),
        };
    }

    let (feature, min, max) = splittable[rng.gen_range(0..splittable.len())];
    // Interpolate rather than sample `min..max`: the span of two extreme
    // finite values overflows to infinity.
    let t: f64 = rng.gen();
    let threshold = min * (1.0 - t) + max * t;
    let (left, right): (Vec<&Sample>, Vec<&Sample>) =
        samples.iter().partition(|s| s[feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build(&left, depth + 1, depth_limit, rng)),
        right: Box::new(build(&right, depth + 1, depth_limit, rng)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn path_length(node: &Node, sample: &Sample, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            let next = if sample[*feature] < *threshold {
                left
            } else {
                right
            };
            path_length(next, sample, depth + 1)
        }
    }
}

/// Average path length of an unsuccessful binary search tree lookup over `n` items.
#[allow(clippy::cast_precision_loss)]
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}
