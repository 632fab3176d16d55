//! Shot allocation across measurement groups
//!
//! An operator's terms are partitioned into simultaneously-measurable
//! groups; a shot allocator decides how a total shot budget is spread over
//! them. Allocation is a pure, pluggable policy: deterministic for
//! identical inputs, non-negative everywhere, and explicit about whether
//! the allocated total matches the request.

use num_complex::Complex64;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::operator::{CommutablePauliSet, Operator};

/// A measurement group paired with its allocated shots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliSamplingSetting {
    /// The simultaneously-measurable terms
    pub pauli_set: CommutablePauliSet,
    /// Shots allocated to this group (may be zero)
    pub n_shots: usize,
}

/// Distributes a shot budget over commuting Pauli groups
///
/// Implementations are deterministic given the same inputs, never return
/// negative allocations, preserve group order, and document how the
/// allocated total relates to the requested total.
pub trait PauliShotsAllocator {
    /// Allocate `total_shots` across `pauli_sets` of `operator`
    fn allocate(
        &self,
        operator: &Operator,
        pauli_sets: &[CommutablePauliSet],
        total_shots: usize,
    ) -> Vec<PauliSamplingSetting>;
}

/// Distributes a shot budget over raw weights
///
/// The companion of [`PauliShotsAllocator`] for callers that already
/// reduced their groups to scalar weights. Same determinism and
/// non-negativity contract.
pub trait WeightedShotsAllocator {
    /// Allocate `total_shots` proportionally to the magnitudes of `weights`
    fn allocate(&self, weights: &[Complex64], total_shots: usize) -> Vec<usize>;
}

/// Summed coefficient magnitude of an operator's terms inside one group
fn set_weight(operator: &Operator, pauli_set: &CommutablePauliSet) -> f64 {
    pauli_set
        .iter()
        .map(|string| operator.coefficient(string).norm())
        .sum()
}

/// Floor-rounded proportional split of `total` over `weights`
///
/// All-zero weights allocate nothing.
fn proportional_split(weights: &[f64], total: usize) -> Vec<usize> {
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        return vec![0; weights.len()];
    }
    weights
        .iter()
        .map(|weight| (weight / sum * total as f64).floor() as usize)
        .collect()
}

/// Gives every group the same share of the budget
///
/// Each group receives `⌊total_shots / n⌋` shots. The allocated total is an
/// upper-bounded policy: at most `total_shots`, with the division remainder
/// discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquipartitionShotsAllocator;

impl PauliShotsAllocator for EquipartitionShotsAllocator {
    fn allocate(
        &self,
        _operator: &Operator,
        pauli_sets: &[CommutablePauliSet],
        total_shots: usize,
    ) -> Vec<PauliSamplingSetting> {
        if pauli_sets.is_empty() {
            return Vec::new();
        }
        let per_set = total_shots / pauli_sets.len();
        pauli_sets
            .iter()
            .map(|set| PauliSamplingSetting {
                pauli_set: set.clone(),
                n_shots: per_set,
            })
            .collect()
    }
}

/// Weights each group by the coefficient magnitude it carries
///
/// A group's weight is the summed `|coefficient|` of the operator terms it
/// contains (for the weighted variant, the magnitude of each raw weight).
/// Shares are floor-rounded, so the allocated total is an upper-bounded
/// policy: at most `total_shots`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalShotsAllocator;

impl PauliShotsAllocator for ProportionalShotsAllocator {
    fn allocate(
        &self,
        operator: &Operator,
        pauli_sets: &[CommutablePauliSet],
        total_shots: usize,
    ) -> Vec<PauliSamplingSetting> {
        let weights: Vec<f64> = pauli_sets
            .iter()
            .map(|set| set_weight(operator, set))
            .collect();
        pauli_sets
            .iter()
            .zip(proportional_split(&weights, total_shots))
            .map(|(set, n_shots)| PauliSamplingSetting {
                pauli_set: set.clone(),
                n_shots,
            })
            .collect()
    }
}

impl WeightedShotsAllocator for ProportionalShotsAllocator {
    fn allocate(&self, weights: &[Complex64], total_shots: usize) -> Vec<usize> {
        let magnitudes: Vec<f64> = weights.iter().map(|w| w.norm()).collect();
        proportional_split(&magnitudes, total_shots)
    }
}

/// Draws shot batches at random, biased by weight magnitude
///
/// Shots are assigned in batches of `shot_unit`, each batch going to one
/// group drawn from a weighted distribution. The RNG is reconstructed from
/// the stored seed on every call, so identical inputs always produce the
/// identical allocation. The allocated total equals `total_shots` rounded
/// down to a multiple of `shot_unit` (exactly `total_shots` for the
/// default unit of 1). All-zero weights allocate nothing.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRandomShotsAllocator {
    seed: u64,
    shot_unit: usize,
}

impl WeightedRandomShotsAllocator {
    /// Allocator assigning one shot per draw
    pub fn new(seed: u64) -> Self {
        Self { seed, shot_unit: 1 }
    }

    /// Allocator assigning `shot_unit` shots per draw
    ///
    /// A zero unit is treated as 1.
    pub fn with_shot_unit(seed: u64, shot_unit: usize) -> Self {
        Self {
            seed,
            shot_unit: shot_unit.max(1),
        }
    }

    fn allocate_magnitudes(&self, magnitudes: &[f64], total_shots: usize) -> Vec<usize> {
        let mut counts = vec![0; magnitudes.len()];
        let distribution = match WeightedIndex::new(magnitudes) {
            Ok(distribution) => distribution,
            Err(_) => return counts,
        };
        let mut rng = StdRng::seed_from_u64(self.seed);
        for _ in 0..(total_shots / self.shot_unit) {
            counts[distribution.sample(&mut rng)] += self.shot_unit;
        }
        counts
    }
}

impl WeightedShotsAllocator for WeightedRandomShotsAllocator {
    fn allocate(&self, weights: &[Complex64], total_shots: usize) -> Vec<usize> {
        let magnitudes: Vec<f64> = weights.iter().map(|w| w.norm()).collect();
        self.allocate_magnitudes(&magnitudes, total_shots)
    }
}

impl PauliShotsAllocator for WeightedRandomShotsAllocator {
    fn allocate(
        &self,
        operator: &Operator,
        pauli_sets: &[CommutablePauliSet],
        total_shots: usize,
    ) -> Vec<PauliSamplingSetting> {
        let magnitudes: Vec<f64> = pauli_sets
            .iter()
            .map(|set| set_weight(operator, set))
            .collect();
        pauli_sets
            .iter()
            .zip(self.allocate_magnitudes(&magnitudes, total_shots))
            .map(|(set, n_shots)| PauliSamplingSetting {
                pauli_set: set.clone(),
                n_shots,
            })
            .collect()
    }
}
