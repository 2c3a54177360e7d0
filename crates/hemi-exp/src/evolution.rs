//! Differential evolution (`best1bin`) over box bounds.
//!
//! The population lives in the unit hypercube and is mapped to the bounds
//! for every objective call. Initialisation is a Latin hypercube; each
//! generation draws one dithered mutation factor, mutates from the current
//! best with one random difference vector and applies binomial crossover.
//! Trial components that leave the unit cube are re-drawn uniformly. The
//! search stops when the standard deviation of the population energies falls
//! below `atol + tolerance × |mean|`.

use hemi_core::errors::{ErrorInfo, HemiError};
use hemi_core::{GlobalOptimizer, Objective, OptimizationOutcome, RngHandle};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

const INIT_STREAM: u64 = 0;
const EVOLVE_STREAM: u64 = 1;

/// Differential evolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialEvolution {
    /// Population members per dimension.
    #[serde(default = "DifferentialEvolution::default_population")]
    pub population_per_dim: usize,
    /// Dithering range of the mutation factor.
    #[serde(default = "DifferentialEvolution::default_mutation")]
    pub mutation: (f64, f64),
    /// Crossover probability.
    #[serde(default = "DifferentialEvolution::default_recombination")]
    pub recombination: f64,
    /// Relative convergence tolerance on the population energy spread.
    #[serde(default = "DifferentialEvolution::default_tolerance")]
    pub tolerance: f64,
    /// Absolute convergence tolerance on the population energy spread.
    #[serde(default)]
    pub atol: f64,
    /// Generation budget.
    #[serde(default = "DifferentialEvolution::default_max_iterations")]
    pub max_iterations: usize,
    /// Master seed.
    #[serde(default)]
    pub seed: u64,
}

impl DifferentialEvolution {
    const fn default_population() -> usize {
        15
    }

    const fn default_mutation() -> (f64, f64) {
        (0.5, 1.0)
    }

    const fn default_recombination() -> f64 {
        0.7
    }

    const fn default_tolerance() -> f64 {
        1e-6
    }

    const fn default_max_iterations() -> usize {
        10_000
    }

    /// Default settings with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self {
            population_per_dim: Self::default_population(),
            mutation: Self::default_mutation(),
            recombination: Self::default_recombination(),
            tolerance: Self::default_tolerance(),
            atol: 0.0,
            max_iterations: Self::default_max_iterations(),
            seed: 0,
        }
    }
}

fn bounds_error(message: &str) -> HemiError {
    HemiError::Optimizer(ErrorInfo::new("optimizer-bounds", message))
}

fn validate_bounds(bounds: &[(f64, f64)]) -> Result<(), HemiError> {
    if bounds.is_empty() {
        return Err(bounds_error("at least one bounded parameter is required"));
    }
    for (idx, (lo, hi)) in bounds.iter().enumerate() {
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(bounds_error("bounds must be finite with lo <= hi")
                .with_context("index", idx.to_string())
                .with_context("lo", lo.to_string())
                .with_context("hi", hi.to_string()));
        }
    }
    Ok(())
}

struct Evaluator<'o, 'f> {
    objective: &'o mut Objective<'f>,
    bounds: &'o [(f64, f64)],
    evaluations: usize,
}

impl Evaluator<'_, '_> {
    fn scale(&self, unit: &[f64]) -> Vec<f64> {
        unit.iter()
            .zip(self.bounds)
            .map(|(u, (lo, hi))| lo + u * (hi - lo))
            .collect()
    }

    fn energy(&mut self, unit: &[f64]) -> Result<f64, HemiError> {
        let params = self.scale(unit);
        self.evaluations += 1;
        let value = (self.objective)(&params)?;
        Ok(if value.is_nan() { f64::INFINITY } else { value })
    }
}

fn latin_hypercube(rng: &mut RngHandle, members: usize, dims: usize) -> Vec<Vec<f64>> {
    let segment = 1.0 / members as f64;
    let mut population = vec![vec![0.0; dims]; members];
    for dim in 0..dims {
        let mut slots: Vec<f64> = (0..members)
            .map(|idx| segment * (idx as f64 + rng.uniform(0.0, 1.0)))
            .collect();
        slots.shuffle(rng);
        for (member, value) in population.iter_mut().zip(slots) {
            member[dim] = value;
        }
    }
    population
}

fn spread_converged(energies: &[f64], atol: f64, tolerance: f64) -> bool {
    if energies.iter().any(|e| !e.is_finite()) {
        return false;
    }
    let n = energies.len() as f64;
    let mean = energies.iter().sum::<f64>() / n;
    let variance = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() <= atol + tolerance * mean.abs()
}

impl GlobalOptimizer for DifferentialEvolution {
    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        bounds: &[(f64, f64)],
    ) -> Result<OptimizationOutcome, HemiError> {
        validate_bounds(bounds)?;
        let dims = bounds.len();
        let members = (self.population_per_dim * dims).max(5);
        let mut init_rng = RngHandle::substream(self.seed, INIT_STREAM);
        let mut rng = RngHandle::substream(self.seed, EVOLVE_STREAM);
        let mut eval = Evaluator {
            objective,
            bounds,
            evaluations: 0,
        };

        let mut population = latin_hypercube(&mut init_rng, members, dims);
        let mut energies = population
            .iter()
            .map(|member| eval.energy(member))
            .collect::<Result<Vec<_>, _>>()?;
        let best = energies
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        population.swap(0, best);
        energies.swap(0, best);

        let (f_lo, f_hi) = self.mutation;
        let mut converged = false;
        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            let scale = rng.uniform(f_lo, f_hi);
            for candidate in 0..members {
                let r0 = rng
                    .index_excluding(members, &[candidate])
                    .ok_or_else(|| bounds_error("population too small for mutation"))?;
                let r1 = rng
                    .index_excluding(members, &[candidate, r0])
                    .ok_or_else(|| bounds_error("population too small for mutation"))?;
                let fill = rng.index_excluding(dims, &[]).unwrap_or(0);
                let (best, a, b) = (&population[0], &population[r0], &population[r1]);
                let mut trial = population[candidate].clone();
                for dim in 0..dims {
                    if dim == fill || rng.uniform(0.0, 1.0) < self.recombination {
                        trial[dim] = best[dim] + scale * (a[dim] - b[dim]);
                    }
                    if !(0.0..=1.0).contains(&trial[dim]) {
                        trial[dim] = rng.uniform(0.0, 1.0);
                    }
                }
                let energy = eval.energy(&trial)?;
                if energy <= energies[candidate] {
                    population[candidate] = trial;
                    energies[candidate] = energy;
                    if energy < energies[0] {
                        population.swap(0, candidate);
                        energies.swap(0, candidate);
                    }
                }
            }
            if spread_converged(&energies, self.atol, self.tolerance) {
                converged = true;
                break;
            }
        }
        debug!(
            iterations,
            evaluations = eval.evaluations,
            converged,
            best = energies[0],
            "differential evolution finished"
        );
        Ok(OptimizationOutcome {
            best_params: eval.scale(&population[0]),
            best_value: energies[0],
            converged,
            iterations,
            evaluations: eval.evaluations,
        })
    }
}
