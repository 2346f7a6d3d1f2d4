// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Stochastic selection.
//!
//! Candidates come from the same two pools as in the deterministic
//! strategy, open sections first, but instead of walking them in order each
//! call draws one from a weighted distribution. A candidate's weight is the
//! lexis annotation named by [`RandomParameters::weight_key`], or 1 when
//! there is no key or no annotation. Candidates of weight 0 are never drawn.
//!
//! Draws are without replacement: within one frame a to-connector hands out
//! each candidate of nonzero weight at most once, so every choice point
//! ends. A drawn candidate that would link a section to itself (when that is
//! not allowed) is struck and the draw repeated.
//!
//! The random source is seeded from [`RandomParameters::seed`]; the same
//! seed, lexis and limits give the same run.
//!
//! # Example
//!
//! ```
//! use section_assembly::{Aggregate, DictionaryBuilder, Parameters};
//! use section_assembly::{RandomParameters, StochasticStrategy};
//!
//! let dict = DictionaryBuilder::new()
//!     .section("A", "a+ b-")
//!     .section("B", "b+ a-")
//!     .polar_all()
//!     .build()
//!     .unwrap();
//! let seed = vec![dict.section_named("A").unwrap().clone()];
//!
//! let strategy = StochasticStrategy::new(dict, RandomParameters::new(7));
//! let parameters = Parameters::default()
//!     .with_max_pair_links(2)
//!     .with_max_solutions(1);
//! let mut aggregate = Aggregate::new(strategy, parameters).unwrap();
//! assert_eq!(aggregate.run(&seed).unwrap().solutions, 1);
//! ```

use crate::frame::Frame;
use crate::lexis::{Connector, Dictionary, Lexis, Section};
use crate::parameters::Parameters;
use crate::strategy::{Collector, SelectionStrategy};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::mem;
use tracing::{debug, trace};

/// Configuration for [`StochasticStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomParameters {
    /// Seed for the random source.
    pub seed: u64,
    /// Lexis annotation holding each section's weight. `None` samples
    /// uniformly.
    pub weight_key: Option<String>,
    /// Veto every step after this many have been approved.
    pub max_steps: Option<u64>,
}

impl Default for RandomParameters {
    fn default() -> Self {
        Self {
            seed: 0,
            weight_key: None,
            max_steps: None,
        }
    }
}

impl RandomParameters {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_weight_key(mut self, key: &str) -> Self {
        self.weight_key = Some(key.to_string());
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// A weighted pool of candidates for one to-connector.
#[derive(Debug, Clone)]
struct Pool {
    candidates: Vec<Section>,
    /// Weights as given, with negative and non-finite ones set to 0.
    weights: Vec<f64>,
    /// Candidates of nonzero weight not yet taken.
    live: Vec<bool>,
    /// `None` once every live candidate has been taken.
    dist: Option<WeightedIndex<f64>>,
}

impl Pool {
    fn new(candidates: Vec<Section>, weights: &[f64]) -> Self {
        let weights: Vec<f64> = weights
            .iter()
            .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
            .collect();
        let live = weights.iter().map(|&w| w > 0.0).collect();
        let mut pool = Self {
            candidates,
            weights,
            live,
            dist: None,
        };
        pool.rebuild();
        pool
    }

    /// Rebuild the distribution over the live candidates. Weights are scaled
    /// by the largest live weight, so the total stays finite and a heavy
    /// candidate leaving the pool does not round the rest away.
    fn rebuild(&mut self) {
        let max = self
            .weights
            .iter()
            .zip(&self.live)
            .filter(|&(_, &live)| live)
            .map(|(&w, _)| w)
            .fold(0.0, f64::max);
        self.dist = if max > 0.0 {
            let scaled = self
                .weights
                .iter()
                .zip(&self.live)
                .map(|(&w, &live)| if live { w / max } else { 0.0 });
            WeightedIndex::new(scaled).ok()
        } else {
            None
        };
    }

    /// Draw one candidate and remove it from the distribution.
    fn take(&mut self, rng: &mut StdRng) -> Option<usize> {
        let index = self.dist.as_ref()?.sample(rng);
        self.live[index] = false;
        self.rebuild();
        Some(index)
    }
}

/// Per-frame draw state.
#[derive(Debug, Clone, Default)]
struct RandomSelections {
    /// Open-pool distributions, built the first time a to-connector is
    /// probed in this frame.
    open: HashMap<Connector, Pool>,
    /// Working copies of the lexis distributions.
    lexis: HashMap<Connector, Pool>,
}

/// Weighted random selection.
#[derive(Debug)]
pub struct StochasticStrategy<L: Lexis = Dictionary> {
    lexis: L,
    parameters: RandomParameters,
    rng: StdRng,
    /// Lexis distributions depend only on the lexis, so they are built once
    /// and copied into each frame that draws from them.
    lexis_pools: HashMap<Connector, Pool>,
    selections: RandomSelections,
    stack: Vec<RandomSelections>,
    steps: u64,
    collector: Collector,
}

impl<L: Lexis> StochasticStrategy<L> {
    pub fn new(lexis: L, parameters: RandomParameters) -> Self {
        debug!(seed = parameters.seed, weight_key = ?parameters.weight_key, "Stochastic strategy");
        Self {
            lexis,
            rng: StdRng::seed_from_u64(parameters.seed),
            parameters,
            lexis_pools: HashMap::new(),
            selections: RandomSelections::default(),
            stack: Vec::new(),
            steps: 0,
            collector: Collector::new(),
        }
    }

    pub fn lexis(&self) -> &L {
        &self.lexis
    }

    pub fn parameters(&self) -> &RandomParameters {
        &self.parameters
    }

    /// Steps approved so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn solutions(&self) -> &[Frame] {
        self.collector.solutions()
    }

    pub fn into_solutions(self) -> Vec<Frame> {
        self.collector.into_solutions()
    }

    fn weights(&self, candidates: &[Section]) -> Vec<f64> {
        candidates
            .iter()
            .map(|section| match &self.parameters.weight_key {
                Some(key) => self.lexis.weight(section, key).unwrap_or(1.0),
                None => 1.0,
            })
            .collect()
    }

    fn select_from_open(
        &mut self,
        allow_self_connections: bool,
        frame: &Frame,
        fm_sect: &Section,
        to_con: &Connector,
    ) -> Option<Section> {
        if !self.selections.open.contains_key(to_con) {
            let candidates: Vec<Section> = frame.open_sections_with(to_con).cloned().collect();
            if candidates.is_empty() {
                return None;
            }
            let weights = self.weights(&candidates);
            trace!("Open pool for {}: weights {:?}", to_con, weights);
            self.selections
                .open
                .insert(to_con.clone(), Pool::new(candidates, &weights));
        }

        let pool = self.selections.open.get_mut(to_con)?;
        loop {
            let index = pool.take(&mut self.rng)?;
            if allow_self_connections || &pool.candidates[index] != fm_sect {
                return Some(pool.candidates[index].clone());
            }
        }
    }

    fn select_from_lexis(&mut self, frame: &Frame, to_con: &Connector) -> Option<Section> {
        if !self.selections.lexis.contains_key(to_con) {
            if !self.lexis_pools.contains_key(to_con) {
                let candidates = self.lexis.sections(to_con).to_vec();
                let weights = self.weights(&candidates);
                trace!("Lexis pool for {}: weights {:?}", to_con, weights);
                self.lexis_pools
                    .insert(to_con.clone(), Pool::new(candidates, &weights));
            }
            let pool = self.lexis_pools.get(to_con)?.clone();
            self.selections.lexis.insert(to_con.clone(), pool);
        }

        let pool = self.selections.lexis.get_mut(to_con)?;
        let index = pool.take(&mut self.rng)?;
        Some(pool.candidates[index].instantiate(frame.next_section_id()))
    }
}

impl<L: Lexis> SelectionStrategy for StochasticStrategy<L> {
    fn joints(&self, con: &Connector) -> Vec<Connector> {
        self.lexis.joints(con).to_vec()
    }

    fn select(
        &mut self,
        parameters: &Parameters,
        frame: &Frame,
        fm_sect: &Section,
        _offset: usize,
        to_con: &Connector,
    ) -> Option<Section> {
        let open = self.select_from_open(parameters.allow_self_connections(), frame, fm_sect, to_con);
        if open.is_some() {
            return open;
        }
        if self.selections.open.contains_key(to_con) {
            return None;
        }
        self.select_from_lexis(frame, to_con)
    }

    fn push_frame(&mut self, _frame: &Frame) {
        self.stack.push(mem::take(&mut self.selections));
    }

    fn pop_frame(&mut self, _frame: &Frame) {
        self.selections = self
            .stack
            .pop()
            .unwrap_or_else(|| panic!("pop_frame called without a matching push_frame"));
    }

    fn step(&mut self, _frame: &Frame) -> bool {
        if let Some(max_steps) = self.parameters.max_steps {
            if self.steps >= max_steps {
                trace!("Step limit {} reached", max_steps);
                return false;
            }
        }
        self.steps += 1;
        true
    }

    fn solution(&mut self, frame: &Frame) {
        self.collector.record_solution(frame);
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexis::{DictionaryBuilder, SectionId};

    fn weighted() -> Dictionary {
        DictionaryBuilder::new()
            .weighted("zero", "a-", &[("w", 0.0)])
            .weighted("one", "a- b+", &[("w", 1.0)])
            .weighted("nil", "a- a-", &[("w", 0.0)])
            .section("A", "a+")
            .polar_all()
            .build()
            .unwrap()
    }

    fn seed(dict: &Dictionary, names: &[&str]) -> Frame {
        let sections: Vec<Section> = names
            .iter()
            .map(|name| dict.section_named(name).unwrap().clone())
            .collect();
        Frame::seed(&sections)
    }

    #[test]
    fn test_single_nonzero_weight_always_chosen() {
        let dict = weighted();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();

        for seed in 0..20 {
            let mut strategy =
                StochasticStrategy::new(&dict, RandomParameters::new(seed).with_weight_key("w"));
            let picked = strategy.select(&parameters, &frame, &fm_sect, 0, &to_con);
            assert_eq!(picked.map(|s| s.name().to_string()), Some("one".to_string()));
            // One candidate of nonzero weight: one draw per frame.
            assert_eq!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con), None);
        }
    }

    #[test]
    fn test_uniform_without_weight_key() {
        let dict = weighted();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();
        let mut strategy = StochasticStrategy::new(&dict, RandomParameters::new(3));

        let drawn: Vec<_> = std::iter::from_fn(|| {
            strategy.select(&parameters, &frame, &fm_sect, 0, &to_con)
        })
        .collect();
        assert_eq!(drawn.len(), 3);
        assert!(drawn.iter().all(|s| s.id() == Some(SectionId(1))));
    }

    #[test]
    fn test_all_zero_weights_yield_nothing() {
        let dict = DictionaryBuilder::new()
            .weighted("Z", "a-", &[("w", 0.0)])
            .section("A", "a+")
            .polar_all()
            .build()
            .unwrap();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let mut strategy =
            StochasticStrategy::new(&dict, RandomParameters::new(1).with_weight_key("w"));
        assert_eq!(
            strategy.select(&Parameters::default(), &frame, &fm_sect, 0, &Connector::minus("a")),
            None
        );
    }

    #[test]
    fn test_self_candidate_struck() {
        let dict = DictionaryBuilder::new()
            .section("S", "x+ x-")
            .polar("x")
            .build()
            .unwrap();
        let frame = seed(&dict, &["S", "S"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("x");
        let parameters = Parameters::default();

        for seed in 0..10 {
            let mut strategy = StochasticStrategy::new(&dict, RandomParameters::new(seed));
            let picked = strategy.select(&parameters, &frame, &fm_sect, 0, &to_con);
            assert_eq!(picked.and_then(|s| s.id()), Some(SectionId(1)));
            assert_eq!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con), None);
        }
    }

    #[test]
    fn test_only_self_candidate_ends() {
        let dict = DictionaryBuilder::new()
            .section("S", "x+ x-")
            .polar("x")
            .build()
            .unwrap();
        let frame = seed(&dict, &["S"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let mut strategy = StochasticStrategy::new(&dict, RandomParameters::new(5));
        assert_eq!(
            strategy.select(&Parameters::default(), &frame, &fm_sect, 0, &Connector::minus("x")),
            None
        );
    }

    #[test]
    fn test_push_pop_frame() {
        let dict = weighted();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();
        let mut strategy =
            StochasticStrategy::new(&dict, RandomParameters::new(9).with_weight_key("w"));

        assert!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con).is_some());
        strategy.push_frame(&frame);
        assert!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con).is_some());
        strategy.pop_frame(&frame);
        assert_eq!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con), None);
        assert!(strategy.stack.is_empty());
    }

    #[test]
    fn test_same_seed_same_draws() {
        let dict = DictionaryBuilder::new()
            .section("P", "a-")
            .section("Q", "a- b+")
            .section("R", "a- c+")
            .section("A", "a+")
            .polar_all()
            .build()
            .unwrap();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();

        let draw = |seed: u64| -> Vec<String> {
            let mut strategy = StochasticStrategy::new(&dict, RandomParameters::new(seed));
            std::iter::from_fn(|| strategy.select(&parameters, &frame, &fm_sect, 0, &to_con))
                .map(|s| s.name().to_string())
                .collect()
        };
        assert_eq!(draw(11), draw(11));
        assert_eq!(draw(11).len(), 3);
    }

    #[test]
    fn test_pool_keeps_light_candidates_after_heavy_one() {
        let dict = weighted();
        let candidates = dict.sections(&Connector::minus("a")).to_vec();
        let mut pool = Pool::new(candidates, &[1e300, 1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(2);

        let mut taken: Vec<usize> = std::iter::from_fn(|| pool.take(&mut rng)).collect();
        taken.sort();
        assert_eq!(taken, vec![0, 1, 2]);
    }

    #[test]
    fn test_pool_ignores_unusable_weights() {
        let dict = weighted();
        let candidates = dict.sections(&Connector::minus("a")).to_vec();
        let mut pool = Pool::new(candidates, &[f64::INFINITY, f64::NAN, 1e308]);
        let mut rng = StdRng::seed_from_u64(6);

        assert_eq!(pool.take(&mut rng), Some(2));
        assert_eq!(pool.take(&mut rng), None);
    }

    #[test]
    fn test_step_limit() {
        let dict = weighted();
        let mut strategy =
            StochasticStrategy::new(&dict, RandomParameters::new(0).with_max_steps(2));
        let frame = Frame::default();
        assert!(strategy.step(&frame));
        assert!(strategy.step(&frame));
        assert!(!strategy.step(&frame));
        assert_eq!(strategy.steps(), 2);
    }
}
