// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Breadth-first backtracking assembly.
//!
//! This module implements the driver that grows an assembly one link at a
//! time. It owns the search loop and the backtracking stacks; all choices
//! are delegated to a [`SelectionStrategy`].
//!
//! # Architecture
//!
//! The driver keeps two explicit stacks, so the whole search state can be
//! inspected between steps and no recursion is needed:
//! - a stack of [`Frame`]s, one per committed link, each an immutable
//!   snapshot of the assembly so far
//! - a stack of [`Odometer`] wheels, one per frame that has started
//!   enumerating candidates for its earliest open connector
//!
//! Popping a frame restores its parent exactly; the strategy's own cursors
//! are saved and restored through the push/pop hooks in lock-step.
//!
//! # State machine
//!
//! Each call to [`Aggregate::advance`] performs one transition:
//!
//! 1. `Expanding`: on entry to a frame, apply the size and depth guards
//!    (exceeding one prunes the frame) and go to `Solution` if nothing is
//!    open. Otherwise pick the earliest open connector, create its wheel,
//!    and ask the strategy for candidates until one is accepted and
//!    approved by `step`. Commit it as a new frame and stay in `Expanding`.
//!    A veto, or running out of candidates, goes to `Backtracking`.
//! 2. `Backtracking`: discard the exhausted wheel, if any, and the current
//!    frame, then resume the parent's wheel in `Expanding`. Backing out of
//!    the root frame goes to `Halted`.
//! 3. `Solution`: report the frame to the strategy, then `Backtracking`, or
//!    `Halted` once `max_solutions` have been found.
//!
//! # Example
//!
//! ```
//! use section_assembly::{Aggregate, DeterministicStrategy, DictionaryBuilder};
//! use section_assembly::{Parameters, SearchState};
//!
//! let dict = DictionaryBuilder::new()
//!     .section("S", "x+ x-")
//!     .polar("x")
//!     .build()
//!     .unwrap();
//! let seed = vec![dict.section_named("S").unwrap().clone()];
//!
//! let mut aggregate = Aggregate::new(DeterministicStrategy::new(dict), Parameters::default()).unwrap();
//! aggregate.seed(&seed).unwrap();
//! while aggregate.advance() != SearchState::Halted {}
//!
//! // S can only close on itself, which is not allowed.
//! assert_eq!(aggregate.solutions(), 0);
//! assert!(aggregate.report().exhausted);
//! ```

use crate::frame::{Endpoint, Frame, Odometer};
use crate::lexis::{Connector, Section};
use crate::parameters::{ParameterError, Parameters};
use crate::state::{Counters, Statistics};
use crate::strategy::SelectionStrategy;
use strum_macros::Display;
use tracing::{debug, trace};

/// Where the driver is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SearchState {
    /// Trying to satisfy the earliest open connector of the current frame.
    Expanding,
    /// The current frame is exhausted; returning to its parent.
    Backtracking,
    /// The current frame has no open connectors.
    Solution,
    /// Search space exhausted or solution limit reached.
    Halted,
}

/// Reasons a search cannot start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error("the seed has no sections")]
    EmptySeed,
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub solutions: usize,
    pub statistics: Statistics,
    /// True when every branch was explored, false when the solution limit
    /// stopped the search early.
    pub exhausted: bool,
}

/// The assembly driver.
pub struct Aggregate<S: SelectionStrategy> {
    strategy: S,
    parameters: Parameters,
    frames: Vec<Frame>,
    odometers: Vec<Odometer>,
    state: SearchState,
    solutions: usize,
    exhausted: bool,
    statistics: Statistics,
}

impl<S: SelectionStrategy> Aggregate<S> {
    /// Create a driver. Nothing happens until it is seeded.
    pub fn new(strategy: S, parameters: Parameters) -> Result<Self, AssemblyError> {
        parameters.validate()?;
        Ok(Self {
            strategy,
            parameters,
            frames: Vec::new(),
            odometers: Vec::new(),
            state: SearchState::Halted,
            solutions: 0,
            exhausted: false,
            statistics: Statistics::new(),
        })
    }

    /// Install the root frame built from `sections` and reset the counters.
    ///
    /// Any search still in progress is abandoned, unwinding the strategy's
    /// stacks first.
    pub fn seed(&mut self, sections: &[Section]) -> Result<(), AssemblyError> {
        if sections.is_empty() {
            return Err(AssemblyError::EmptySeed);
        }
        self.unwind();

        let root = Frame::seed(sections);
        debug!(
            strategy = self.strategy.name(),
            sections = root.size(),
            open = root.open_connector_count(),
            "Seeding assembly"
        );
        self.frames.push(root);
        self.state = SearchState::Expanding;
        self.solutions = 0;
        self.exhausted = false;
        self.statistics = Statistics::new();
        Ok(())
    }

    /// Seed, then advance until halted.
    pub fn run(&mut self, seed: &[Section]) -> Result<SearchReport, AssemblyError> {
        self.seed(seed)?;
        while self.advance() != SearchState::Halted {}
        debug!(solutions = self.solutions, "Search halted: {}", self.statistics);
        Ok(self.report())
    }

    /// Perform one transition and return the new state.
    pub fn advance(&mut self) -> SearchState {
        self.state = match self.state {
            SearchState::Expanding => self.expand(),
            SearchState::Backtracking => self.backtrack(),
            SearchState::Solution => self.accept(),
            SearchState::Halted => SearchState::Halted,
        };
        self.state
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The current frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Number of frames on the stack, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The wheel of the current choice point, if one has been created.
    pub fn odometer(&self) -> Option<&Odometer> {
        if self.odometers.len() == self.frames.len() {
            self.odometers.last()
        } else {
            None
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Solutions found since the last seed.
    pub fn solutions(&self) -> usize {
        self.solutions
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn report(&self) -> SearchReport {
        SearchReport {
            solutions: self.solutions,
            statistics: self.statistics.clone(),
            exhausted: self.exhausted,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    pub fn into_strategy(mut self) -> S {
        self.unwind();
        self.strategy
    }

    fn expand(&mut self) -> SearchState {
        let Some(frame) = self.frames.last() else {
            return SearchState::Halted;
        };

        if self.odometers.len() < self.frames.len() {
            if frame.size() > self.parameters.max_network_size()
                || frame.depth() > self.parameters.max_depth()
            {
                trace!(size = frame.size(), depth = frame.depth(), "Pruned");
                self.statistics.increment_counter(Counters::Pruned);
                return SearchState::Backtracking;
            }

            let Some((id, offset)) = frame.first_open() else {
                return SearchState::Solution;
            };
            let placement = frame
                .placement(id)
                .unwrap_or_else(|| panic!("First open section {} is not placed", id));
            let from_section = placement.section().clone();
            let from_con = from_section.connector(offset).clone();
            let joints = self.strategy.joints(&from_con);
            let odometer = Odometer::new(
                placement.depth(),
                Endpoint::new(id, offset, from_con),
                from_section,
                joints,
            );
            trace!(
                row = odometer.row(),
                joints = odometer.joints().len(),
                "Wheel for {}",
                odometer.from()
            );
            self.strategy.push_odometer(&odometer);
            self.odometers.push(odometer);
        }

        let Some(odometer) = self.odometers.last_mut() else {
            return SearchState::Halted;
        };
        loop {
            let Some(to_con) = odometer.current_joint().cloned() else {
                return SearchState::Backtracking;
            };
            let from = odometer.from().clone();
            let Some(candidate) = self.strategy.select(
                &self.parameters,
                frame,
                odometer.from_section(),
                from.offset,
                &to_con,
            ) else {
                odometer.next_joint();
                continue;
            };
            odometer.record_try();

            let Some((to, fresh)) = to_endpoint(frame, &from, &candidate, &to_con) else {
                self.statistics.increment_counter(Counters::Rejected);
                continue;
            };
            if frame.links_between(from.section, to.section) >= self.parameters.max_pair_links()
                || self.strategy.have_link(frame, &from, &to).is_some()
            {
                trace!("Rejected {} -- {}", from, to);
                self.statistics.increment_counter(Counters::Rejected);
                continue;
            }

            if !self.strategy.step(frame) {
                trace!("Vetoed {} -- {}", from, to);
                self.statistics.increment_counter(Counters::Vetoes);
                return SearchState::Backtracking;
            }

            trace!(
                row = odometer.row(),
                tried = odometer.tried(),
                "Step {} -- {}",
                from,
                to
            );
            let placed = fresh.then(|| (candidate, odometer.row() + 1));
            let link = self.strategy.make_link(from, to);
            let next = frame.attach(link, placed);
            self.strategy.push_frame(frame);
            self.statistics.increment_counter(Counters::Steps);
            self.frames.push(next);
            return SearchState::Expanding;
        }
    }

    fn backtrack(&mut self) -> SearchState {
        if self.odometers.len() == self.frames.len() {
            if let Some(odometer) = self.odometers.pop() {
                trace!(tried = odometer.tried(), "Wheel for {} done", odometer.from());
                self.strategy.pop_odometer(&odometer);
            }
        }
        if self.frames.len() <= 1 {
            debug!("Search space exhausted");
            self.exhausted = true;
            return SearchState::Halted;
        }
        if let Some(frame) = self.frames.pop() {
            self.strategy.pop_frame(&frame);
        }
        trace!(depth = self.frames.len(), "Backtrack");
        self.statistics.increment_counter(Counters::Backtracks);
        SearchState::Expanding
    }

    fn accept(&mut self) -> SearchState {
        let Some(frame) = self.frames.last() else {
            return SearchState::Halted;
        };
        self.strategy.solution(frame);
        self.solutions += 1;
        self.statistics.increment_counter(Counters::Solutions);
        debug!(
            sections = frame.size(),
            links = frame.links().len(),
            "Solution {}",
            self.solutions
        );
        if self.solutions >= self.parameters.max_solutions() {
            SearchState::Halted
        } else {
            SearchState::Backtracking
        }
    }

    /// Pop everything, keeping the strategy's push/pop calls balanced.
    fn unwind(&mut self) {
        while !self.frames.is_empty() {
            if self.odometers.len() == self.frames.len() {
                if let Some(odometer) = self.odometers.pop() {
                    self.strategy.pop_odometer(&odometer);
                }
            }
            if let Some(frame) = self.frames.pop() {
                if !self.frames.is_empty() {
                    self.strategy.pop_frame(&frame);
                }
            }
        }
        self.state = SearchState::Halted;
    }
}

/// Locate the connector on `candidate` that a link from `from` would use,
/// and whether `candidate` is a fresh instance. `None` when a section
/// already in the frame has no usable open `to_con`.
///
/// # Panics
///
/// Panics if the strategy offered a template, an instance that is neither
/// fresh nor placed in `frame`, or a fresh instance without `to_con`.
fn to_endpoint(
    frame: &Frame,
    from: &Endpoint,
    candidate: &Section,
    to_con: &Connector,
) -> Option<(Endpoint, bool)> {
    let Some(id) = candidate.id() else {
        panic!("Strategy offered template {} instead of an instance", candidate);
    };

    if id == frame.next_section_id() {
        let offset = candidate
            .offsets_of(to_con)
            .next()
            .unwrap_or_else(|| panic!("Section {} offered for {} does not carry it", candidate, to_con));
        return Some((Endpoint::new(id, offset, to_con.clone()), true));
    }

    if frame.section(id) != Some(candidate) {
        panic!("Strategy offered section {} that is not in the frame", candidate);
    }
    candidate
        .offsets_of(to_con)
        .find(|&offset| frame.is_open(id, offset) && !(id == from.section && offset == from.offset))
        .map(|offset| (Endpoint::new(id, offset, to_con.clone()), false))
}
