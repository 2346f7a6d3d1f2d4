// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Selection strategies.
//!
//! The driver in [`crate::engine`] owns the search loop; a strategy decides
//! what to try at each choice point. The driver calls into the strategy and
//! never the other way round.
//!
//! # Lifecycle
//!
//! For each open connector the driver works on:
//!
//! 1. A wheel is created and [`push_odometer`](SelectionStrategy::push_odometer)
//!    is called.
//! 2. For each connector type from [`joints`](SelectionStrategy::joints),
//!    [`select`](SelectionStrategy::select) is called repeatedly until it
//!    returns `None`. Each call must return the *next* candidate, so the
//!    strategy keeps a cursor per to-connector.
//! 3. A candidate the driver accepts is offered to
//!    [`step`](SelectionStrategy::step). If approved,
//!    [`make_link`](SelectionStrategy::make_link) builds the edge,
//!    [`push_frame`](SelectionStrategy::push_frame) is called with the parent
//!    frame and the driver descends.
//! 4. On the way back up, [`pop_frame`](SelectionStrategy::pop_frame) is
//!    called with the discarded frame, and
//!    [`pop_odometer`](SelectionStrategy::pop_odometer) once the wheel is
//!    exhausted or vetoed.
//!
//! Cursor state saved by a push must be restored exactly by the matching pop.
//!
//! [`Aggregate`](crate::engine::Aggregate) builds exactly one wheel per
//! frame, so the two pairs of hooks always nest the same way: each
//! `push_odometer` opens a new frame's wheel, and its `pop_odometer` comes
//! just before that frame's `pop_frame`. State kept per wheel never
//! outlives state kept per frame; a strategy gains nothing by expecting the
//! hooks on separate schedules.
//!
//! # Candidate order
//!
//! Both stock strategies offer sections already in the frame (the *open
//! pool*) before fresh instances from the lexis, which favours closing the
//! current graph over growing it. Once the open pool for a to-connector has
//! yielded candidates in a frame, the lexis is not consulted for that
//! to-connector in the same frame.

pub mod collect;
pub mod deterministic;
pub mod stochastic;

pub use collect::Collector;
pub use deterministic::DeterministicStrategy;
pub use stochastic::{RandomParameters, StochasticStrategy};

use crate::frame::{create_undirected_link, have_undirected_link, Endpoint, Frame, Link, Odometer};
use crate::lexis::{Connector, Section};
use crate::parameters::Parameters;

/// The callback contract between the driver and a selection strategy.
pub trait SelectionStrategy {
    /// Connector types that `con` may mate with.
    fn joints(&self, con: &Connector) -> Vec<Connector>;

    /// Return the next candidate section that carries `to_con`, or `None`
    /// when there are no more.
    ///
    /// `fm_sect` is the section owning the connector at `offset` that is
    /// being satisfied. A returned section is either a section already
    /// placed in `frame` or a fresh instance carrying
    /// `frame.next_section_id()`.
    fn select(
        &mut self,
        parameters: &Parameters,
        frame: &Frame,
        fm_sect: &Section,
        offset: usize,
        to_con: &Connector,
    ) -> Option<Section>;

    /// Build the edge joining `from` and `to`. Only called for candidates
    /// the driver has already accepted.
    fn make_link(&mut self, from: Endpoint, to: Endpoint) -> Link {
        create_undirected_link(from, to)
    }

    /// Find an existing edge in `frame` that duplicates `from`/`to`.
    fn have_link(&self, frame: &Frame, from: &Endpoint, to: &Endpoint) -> Option<Link> {
        have_undirected_link(frame, from, to)
    }

    /// Called with the parent frame before descending into a child.
    fn push_frame(&mut self, _frame: &Frame) {}

    /// Called with the discarded frame after backing out of it.
    fn pop_frame(&mut self, _frame: &Frame) {}

    /// Called when a wheel is created for a new choice point.
    fn push_odometer(&mut self, _odometer: &Odometer) {}

    /// Called when a wheel is discarded.
    fn pop_odometer(&mut self, _odometer: &Odometer) {}

    /// Approve committing an attachment to `frame`. Returning `false`
    /// abandons the current choice point.
    fn step(&mut self, _frame: &Frame) -> bool {
        true
    }

    /// Called exactly once for each complete assembly.
    fn solution(&mut self, frame: &Frame);

    /// Optional: a name for this strategy (for logging).
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Pick the candidate at `cursor` or later that may mate with `fm_sect`,
/// advancing `cursor` past everything examined. Returns `None` once the
/// candidates are used up.
pub(crate) fn check_self(
    candidates: &[Section],
    cursor: &mut usize,
    fm_sect: &Section,
    allow_self_connections: bool,
) -> Option<Section> {
    while let Some(candidate) = candidates.get(*cursor) {
        *cursor += 1;
        if allow_self_connections || candidate != fm_sect {
            return Some(candidate.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexis::{DictionaryBuilder, SectionId};

    fn sections() -> Vec<Section> {
        let dict = DictionaryBuilder::new()
            .section("S", "x+ x-")
            .build()
            .unwrap();
        let template = dict.section_named("S").unwrap();
        (0..3).map(|i| template.instantiate(SectionId(i))).collect()
    }

    #[test]
    fn test_check_self_skips_self() {
        let candidates = sections();
        let mut cursor = 0;

        let first = check_self(&candidates, &mut cursor, &candidates[0], false);
        assert_eq!(first.and_then(|s| s.id()), Some(SectionId(1)));
        assert_eq!(cursor, 2);

        let second = check_self(&candidates, &mut cursor, &candidates[0], false);
        assert_eq!(second.and_then(|s| s.id()), Some(SectionId(2)));
        assert_eq!(check_self(&candidates, &mut cursor, &candidates[0], false), None);
    }

    #[test]
    fn test_check_self_allowed() {
        let candidates = sections();
        let mut cursor = 0;
        let first = check_self(&candidates, &mut cursor, &candidates[0], true);
        assert_eq!(first.and_then(|s| s.id()), Some(SectionId(0)));
        assert_eq!(cursor, 1);
    }
}
