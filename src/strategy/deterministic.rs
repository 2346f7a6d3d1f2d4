// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Deterministic selection.
//!
//! Candidates are offered in a fixed order: first the sections already in
//! the frame (in creation order), then the lexis templates (in dictionary
//! order). Each pool has a linear cursor per to-connector, so repeated
//! calls to `select` walk the pool and then report exhaustion. Running the
//! same search twice gives the same solutions in the same order, which
//! makes this strategy the one to use on a lexis crafted to have a small,
//! enumerable set of assemblies.
//!
//! # Example
//!
//! ```
//! use section_assembly::{Aggregate, DeterministicStrategy, DictionaryBuilder, Parameters};
//!
//! let dict = DictionaryBuilder::new()
//!     .section("A", "a+ b-")
//!     .section("B", "b+ a-")
//!     .polar_all()
//!     .build()
//!     .unwrap();
//! let seed = vec![dict.section_named("A").unwrap().clone()];
//!
//! let mut aggregate = Aggregate::new(
//!     DeterministicStrategy::new(dict),
//!     Parameters::default().with_max_pair_links(2),
//! )
//! .unwrap();
//! let report = aggregate.run(&seed).unwrap();
//! assert_eq!(report.solutions, 1);
//! ```

use crate::frame::{Frame, Odometer};
use crate::lexis::{Connector, Dictionary, Lexis, Section};
use crate::parameters::Parameters;
use crate::strategy::{check_self, Collector, SelectionStrategy};
use std::collections::HashMap;
use std::mem;
use tracing::trace;

/// Open-pool cursors for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OpenSelections {
    /// Candidates recorded the first time a to-connector was probed.
    open_sections: HashMap<Connector, Vec<Section>>,
    /// Next index to examine. Removed once the candidates run out.
    cursors: HashMap<Connector, usize>,
}

/// Exhaustive, in-order selection.
#[derive(Debug)]
pub struct DeterministicStrategy<L: Lexis = Dictionary> {
    lexis: L,
    /// Lexis cursors for the current wheel. Zero means not yet started.
    lexis_cursors: HashMap<Connector, usize>,
    lexis_stack: Vec<HashMap<Connector, usize>>,
    open: OpenSelections,
    open_stack: Vec<OpenSelections>,
    collector: Collector,
}

impl<L: Lexis> DeterministicStrategy<L> {
    pub fn new(lexis: L) -> Self {
        Self {
            lexis,
            lexis_cursors: HashMap::new(),
            lexis_stack: Vec::new(),
            open: OpenSelections::default(),
            open_stack: Vec::new(),
            collector: Collector::new(),
        }
    }

    pub fn lexis(&self) -> &L {
        &self.lexis
    }

    /// Solutions recorded so far, in the order found.
    pub fn solutions(&self) -> &[Frame] {
        self.collector.solutions()
    }

    pub fn into_solutions(self) -> Vec<Frame> {
        self.collector.into_solutions()
    }

    fn select_from_open(
        &mut self,
        allow_self_connections: bool,
        frame: &Frame,
        fm_sect: &Section,
        to_con: &Connector,
    ) -> Option<Section> {
        let OpenSelections {
            open_sections,
            cursors,
        } = &mut self.open;

        if !open_sections.contains_key(to_con) {
            let candidates: Vec<Section> = frame.open_sections_with(to_con).cloned().collect();
            if candidates.is_empty() {
                return None;
            }
            trace!("Open pool for {}: {} candidates", to_con, candidates.len());
            open_sections.insert(to_con.clone(), candidates);
            cursors.insert(to_con.clone(), 0);
        }

        // No cursor: this pool was already used up in this frame.
        let cursor = cursors.get_mut(to_con)?;
        let picked = check_self(&open_sections[to_con], cursor, fm_sect, allow_self_connections);
        if picked.is_none() {
            cursors.remove(to_con);
        }
        picked
    }

    fn select_from_lexis(&mut self, frame: &Frame, to_con: &Connector) -> Option<Section> {
        let sections = self.lexis.sections(to_con);
        let cursor = self.lexis_cursors.entry(to_con.clone()).or_insert(0);

        match sections.get(*cursor) {
            Some(template) => {
                *cursor += 1;
                Some(template.instantiate(frame.next_section_id()))
            }
            None => {
                self.lexis_cursors.remove(to_con);
                None
            }
        }
    }
}

impl<L: Lexis> SelectionStrategy for DeterministicStrategy<L> {
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
        // The open pool was probed and ran dry; the lexis is not retried.
        if self.open.open_sections.contains_key(to_con) {
            return None;
        }
        self.select_from_lexis(frame, to_con)
    }

    fn push_frame(&mut self, _frame: &Frame) {
        self.open_stack.push(mem::take(&mut self.open));
    }

    fn pop_frame(&mut self, _frame: &Frame) {
        self.open = self
            .open_stack
            .pop()
            .unwrap_or_else(|| panic!("pop_frame called without a matching push_frame"));
    }

    fn push_odometer(&mut self, _odometer: &Odometer) {
        self.lexis_stack.push(mem::take(&mut self.lexis_cursors));
    }

    fn pop_odometer(&mut self, _odometer: &Odometer) {
        self.lexis_cursors = self
            .lexis_stack
            .pop()
            .unwrap_or_else(|| panic!("pop_odometer called without a matching push_odometer"));
    }

    fn solution(&mut self, frame: &Frame) {
        self.collector.record_solution(frame);
    }

    fn name(&self) -> &str {
        "Deterministic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Endpoint;
    use crate::lexis::{DictionaryBuilder, SectionId};

    fn pieces() -> Dictionary {
        DictionaryBuilder::new()
            .section("A", "a+ b-")
            .section("B", "b+ a-")
            .section("C", "b+ a- a-")
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

    fn names(picked: &[Option<Section>]) -> Vec<Option<String>> {
        picked
            .iter()
            .map(|s| s.as_ref().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_lexis_in_dictionary_order() {
        let dict = pieces();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();
        let mut strategy = DeterministicStrategy::new(&dict);

        let picked: Vec<_> = (0..4)
            .map(|_| strategy.select(&parameters, &frame, &fm_sect, 0, &to_con))
            .collect();

        // Exhaustion erases the cursor, so the fourth call starts over.
        assert_eq!(
            names(&picked),
            vec![
                Some("B#1(b+ a-)".to_string()),
                Some("C#1(b+ a- a-)".to_string()),
                None,
                Some("B#1(b+ a-)".to_string()),
            ]
        );
    }

    #[test]
    fn test_open_pool_first_without_lexis_fallback() {
        let dict = pieces();
        let frame = seed(&dict, &["A", "B"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();
        let mut strategy = DeterministicStrategy::new(&dict);

        let picked: Vec<_> = (0..3)
            .map(|_| strategy.select(&parameters, &frame, &fm_sect, 0, &to_con))
            .collect();
        assert_eq!(names(&picked), vec![Some("B#1(b+ a-)".to_string()), None, None]);
    }

    #[test]
    fn test_self_connections() {
        let dict = DictionaryBuilder::new()
            .section("S", "x+ x-")
            .polar("x")
            .build()
            .unwrap();
        let frame = seed(&dict, &["S"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("x");

        let mut strategy = DeterministicStrategy::new(&dict);
        let refused = Parameters::default();
        assert_eq!(strategy.select(&refused, &frame, &fm_sect, 0, &to_con), None);
        // The open pool was probed, so the lexis is not used either.
        assert_eq!(strategy.select(&refused, &frame, &fm_sect, 0, &to_con), None);

        let mut strategy = DeterministicStrategy::new(&dict);
        let allowed = Parameters::default().with_self_connections(true);
        assert_eq!(
            strategy.select(&allowed, &frame, &fm_sect, 0, &to_con),
            Some(fm_sect.clone())
        );
    }

    #[test]
    fn test_push_pop_frame_restores_open_cursors() {
        let dict = pieces();
        let frame = seed(&dict, &["A", "B"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();
        let mut strategy = DeterministicStrategy::new(&dict);

        assert!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con).is_some());
        let saved = strategy.open.clone();

        strategy.push_frame(&frame);
        assert!(strategy.open.open_sections.is_empty());
        assert!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con).is_some());
        strategy.pop_frame(&frame);

        assert_eq!(strategy.open, saved);
        assert_eq!(strategy.select(&parameters, &frame, &fm_sect, 0, &to_con), None);
    }

    #[test]
    fn test_push_pop_odometer_restores_lexis_cursors() {
        let dict = pieces();
        let frame = seed(&dict, &["A"]);
        let fm_sect = frame.section(SectionId(0)).unwrap().clone();
        let to_con = Connector::minus("a");
        let parameters = Parameters::default();
        let mut strategy = DeterministicStrategy::new(&dict);
        let odometer = Odometer::new(
            0,
            Endpoint::new(SectionId(0), 0, Connector::plus("a")),
            fm_sect.clone(),
            strategy.joints(&Connector::plus("a")),
        );

        let first = strategy.select(&parameters, &frame, &fm_sect, 0, &to_con);
        assert_eq!(first.map(|s| s.name().to_string()), Some("B".to_string()));

        strategy.push_odometer(&odometer);
        let inner = strategy.select(&parameters, &frame, &fm_sect, 0, &to_con);
        assert_eq!(inner.map(|s| s.name().to_string()), Some("B".to_string()));
        strategy.pop_odometer(&odometer);

        let second = strategy.select(&parameters, &frame, &fm_sect, 0, &to_con);
        assert_eq!(second.map(|s| s.name().to_string()), Some("C".to_string()));
    }

    #[test]
    #[should_panic(expected = "without a matching push_frame")]
    fn test_unbalanced_pop_panics() {
        let dict = pieces();
        let mut strategy = DeterministicStrategy::new(&dict);
        strategy.pop_frame(&Frame::default());
    }

    #[test]
    fn test_unknown_connector_has_no_joints() {
        let dict = pieces();
        let strategy = DeterministicStrategy::new(&dict);
        assert!(strategy.joints(&Connector::plus("zz")).is_empty());
        assert_eq!(strategy.joints(&Connector::plus("a")), vec![Connector::minus("a")]);
    }
}
