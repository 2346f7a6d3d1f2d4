// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Frames: snapshots of a partially assembled graph.
//!
//! A frame records every section placed so far, which of their connectors
//! are still open, and the links made between them. Frames are never
//! mutated once built; [`Frame::attach`] returns the next frame and leaves
//! the receiver as it was. The driver keeps them on a stack, so popping one
//! restores its parent exactly.
//!
//! Placement order is creation order: the section with `SectionId(i)` is the
//! i-th placement, and within a section connectors are ordered by offset.
//! [`Frame::first_open`] returns the earliest open connector in that order,
//! which is what makes the search breadth-first.
//!
//! # Example
//!
//! ```
//! use section_assembly::frame::{create_undirected_link, Endpoint, Frame};
//! use section_assembly::lexis::{Connector, DictionaryBuilder, SectionId};
//!
//! let dict = DictionaryBuilder::new()
//!     .section("A", "a+")
//!     .section("B", "a-")
//!     .build()
//!     .unwrap();
//! let seed = Frame::seed(&[dict.section_named("A").unwrap().clone()]);
//! assert_eq!(seed.first_open(), Some((SectionId(0), 0)));
//!
//! let b = dict.section_named("B").unwrap().instantiate(seed.next_section_id());
//! let link = create_undirected_link(
//!     Endpoint::new(SectionId(0), 0, Connector::plus("a")),
//!     Endpoint::new(SectionId(1), 0, Connector::minus("a")),
//! );
//! let done = seed.attach(link, Some((b, 1)));
//!
//! assert!(done.is_solution());
//! assert!(!seed.is_solution());
//! ```

pub mod link;
pub mod odometer;

pub use link::{create_undirected_link, have_undirected_link, Endpoint, Link};
pub use odometer::Odometer;

use crate::lexis::{Connector, Section, SectionId};

/// A placed section and the open/closed state of its connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    section: Section,
    depth: usize,
    open: Vec<bool>,
}

impl Placement {
    fn new(section: Section, depth: usize) -> Self {
        let open = vec![true; section.connectors().len()];
        Self {
            section,
            depth,
            open,
        }
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Distance from the seed, counted in links made from the lexis.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_open(&self, offset: usize) -> bool {
        self.open.get(offset).copied().unwrap_or(false)
    }

    pub fn has_open(&self) -> bool {
        self.open.iter().any(|&open| open)
    }

    /// Offsets of connectors not yet linked, in order.
    pub fn open_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.open
            .iter()
            .enumerate()
            .filter(|&(_, &open)| open)
            .map(|(offset, _)| offset)
    }

    /// True when some open connector equals `con`.
    pub fn has_open_connector(&self, con: &Connector) -> bool {
        self.open_offsets()
            .any(|offset| self.section.connector(offset) == con)
    }
}

/// Snapshot of one partially assembled graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    placements: Vec<Placement>,
    links: Vec<Link>,
    open_connectors: usize,
}

impl Frame {
    /// Build the root frame. Each seed section is placed as a fresh instance
    /// at depth 0, in the order given.
    pub fn seed(sections: &[Section]) -> Self {
        let mut frame = Frame::default();
        for section in sections {
            let instance = section.instantiate(frame.next_section_id());
            frame.place(instance, 0);
        }
        frame
    }

    fn place(&mut self, section: Section, depth: usize) {
        self.open_connectors += section.connectors().len();
        self.placements.push(Placement::new(section, depth));
    }

    /// Id that the next placed section will receive.
    pub fn next_section_id(&self) -> SectionId {
        SectionId(self.placements.len())
    }

    pub fn placement(&self, id: SectionId) -> Option<&Placement> {
        self.placements.get(id.index())
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.placement(id).map(Placement::section)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// All placed sections, in creation order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.placements.iter().map(Placement::section)
    }

    /// Sections with at least one open connector, in creation order.
    pub fn open_sections(&self) -> impl Iterator<Item = &Section> {
        self.placements
            .iter()
            .filter(|placement| placement.has_open())
            .map(Placement::section)
    }

    /// Open sections that have `con` among their open connectors.
    pub fn open_sections_with<'a>(
        &'a self,
        con: &'a Connector,
    ) -> impl Iterator<Item = &'a Section> + 'a {
        self.placements
            .iter()
            .filter(move |placement| placement.has_open_connector(con))
            .map(Placement::section)
    }

    pub fn is_open(&self, id: SectionId, offset: usize) -> bool {
        self.placement(id)
            .is_some_and(|placement| placement.is_open(offset))
    }

    /// The earliest-created connector that is still open.
    pub fn first_open(&self) -> Option<(SectionId, usize)> {
        self.placements
            .iter()
            .enumerate()
            .find_map(|(index, placement)| {
                placement
                    .open_offsets()
                    .next()
                    .map(|offset| (SectionId(index), offset))
            })
    }

    pub fn open_connector_count(&self) -> usize {
        self.open_connectors
    }

    /// A frame with no open connectors is a solution.
    pub fn is_solution(&self) -> bool {
        self.open_connectors == 0
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Number of links running between sections `a` and `b`.
    pub fn links_between(&self, a: SectionId, b: SectionId) -> usize {
        self.links.iter().filter(|link| link.joins(a, b)).count()
    }

    /// Number of placed sections.
    pub fn size(&self) -> usize {
        self.placements.len()
    }

    /// Depth of the deepest placement.
    pub fn depth(&self) -> usize {
        self.placements
            .iter()
            .map(Placement::depth)
            .max()
            .unwrap_or(0)
    }

    /// Return the frame that results from adding `link`, placing `placed`
    /// first when the link reaches a new section.
    ///
    /// # Panics
    ///
    /// Panics if a new section does not carry the next section id, or if
    /// either end of the link is not an open connector of the new frame.
    /// Both indicate a broken caller, not a search outcome.
    pub fn attach(&self, link: Link, placed: Option<(Section, usize)>) -> Frame {
        let mut next = self.clone();
        if let Some((section, depth)) = placed {
            assert_eq!(
                section.id(),
                Some(next.next_section_id()),
                "Placed section {} does not carry the next section id",
                section
            );
            next.place(section, depth);
        }

        let (a, b) = link.ends();
        for end in [a, b] {
            let placement = next
                .placements
                .get_mut(end.section.index())
                .unwrap_or_else(|| panic!("Link end {} is not placed", end));
            assert!(
                placement.is_open(end.offset) && placement.section.connector(end.offset) == &end.connector,
                "Link end {} is not an open connector",
                end
            );
            placement.open[end.offset] = false;
            next.open_connectors -= 1;
        }

        next.links.push(link);
        next
    }
}
