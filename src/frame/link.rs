// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Undirected links between connectors.
//!
//! A link joins two endpoints, each a connector at a given offset on a
//! placed section. The endpoints are held in an [`UnorderedPair`], so a link
//! has no head or tail: `a -- b` and `b -- a` are the same link.

use crate::frame::Frame;
use crate::lexis::{Connector, SectionId};
use std::fmt;
use unordered_pair::UnorderedPair;

/// One end of a link: a connector on a placed section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub section: SectionId,
    pub offset: usize,
    pub connector: Connector,
}

impl Endpoint {
    pub fn new(section: SectionId, offset: usize, connector: Connector) -> Self {
        Self {
            section,
            offset,
            connector,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.section, self.offset, self.connector)
    }
}

/// An undirected edge between two endpoints.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Link {
    ends: UnorderedPair<Endpoint>,
}

impl Link {
    /// Both endpoints, in the order they were given when the link was made.
    pub fn ends(&self) -> (&Endpoint, &Endpoint) {
        (&self.ends.0, &self.ends.1)
    }

    /// True when this link runs between sections `a` and `b`, in either order.
    pub fn joins(&self, a: SectionId, b: SectionId) -> bool {
        UnorderedPair(self.ends.0.section, self.ends.1.section) == UnorderedPair(a, b)
    }

    /// True when this link mates the same connectors on the same sections as
    /// `a` and `b`, regardless of orientation. Offsets are not compared: two
    /// links pairing the same connector types between the same two sections
    /// are duplicates.
    pub fn same_as(&self, a: &Endpoint, b: &Endpoint) -> bool {
        let mine = UnorderedPair(
            (self.ends.0.section, &self.ends.0.connector),
            (self.ends.1.section, &self.ends.1.connector),
        );
        mine == UnorderedPair((a.section, &a.connector), (b.section, &b.connector))
    }

    /// True when `endpoint` is one of the two ends (offset included).
    pub fn consumes(&self, endpoint: &Endpoint) -> bool {
        self.ends.0 == *endpoint || self.ends.1 == *endpoint
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({} -- {})", self.ends.0, self.ends.1)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.ends.0, self.ends.1)
    }
}

/// Build the undirected link joining `from` and `to`.
pub fn create_undirected_link(from: Endpoint, to: Endpoint) -> Link {
    Link {
        ends: UnorderedPair::from((from, to)),
    }
}

/// Find an existing link in `frame` that duplicates the one `from`/`to`
/// would make. Never creates anything.
pub fn have_undirected_link(frame: &Frame, from: &Endpoint, to: &Endpoint) -> Option<Link> {
    frame
        .links()
        .iter()
        .find(|link| link.same_as(from, to))
        .cloned()
}
