// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Odometer wheels.
//!
//! The driver satisfies open connectors one at a time, earliest first. Each
//! connector it works on gets a wheel: the choice point that enumerates the
//! mating connector types (joints) and, for each, the candidate sections the
//! strategy offers. Wheels stack up as the assembly grows; the row of a
//! wheel is the depth of the section that owns the connector, so all wheels
//! for one breadth-first row share a row number.

use crate::frame::Endpoint;
use crate::lexis::{Connector, Section};

/// Choice point for one open connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Odometer {
    row: usize,
    from: Endpoint,
    from_section: Section,
    joints: Vec<Connector>,
    wheel: usize,
    tried: usize,
}

impl Odometer {
    pub fn new(row: usize, from: Endpoint, from_section: Section, joints: Vec<Connector>) -> Self {
        Self {
            row,
            from,
            from_section,
            joints,
            wheel: 0,
            tried: 0,
        }
    }

    /// Breadth-first row: depth of the section owning the connector.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The open connector being satisfied.
    pub fn from(&self) -> &Endpoint {
        &self.from
    }

    pub fn from_section(&self) -> &Section {
        &self.from_section
    }

    pub fn joints(&self) -> &[Connector] {
        &self.joints
    }

    /// The mating connector currently being enumerated, or `None` once
    /// every joint has been exhausted.
    pub fn current_joint(&self) -> Option<&Connector> {
        self.joints.get(self.wheel)
    }

    /// Move on to the next joint.
    pub fn next_joint(&mut self) {
        if self.wheel < self.joints.len() {
            self.wheel += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.wheel >= self.joints.len()
    }

    /// Record that a candidate was offered.
    pub fn record_try(&mut self) {
        self.tried += 1;
    }

    /// Number of candidates offered so far.
    pub fn tried(&self) -> usize {
        self.tried
    }
}
