// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Solution recording shared by the stock strategies.

use crate::frame::Frame;
use tracing::debug;

/// Keeps every solution frame it is given, in the order found.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    solutions: Vec<Frame>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_solution(&mut self, frame: &Frame) {
        debug!(
            sections = frame.size(),
            links = frame.links().len(),
            "Recording solution {}",
            self.solutions.len() + 1
        );
        self.solutions.push(frame.clone());
    }

    pub fn solutions(&self) -> &[Frame] {
        &self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn into_solutions(self) -> Vec<Frame> {
        self.solutions
    }
}
