// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Connector type for the typed plug points on a section.
//!
//! A connector is a type tag plus a direction. The direction only matters
//! to the joint rules held by the dictionary; the search itself compares
//! connectors for equality and never inspects the direction.
//!
//! # Examples
//!
//! ```
//! use section_assembly::lexis::{Connector, Direction};
//!
//! let con = Connector::parse("a+").unwrap();
//! assert_eq!(con.name(), "a");
//! assert_eq!(con.direction(), Direction::From);
//! assert_eq!(con.mate(), Connector::minus("a"));
//! assert_eq!(format!("{}", con.mate()), "a-");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Role of a connector when it is mated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Written `a+`.
    From,
    /// Written `a-`.
    To,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::From => Direction::To,
            Direction::To => Direction::From,
        }
    }

    fn suffix(self) -> char {
        match self {
            Direction::From => '+',
            Direction::To => '-',
        }
    }
}

/// A typed, directional mating point on a section.
///
/// Cheap to clone: the type name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Connector {
    name: Arc<str>,
    direction: Direction,
}

impl Connector {
    /// Create a connector with an explicit direction.
    pub fn new(name: &str, direction: Direction) -> Self {
        Self {
            name: Arc::from(name),
            direction,
        }
    }

    /// Shorthand for a `From` connector (`name+`).
    pub fn plus(name: &str) -> Self {
        Self::new(name, Direction::From)
    }

    /// Shorthand for a `To` connector (`name-`).
    pub fn minus(name: &str) -> Self {
        Self::new(name, Direction::To)
    }

    /// Parse the `name+` / `name-` notation.
    ///
    /// Returns `None` when the direction suffix is missing or the name is empty.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (name, direction) = if let Some(name) = text.strip_suffix('+') {
            (name, Direction::From)
        } else if let Some(name) = text.strip_suffix('-') {
            (name, Direction::To)
        } else {
            return None;
        };
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, direction))
    }

    /// The type tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Same type, opposite direction.
    pub fn mate(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            direction: self.direction.reversed(),
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.direction.suffix())
    }
}
