// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Global search limits.
//!
//! The driver owns one [`Parameters`] value and hands strategies a shared
//! reference; nothing changes it during a search. Every field has a default,
//! so a harness can load a partial configuration:
//!
//! ```
//! use section_assembly::Parameters;
//!
//! let parameters = Parameters::default()
//!     .with_max_solutions(10)
//!     .with_max_pair_links(2);
//! assert_eq!(parameters.max_depth(), usize::MAX);
//! assert!(parameters.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

/// Rejected limit settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("max_solutions must be at least 1")]
    NoSolutions,
    #[error("max_pair_links must be at least 1")]
    NoPairLinks,
    #[error("max_network_size must be at least 1")]
    NoNetwork,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    max_solutions: usize,
    allow_self_connections: bool,
    max_pair_links: usize,
    max_network_size: usize,
    max_depth: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_solutions: usize::MAX,
            allow_self_connections: false,
            max_pair_links: 1,
            max_network_size: usize::MAX,
            max_depth: usize::MAX,
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after this many solutions.
    pub fn max_solutions(&self) -> usize {
        self.max_solutions
    }

    /// Whether a section may be linked to itself.
    pub fn allow_self_connections(&self) -> bool {
        self.allow_self_connections
    }

    /// Most links allowed between any one pair of sections.
    pub fn max_pair_links(&self) -> usize {
        self.max_pair_links
    }

    /// Most sections in one assembly.
    pub fn max_network_size(&self) -> usize {
        self.max_network_size
    }

    /// Deepest breadth-first row a section may be placed on.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = max_solutions;
        self
    }

    pub fn with_self_connections(mut self, allow: bool) -> Self {
        self.allow_self_connections = allow;
        self
    }

    pub fn with_max_pair_links(mut self, max_pair_links: usize) -> Self {
        self.max_pair_links = max_pair_links;
        self
    }

    pub fn with_max_network_size(mut self, max_network_size: usize) -> Self {
        self.max_network_size = max_network_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_solutions == 0 {
            return Err(ParameterError::NoSolutions);
        }
        if self.max_pair_links == 0 {
            return Err(ParameterError::NoPairLinks);
        }
        if self.max_network_size == 0 {
            return Err(ParameterError::NoNetwork);
        }
        Ok(())
    }
}
