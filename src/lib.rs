// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Backtracking assembly of connected graphs from typed puzzle pieces.
//!
//! A lexis holds *sections*: graph nodes, each with an ordered list of typed
//! *connectors*. Starting from a seed, the search repeatedly mates an open
//! connector with a compatible connector on another section, either one
//! already placed or a fresh copy of a lexis template, until nothing is left
//! open. Every such closed assembly is a *solution*.
//!
//! # Architecture
//!
//! The crate is layered, leaves first:
//!
//! - [`lexis`]: connectors, sections, and the [`Lexis`] trait through which
//!   the search reads templates, mating rules (joints) and weights. The
//!   in-memory [`Dictionary`] is the stock implementation.
//! - [`frame`]: immutable snapshots of a partial assembly, the undirected
//!   links between connectors, and the odometer wheels that track each
//!   choice point.
//! - [`strategy`]: the [`SelectionStrategy`] contract and its two stock
//!   implementations. [`DeterministicStrategy`] enumerates candidates in a
//!   fixed order; [`StochasticStrategy`] draws them from weighted
//!   distributions.
//! - [`engine`]: the [`Aggregate`] driver, a breadth-first search over
//!   explicit frame and odometer stacks.
//!
//! # Search Algorithm
//!
//! The driver always works on the earliest-created open connector, so
//! sections are filled in breadth-first order. For that connector it asks
//! the strategy for candidates, preferring sections already in the
//! assembly over new ones. Local rules prune as it goes: no linking a
//! section to itself unless allowed, at most `max_pair_links` links between
//! any two sections, and caps on network size and depth. Backtracking pops
//! a frame and resumes the parent's choice point.
//!
//! # Example
//!
//! ```
//! use section_assembly::{Aggregate, DeterministicStrategy, DictionaryBuilder, Parameters};
//!
//! // A chain end, a chain link, and a terminator.
//! let dict = DictionaryBuilder::new()
//!     .section("head", "n+")
//!     .section("link", "n- n+")
//!     .section("tail", "n-")
//!     .polar("n")
//!     .build()
//!     .unwrap();
//! let seed = vec![dict.section_named("head").unwrap().clone()];
//!
//! let parameters = Parameters::default().with_max_network_size(3);
//! let mut aggregate = Aggregate::new(DeterministicStrategy::new(dict), parameters).unwrap();
//! let report = aggregate.run(&seed).unwrap();
//!
//! // head-tail and head-link-tail.
//! assert_eq!(report.solutions, 2);
//! ```

pub mod engine;
pub mod frame;
pub mod lexis;
pub mod parameters;
pub mod state;
pub mod strategy;

// Re-export commonly used types
pub use engine::{Aggregate, AssemblyError, SearchReport, SearchState};
pub use frame::{Frame, Link};
pub use lexis::{Connector, Dictionary, DictionaryBuilder, Lexis, Section};
pub use parameters::{ParameterError, Parameters};
pub use state::{Counters, Statistics};
pub use strategy::{DeterministicStrategy, RandomParameters, SelectionStrategy, StochasticStrategy};
