// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search bookkeeping that is reported rather than searched over.

pub mod statistics;

pub use statistics::{Counters, Statistics};
