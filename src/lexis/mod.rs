// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The lexis: the pool of section templates and the rules saying which
//! connectors may mate.
//!
//! The search only talks to the lexis through the [`Lexis`] trait. The
//! in-memory [`Dictionary`] built by [`DictionaryBuilder`] is the stock
//! implementation.
//!
//! # Example
//!
//! ```
//! use section_assembly::lexis::{Connector, DictionaryBuilder, Lexis};
//!
//! let dict = DictionaryBuilder::new()
//!     .section("A", "a+ b-")
//!     .section("B", "b+ a-")
//!     .polar("a")
//!     .polar("b")
//!     .build()
//!     .unwrap();
//!
//! let a_minus = Connector::minus("a");
//! assert_eq!(dict.joints(&Connector::plus("a")), &[a_minus.clone()]);
//! assert_eq!(dict.sections(&a_minus)[0].name(), "B");
//! ```

pub mod connector;
pub mod section;

pub use connector::{Connector, Direction};
pub use section::{Section, SectionId};

use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Problems found while building a dictionary.
///
/// These are contract violations by whoever supplies the lexis, so they are
/// reported before any search starts.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DictionaryError {
    #[error("section {0} has no connectors")]
    EmptySection(String),
    #[error("section {0} is defined more than once")]
    DuplicateSection(String),
    #[error("section {section}: cannot parse connector {text:?}")]
    BadConnector { section: String, text: String },
    #[error("cannot parse connector {0:?} in mating rule")]
    BadJoint(String),
    #[error("section {section}: weight {key} = {value} is not finite and non-negative")]
    BadWeight {
        section: String,
        key: String,
        value: f64,
    },
}

/// Read-only view of a lexis, as consumed by the selection strategies.
pub trait Lexis {
    /// Templates containing `con`, in dictionary order.
    fn sections(&self, con: &Connector) -> &[Section];

    /// Connectors that `con` may mate with. Empty when no rule exists.
    fn joints(&self, con: &Connector) -> &[Connector];

    /// Numeric annotation `key` on the template behind `section`.
    fn weight(&self, section: &Section, key: &str) -> Option<f64>;
}

impl<L: Lexis + ?Sized> Lexis for &L {
    fn sections(&self, con: &Connector) -> &[Section] {
        (**self).sections(con)
    }

    fn joints(&self, con: &Connector) -> &[Connector] {
        (**self).joints(con)
    }

    fn weight(&self, section: &Section, key: &str) -> Option<f64> {
        (**self).weight(section, key)
    }
}

impl<L: Lexis + ?Sized> Lexis for Arc<L> {
    fn sections(&self, con: &Connector) -> &[Section] {
        (**self).sections(con)
    }

    fn joints(&self, con: &Connector) -> &[Connector] {
        (**self).joints(con)
    }

    fn weight(&self, section: &Section, key: &str) -> Option<f64> {
        (**self).weight(section, key)
    }
}

/// In-memory lexis.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    templates: Vec<Section>,
    by_name: HashMap<String, usize>,
    by_connector: HashMap<Connector, Vec<Section>>,
    joints: HashMap<Connector, Vec<Connector>>,
    /// Annotations, indexed by template.
    weights: Vec<BTreeMap<String, f64>>,
}

impl Dictionary {
    /// Look up a template by name.
    pub fn section_named(&self, name: &str) -> Option<&Section> {
        self.by_name.get(name).map(|&index| &self.templates[index])
    }

    /// All templates, in definition order.
    pub fn templates(&self) -> &[Section] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Lexis for Dictionary {
    fn sections(&self, con: &Connector) -> &[Section] {
        self.by_connector.get(con).map(Vec::as_slice).unwrap_or(&[])
    }

    fn joints(&self, con: &Connector) -> &[Connector] {
        self.joints.get(con).map(Vec::as_slice).unwrap_or(&[])
    }

    fn weight(&self, section: &Section, key: &str) -> Option<f64> {
        self.weights
            .get(section.template_index())
            .and_then(|annotations| annotations.get(key))
            .copied()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    connectors: String,
    weights: Vec<(String, f64)>,
}

/// Builder for [`Dictionary`].
///
/// Connectors are written in `name+` / `name-` notation, separated by
/// whitespace. Nothing is validated until [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    entries: Vec<Entry>,
    matings: Vec<(String, String)>,
    polar: Vec<String>,
    polar_all: bool,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template with uniform weight.
    pub fn section(self, name: &str, connectors: &str) -> Self {
        self.weighted(name, connectors, &[])
    }

    /// Add a template carrying numeric annotations.
    pub fn weighted(mut self, name: &str, connectors: &str, weights: &[(&str, f64)]) -> Self {
        self.entries.push(Entry {
            name: name.to_string(),
            connectors: connectors.to_string(),
            weights: weights
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
        });
        self
    }

    /// Allow `a` and `b` to mate with each other (both ways).
    pub fn mating(mut self, a: &str, b: &str) -> Self {
        self.matings.push((a.to_string(), b.to_string()));
        self
    }

    /// Allow `name+` to mate with `name-`.
    pub fn polar(mut self, name: &str) -> Self {
        self.polar.push(name.to_string());
        self
    }

    /// Apply [`polar`](Self::polar) to every connector type used by a section.
    pub fn polar_all(mut self) -> Self {
        self.polar_all = true;
        self
    }

    pub fn build(&self) -> Result<Dictionary, DictionaryError> {
        let mut dict = Dictionary::default();

        for entry in &self.entries {
            if dict.by_name.contains_key(&entry.name) {
                return Err(DictionaryError::DuplicateSection(entry.name.clone()));
            }

            let connectors = entry
                .connectors
                .split_whitespace()
                .map(|text| {
                    Connector::parse(text).ok_or_else(|| DictionaryError::BadConnector {
                        section: entry.name.clone(),
                        text: text.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if connectors.is_empty() {
                return Err(DictionaryError::EmptySection(entry.name.clone()));
            }

            let mut annotations = BTreeMap::new();
            for (key, value) in &entry.weights {
                if !value.is_finite() || *value < 0.0 {
                    return Err(DictionaryError::BadWeight {
                        section: entry.name.clone(),
                        key: key.clone(),
                        value: *value,
                    });
                }
                annotations.insert(key.clone(), *value);
            }

            let index = dict.templates.len();
            let template = Section::template(&entry.name, index, connectors);

            // A section listing the same connector twice is still one candidate.
            for con in template.connectors().iter().unique() {
                dict.by_connector
                    .entry(con.clone())
                    .or_default()
                    .push(template.clone());
            }

            dict.by_name.insert(entry.name.clone(), index);
            dict.weights.push(annotations);
            dict.templates.push(template);
        }

        for (a, b) in &self.matings {
            let a = Connector::parse(a).ok_or_else(|| DictionaryError::BadJoint(a.clone()))?;
            let b = Connector::parse(b).ok_or_else(|| DictionaryError::BadJoint(b.clone()))?;
            add_joint(&mut dict.joints, &a, &b);
            add_joint(&mut dict.joints, &b, &a);
        }

        let mut polar: Vec<String> = self.polar.clone();
        if self.polar_all {
            polar.extend(
                dict.templates
                    .iter()
                    .flat_map(|section| section.connectors().iter())
                    .map(|con| con.name().to_string()),
            );
        }
        for name in &polar {
            let plus = Connector::plus(name);
            let minus = Connector::minus(name);
            add_joint(&mut dict.joints, &plus, &minus);
            add_joint(&mut dict.joints, &minus, &plus);
        }

        Ok(dict)
    }
}

fn add_joint(joints: &mut HashMap<Connector, Vec<Connector>>, con: &Connector, mate: &Connector) {
    let mates = joints.entry(con.clone()).or_default();
    if !mates.contains(mate) {
        mates.push(mate.clone());
    }
}
