// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sections ("puzzle pieces").
//!
//! A section is one graph node plus an ordered sequence of connectors.
//! The dictionary holds *templates*; the search places *instances*, each
//! carrying a [`SectionId`] that is unique within one assembly. The
//! connector sequence of an instance is shared with its template and never
//! changes; whether a connector is still open is recorded by the frame.

use crate::lexis::Connector;
use std::fmt;
use std::sync::Arc;

/// Identity of a placed section within one assembly.
///
/// Ids are handed out in placement order, so `SectionId(i)` is the i-th
/// section placed in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub usize);

impl SectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A section template or a placed instance of one.
///
/// Equality is structural: name, template, instance id and connector
/// sequence all take part. Two instances of the same template are therefore
/// distinct, while an instance is always equal to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section {
    name: Arc<str>,
    template: usize,
    instance: Option<SectionId>,
    connectors: Arc<[Connector]>,
}

impl Section {
    pub(crate) fn template(name: &str, template: usize, connectors: Vec<Connector>) -> Self {
        Self {
            name: Arc::from(name),
            template,
            instance: None,
            connectors: Arc::from(connectors),
        }
    }

    /// Create a fresh instance of this section's template.
    pub fn instantiate(&self, id: SectionId) -> Self {
        Self {
            name: Arc::clone(&self.name),
            template: self.template,
            instance: Some(id),
            connectors: Arc::clone(&self.connectors),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the template in the dictionary that produced this section.
    pub fn template_index(&self) -> usize {
        self.template
    }

    /// The instance id, or `None` for a dictionary template.
    pub fn id(&self) -> Option<SectionId> {
        self.instance
    }

    pub fn is_template(&self) -> bool {
        self.instance.is_none()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn connector(&self, offset: usize) -> &Connector {
        &self.connectors[offset]
    }

    pub fn contains(&self, con: &Connector) -> bool {
        self.connectors.iter().any(|c| c == con)
    }

    /// Offsets at which `con` appears, in order.
    pub fn offsets_of<'a>(&'a self, con: &'a Connector) -> impl Iterator<Item = usize> + 'a {
        self.connectors
            .iter()
            .enumerate()
            .filter(move |(_, c)| *c == con)
            .map(|(offset, _)| offset)
    }
}

impl fmt::Display for Section {
    /// Format as `name#id(a+ b-)`; templates omit the id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(id) = self.instance {
            write!(f, "{}", id)?;
        }
        write!(f, "(")?;
        for (offset, con) in self.connectors.iter().enumerate() {
            if offset > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", con)?;
        }
        write!(f, ")")
    }
}
