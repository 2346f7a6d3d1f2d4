// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use section_assembly::frame::Endpoint;
use section_assembly::lexis::Lexis;
use section_assembly::{Dictionary, DictionaryBuilder, Frame, Parameters, Section};
use std::collections::HashSet;

/// `A {a+ b-}` and `B {b+ a-}`: closes as a two-section loop.
pub fn polar_pair() -> Dictionary {
    DictionaryBuilder::new()
        .section("A", "a+ b-")
        .section("B", "b+ a-")
        .polar_all()
        .build()
        .unwrap()
}

/// `S {x+ x-}`: can only close on itself.
pub fn self_only() -> Dictionary {
    DictionaryBuilder::new()
        .section("S", "x+ x-")
        .polar("x")
        .build()
        .unwrap()
}

/// A hub with three plugs, leaves, and pipes that extend a branch.
pub fn star() -> Dictionary {
    DictionaryBuilder::new()
        .section("hub", "a+ a+ a+")
        .section("leaf", "a-")
        .section("pipe", "a- a+")
        .polar("a")
        .build()
        .unwrap()
}

/// Chains that never end: every link needs another.
pub fn endless_chain() -> Dictionary {
    DictionaryBuilder::new()
        .section("head", "n+")
        .section("link", "n- n+")
        .polar("n")
        .build()
        .unwrap()
}

pub fn seed(dict: &Dictionary, names: &[&str]) -> Vec<Section> {
    names
        .iter()
        .map(|name| dict.section_named(name).unwrap().clone())
        .collect()
}

/// Names of the placed sections, in placement order.
pub fn section_names(frame: &Frame) -> Vec<String> {
    frame.sections().map(|s| s.name().to_string()).collect()
}

/// Check every property a solution frame must have.
pub fn assert_valid_solution(frame: &Frame, lexis: &impl Lexis, parameters: &Parameters) {
    assert!(frame.is_solution());
    assert_eq!(frame.open_sections().count(), 0);
    assert!(frame.size() <= parameters.max_network_size());
    assert!(frame.depth() <= parameters.max_depth());

    let mut used = HashSet::new();
    for link in frame.links() {
        let (a, b) = link.ends();
        for end in [a, b] {
            assert!(
                used.insert((end.section, end.offset)),
                "connector {} is used twice",
                end
            );
            let section = frame.section(end.section).unwrap();
            assert_eq!(section.connector(end.offset), &end.connector);
        }
        assert!(
            lexis.joints(&a.connector).contains(&b.connector),
            "{} does not mate with {}",
            a.connector,
            b.connector
        );
        if !parameters.allow_self_connections() {
            assert_ne!(a.section, b.section, "self connection {}", link);
        }
        assert!(frame.links_between(a.section, b.section) <= parameters.max_pair_links());
    }

    let connectors: usize = frame.sections().map(|s| s.connectors().len()).sum();
    assert_eq!(used.len(), connectors);

    for section in frame.sections() {
        let id = section.id().unwrap();
        for (offset, connector) in section.connectors().iter().enumerate() {
            let end = Endpoint::new(id, offset, connector.clone());
            let links = frame.links().iter().filter(|link| link.consumes(&end)).count();
            assert_eq!(links, 1, "connector {} is not linked exactly once", end);
        }
    }
}
