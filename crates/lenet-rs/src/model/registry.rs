use std::collections::HashMap;

use anyhow::Result;

use crate::backend::spec::SequentialSpec;

use super::config::ModelConfig;
use super::lenet::{self, LeNet};

/// Signature for architecture builders dispatched from model configs.
pub type BuildSpecFn = fn(&ModelConfig) -> Result<SequentialSpec>;

#[derive(Clone, Copy)]
pub struct ModelFactory {
    pub kind: &'static str,
    pub build: BuildSpecFn,
}

/// Returns the list of built-in model factories.
pub fn model_factories() -> &'static [ModelFactory] {
    &[ModelFactory {
        kind: lenet::KIND,
        build: LeNet::build_from_model_config,
    }]
}

pub fn model_factory(kind: &str) -> Option<BuildSpecFn> {
    model_factories()
        .iter()
        .find(|entry| entry.kind == kind)
        .map(|entry| entry.build)
}

/// Builds a lookup table for supported models.
///
/// This is useful when repeated kind lookups are expected; the construction
/// cost is low for the small built-in set but avoids O(N) scans in hot paths.
pub fn model_registry() -> HashMap<&'static str, BuildSpecFn> {
    let mut registry = HashMap::new();
    for entry in model_factories() {
        registry.insert(entry.kind, entry.build);
    }
    registry
}
