// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{name::NameComponent, packet::signature::KeyLocator};

/// One entry of an `Exclude` selector: either a specific component or the
/// `Any` wildcard marking "everything between the surrounding components".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeEntry {
    Component(NameComponent),
    Any,
}

/// `Exclude` selector: an ordered list of components and `Any` wildcards.
/// Advisory only — the forwarder applies it, this runtime never filters
/// incoming Data against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclude {
    pub entries: Vec<ExcludeEntry>,
}

/// Selectors narrow an Interest's match set at the forwarder; this runtime
/// carries them only to encode/decode them faithfully, never to filter
/// Data itself (see `PendingInterestTable` match rule).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    pub min_suffix_components: Option<u64>,
    pub max_suffix_components: Option<u64>,
    pub publisher_public_key_locator: Option<KeyLocator>,
    pub exclude: Option<Exclude>,
    pub child_selector: Option<u64>,
    pub must_be_fresh: bool,
}

impl Selectors {
    pub fn new() -> Self {
        Selectors::default()
    }

    pub fn is_empty(&self) -> bool {
        self.min_suffix_components.is_none()
            && self.max_suffix_components.is_none()
            && self.publisher_public_key_locator.is_none()
            && self.exclude.is_none()
            && self.child_selector.is_none()
            && !self.must_be_fresh
    }
}
