// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dashmap::DashMap;

use crate::name::Name;

pub struct RegisteredPrefixEntry {
    pub id: u64,
    pub prefix: Name,
    /// Set when registration auto-created an `InterestFilterEntry`; removing
    /// the registration must remove this filter too.
    pub linked_filter_id: Option<u64>,
}

/// Tracks the `(registeredPrefixId -> linkedInterestFilterId)` relation.
#[derive(Default)]
pub struct RegisteredPrefixTable {
    entries: DashMap<u64, RegisteredPrefixEntry>,
}

impl RegisteredPrefixTable {
    pub fn new() -> Self {
        RegisteredPrefixTable::default()
    }

    pub fn add(&self, entry: RegisteredPrefixEntry) {
        self.entries.insert(entry.id, entry);
    }

    pub fn remove_registered_prefix(&self, id: u64) -> Option<RegisteredPrefixEntry> {
        self.entries.remove(&id).map(|(_, v)| v)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
