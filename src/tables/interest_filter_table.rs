// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dashmap::DashMap;

use crate::{
    node::callbacks::OnInterest,
    packet::{Interest, InterestFilter},
};

#[cfg(test)]
use crate::name::Name;

struct InterestFilterEntry {
    filter: InterestFilter,
    on_interest: OnInterest,
}

/// A filter that matched an incoming Interest, snapshotted out of the
/// table so the caller can invoke it outside any table lock.
pub struct MatchedFilter {
    pub id: u64,
    pub filter: InterestFilter,
    pub on_interest: OnInterest,
}

/// Interests registered either directly via `setInterestFilter` or
/// implicitly by a successful `registerPrefix`.
#[derive(Default)]
pub struct InterestFilterTable {
    entries: DashMap<u64, InterestFilterEntry>,
}

impl InterestFilterTable {
    pub fn new() -> Self {
        InterestFilterTable::default()
    }

    pub fn set_interest_filter(&self, id: u64, filter: InterestFilter, on_interest: OnInterest) {
        self.entries.insert(id, InterestFilterEntry { filter, on_interest });
    }

    pub fn unset_interest_filter(&self, id: u64) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Returns a snapshot of every filter whose prefix is a name-prefix of
    /// `interest`'s name (and, if a regex is set, whose suffix matches).
    pub fn get_matched_filters(&self, interest: &Interest) -> Vec<MatchedFilter> {
        self.entries
            .iter()
            .filter(|kv| kv.value().filter.matches(interest))
            .map(|kv| MatchedFilter {
                id: *kv.key(),
                filter: kv.value().filter.clone(),
                on_interest: kv.value().on_interest.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
