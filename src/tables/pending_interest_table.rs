// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::{
    node::callbacks::{OnData, OnNack, OnTimeout},
    packet::{Data, Interest},
};

/// An outstanding `expressInterest` awaiting Data, Nack, or timeout.
pub struct PendingInterestEntry {
    pub id: u64,
    pub interest: Interest,
    pub on_data: Option<OnData>,
    pub on_timeout: Option<OnTimeout>,
    pub on_nack: Option<OnNack>,
    /// Cancelled when the entry is removed for any reason, so the
    /// scheduled timeout task becomes a no-op on fire.
    pub timeout_cancel: CancellationToken,
}

/// Consumer-side table of Interests awaiting a response. Internally
/// locked via `DashMap`; every operation below is atomic with respect to
/// concurrent table access.
#[derive(Default)]
pub struct PendingInterestTable {
    entries: DashMap<u64, PendingInterestEntry>,
}

impl PendingInterestTable {
    pub fn new() -> Self {
        PendingInterestTable::default()
    }

    pub fn add(&self, entry: PendingInterestEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Removes the entry if present. The return value tells the caller
    /// whether a timeout callback should now fire (it should not, if the
    /// entry had already been satisfied or was never present).
    pub fn remove_entry(&self, id: u64) -> Option<PendingInterestEntry> {
        self.entries.remove(&id).map(|(_, v)| v)
    }

    /// Removes and returns every entry whose Interest name is a
    /// name-prefix of `data`'s name. Selectors are not enforced here —
    /// that's the forwarder's responsibility.
    pub fn extract_entries_for_expressed_interest(&self, data: &Data) -> Vec<PendingInterestEntry> {
        let matching: Vec<u64> = self
            .entries
            .iter()
            .filter(|kv| kv.value().interest.name().is_prefix_of(data.name()))
            .map(|kv| *kv.key())
            .collect();
        matching
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|(_, v)| v))
            .collect()
    }

    /// Removes and returns every entry whose stored Interest has the same
    /// name and nonce as the Interest a Nack wraps.
    pub fn extract_entries_for_nack_interest(&self, interest: &Interest) -> Vec<PendingInterestEntry> {
        let matching: Vec<u64> = self
            .entries
            .iter()
            .filter(|kv| {
                kv.value().interest.name() == interest.name()
                    && kv.value().interest.nonce() == interest.nonce()
            })
            .map(|kv| *kv.key())
            .collect();
        matching
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|(_, v)| v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
