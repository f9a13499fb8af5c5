// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Capability traits collapsed to closure type aliases: one function type
//! per application-facing role instead of a family of single-method
//! interfaces.

use std::sync::Arc;

use crate::{
    face::Face,
    name::Name,
    packet::{Data, Interest, InterestFilter, NetworkNack},
};

/// Fires at most once: either this, `OnTimeout`, or `OnNack` — never more
/// than one — for a given expressed Interest. `Sync` as well as `Send`
/// because entries carrying these sit inside a `DashMap`, which requires
/// its value type to be `Sync` to be shared across the engine's tasks.
pub type OnData = Box<dyn FnOnce(&Interest, &Data) + Send + Sync>;
pub type OnTimeout = Box<dyn FnOnce(&Interest) + Send + Sync>;
pub type OnNack = Box<dyn FnOnce(&Interest, &NetworkNack) + Send + Sync>;

/// May fire repeatedly for the lifetime of a registered filter, so it's
/// `Fn` behind an `Arc` rather than `FnOnce` behind a `Box` — cheap to
/// clone out from under the filter table's lock before invoking. Arguments
/// are `(prefix, interest, face, filter_id, filter)`: `face` is the handle
/// a producer calls `put_data` on to answer, `filter` the matched
/// `InterestFilter` itself (exposing e.g. its suffix regex).
pub type OnInterest = Arc<dyn Fn(&Name, &Interest, &Face, u64, &InterestFilter) + Send + Sync>;

pub type OnRegisterSuccess = Box<dyn FnOnce(&Name, u64) + Send + Sync>;
pub type OnRegisterFailed = Box<dyn FnOnce(&Name) + Send + Sync>;
