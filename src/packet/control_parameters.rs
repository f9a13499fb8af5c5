// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{name::Name, packet::forwarding_flags::ForwardingFlags};

/// Parameters attached to a command Interest addressed to the forwarder's
/// management namespace (e.g. `/localhost/nfd/rib/register`). All fields
/// are optional; NFD ignores any that are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlParameters {
    pub name: Option<Name>,
    pub face_id: Option<u64>,
    pub uri: Option<String>,
    pub local_control_feature: Option<u64>,
    pub origin: Option<u64>,
    pub cost: Option<u64>,
    pub flags: Option<ForwardingFlags>,
    pub strategy: Option<Name>,
    pub expiration_period: Option<u64>,
}

impl ControlParameters {
    pub fn new() -> Self {
        ControlParameters::default()
    }

    pub fn with_name(mut self, name: Name) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_flags(mut self, flags: ForwardingFlags) -> Self {
        self.flags = Some(flags);
        self
    }
}
