// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bitflags::bitflags;

bitflags! {
    /// Bit-exact with NFD's `ControlParameters.Flags` encoding: bit 0 is
    /// `childInherit`, bit 1 is `capture`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ForwardingFlags: u32 {
        const CHILD_INHERIT = 0b01;
        const CAPTURE = 0b10;
    }
}

impl ForwardingFlags {
    /// NFD's default: child-inherit set, capture clear.
    pub fn defaults() -> Self {
        ForwardingFlags::CHILD_INHERIT
    }
}
