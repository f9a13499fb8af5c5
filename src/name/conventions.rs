// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Marker-byte helpers for the well-known naming conventions (NDN naming
//! convention rev2): a one-byte marker followed by a big-endian unsigned
//! integer, wrapped in a generic name component.

use super::component::NameComponent;

const MARKER_SEGMENT: u8 = 0x00;
const MARKER_BYTE_OFFSET: u8 = 0xFB;
const MARKER_VERSION: u8 = 0xFD;
const MARKER_TIMESTAMP: u8 = 0xFC;
const MARKER_SEQUENCE_NUMBER: u8 = 0xFE;

fn encode_marked(marker: u8, value: u64) -> NameComponent {
    let be = value.to_be_bytes();
    let first_nonzero = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    let mut out = Vec::with_capacity(1 + (be.len() - first_nonzero));
    out.push(marker);
    out.extend_from_slice(&be[first_nonzero..]);
    NameComponent::generic(out)
}

fn decode_marked(component: &NameComponent, marker: u8) -> Option<u64> {
    let bytes = component.value().as_bytes();
    if bytes.first() != Some(&marker) {
        return None;
    }
    let digits = &bytes[1..];
    if digits.is_empty() || digits.len() > 8 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[8 - digits.len()..].copy_from_slice(digits);
    Some(u64::from_be_bytes(buf))
}

pub fn segment(value: u64) -> NameComponent {
    encode_marked(MARKER_SEGMENT, value)
}

pub fn to_segment(component: &NameComponent) -> Option<u64> {
    decode_marked(component, MARKER_SEGMENT)
}

pub fn byte_offset(value: u64) -> NameComponent {
    encode_marked(MARKER_BYTE_OFFSET, value)
}

pub fn to_byte_offset(component: &NameComponent) -> Option<u64> {
    decode_marked(component, MARKER_BYTE_OFFSET)
}

pub fn version(value: u64) -> NameComponent {
    encode_marked(MARKER_VERSION, value)
}

pub fn to_version(component: &NameComponent) -> Option<u64> {
    decode_marked(component, MARKER_VERSION)
}

/// `value` is microseconds since the Unix epoch.
pub fn timestamp(value: u64) -> NameComponent {
    encode_marked(MARKER_TIMESTAMP, value)
}

pub fn to_timestamp(component: &NameComponent) -> Option<u64> {
    decode_marked(component, MARKER_TIMESTAMP)
}

pub fn sequence_number(value: u64) -> NameComponent {
    encode_marked(MARKER_SEQUENCE_NUMBER, value)
}

pub fn to_sequence_number(component: &NameComponent) -> Option<u64> {
    decode_marked(component, MARKER_SEQUENCE_NUMBER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_round_trips() {
        let c = segment(42);
        assert_eq!(to_segment(&c), Some(42));
    }

    #[test]
    fn segment_zero_keeps_one_digit_byte() {
        let c = segment(0);
        assert_eq!(c.value().as_bytes(), &[MARKER_SEGMENT, 0x00]);
    }

    #[test]
    fn mismatched_marker_does_not_decode() {
        let c = version(7);
        assert_eq!(to_segment(&c), None);
    }

    #[test]
    fn large_values_round_trip() {
        let c = timestamp(u64::MAX);
        assert_eq!(to_timestamp(&c), Some(u64::MAX));
    }
}
