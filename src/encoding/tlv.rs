// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! NDN-TLV primitive codec.
//!
//! Every on-the-wire record is `type || length || value`, where `type` and
//! `length` are variable-length non-negative integers ("VAR-NUMBER", 1, 3, 5,
//! or 9 bytes) and `value` is either a raw blob or a nested sequence of
//! further TLV records.
//!
//! [`TlvEncoder`] builds its output backward: every `write_*` call prepends
//! to whatever has already been written, so a container only needs to know
//! its body's length once every child has been written — there is no need to
//! pre-compute sizes top-down.

use bytes::Bytes;

use crate::{blob::Blob, error::EncodingReason};

type Result<T> = std::result::Result<T, EncodingReason>;

/// Encodes `v` as an NDN-TLV VAR-NUMBER: 1 byte for `v < 253`, a `0xFD`
/// marker plus 2 big-endian bytes for `v <= 0xFFFF`, `0xFE` plus 4 bytes for
/// `v <= 0xFFFF_FFFF`, otherwise `0xFF` plus 8 bytes.
pub fn encode_varnum(v: u64) -> Vec<u8> {
    if v < 253 {
        vec![v as u8]
    } else if v <= 0xFFFF {
        let b = (v as u16).to_be_bytes();
        vec![0xFD, b[0], b[1]]
    } else if v <= 0xFFFF_FFFF {
        let b = (v as u32).to_be_bytes();
        vec![0xFE, b[0], b[1], b[2], b[3]]
    } else {
        let b = v.to_be_bytes();
        let mut out = Vec::with_capacity(9);
        out.push(0xFF);
        out.extend_from_slice(&b);
        out
    }
}

/// Decodes a VAR-NUMBER starting at `input[pos]`, advancing `pos` past it.
/// Non-minimal encodings are accepted (decoding is lenient; only the encoder
/// must be minimal).
pub fn decode_varnum(input: &[u8], pos: &mut usize) -> Result<u64> {
    let first = *input.get(*pos).ok_or(EncodingReason::Truncated {
        needed: 1,
        available: input.len().saturating_sub(*pos),
    })?;

    match first {
        0..=252 => {
            *pos += 1;
            Ok(first as u64)
        },
        0xFD => read_be(input, *pos + 1, 2).map(|v| {
            *pos += 3;
            v
        }),
        0xFE => read_be(input, *pos + 1, 4).map(|v| {
            *pos += 5;
            v
        }),
        0xFF => read_be(input, *pos + 1, 8).map(|v| {
            *pos += 9;
            v
        }),
        _ => unreachable!("u8 match is exhaustive"),
    }
}

fn read_be(input: &[u8], start: usize, len: usize) -> Result<u64> {
    let end = start.checked_add(len).ok_or(EncodingReason::BadVarNumber)?;
    let slice = input.get(start..end).ok_or(EncodingReason::Truncated {
        needed: end,
        available: input.len(),
    })?;
    let mut buf = [0u8; 8];
    buf[8 - len..].copy_from_slice(slice);
    Ok(u64::from_be_bytes(buf))
}

/// Encodes `v` as a minimal big-endian NonNegativeInteger value (1, 2, 4, or
/// 8 bytes — no VAR-NUMBER marker; this is the encoding used *inside* a TLV
/// value, not for type/length fields).
pub fn encode_non_negative_integer(v: u64) -> Vec<u8> {
    if v <= 0xFF {
        vec![v as u8]
    } else if v <= 0xFFFF {
        (v as u16).to_be_bytes().to_vec()
    } else if v <= 0xFFFF_FFFF {
        (v as u32).to_be_bytes().to_vec()
    } else {
        v.to_be_bytes().to_vec()
    }
}

/// Decodes a NonNegativeInteger value; `bytes.len()` must be 1, 2, 4, or 8.
pub fn decode_non_negative_integer(bytes: &[u8]) -> Result<u64> {
    match bytes.len() {
        1 => Ok(bytes[0] as u64),
        2 => Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as u64),
        4 => {
            let mut a = [0u8; 4];
            a.copy_from_slice(bytes);
            Ok(u32::from_be_bytes(a) as u64)
        },
        8 => {
            let mut a = [0u8; 8];
            a.copy_from_slice(bytes);
            Ok(u64::from_be_bytes(a))
        },
        other => Err(EncodingReason::InvalidIntegerLength(other)),
    }
}

/// Backward-growing TLV encoder. `buf` holds the output in *reverse* byte
/// order; every prepend operation pushes onto its end, and [`Self::output`]
/// reverses once at the end to produce the real, forward-ordered packet.
///
/// Because every `write_*` call prepends ahead of everything written so
/// far, sibling records must be written in the *reverse* of their desired
/// wire order — the last call ends up first on the wire. This mirrors how
/// a reference NDN-TLV encoder builds a Data packet by prepending
/// SignatureValue, then SignatureInfo, then Content, then MetaInfo, then
/// Name, so that Name ends up first in the final encoding.
#[derive(Debug, Default)]
pub struct TlvEncoder {
    buf: Vec<u8>,
}

impl TlvEncoder {
    pub fn new() -> Self {
        TlvEncoder { buf: Vec::new() }
    }

    fn prepend_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    fn prepend_varnum(&mut self, v: u64) {
        // encode_varnum is at most 9 bytes long; reverse in place rather
        // than allocating twice.
        let encoded = encode_varnum(v);
        self.prepend_bytes(&encoded);
    }

    pub fn write_type(&mut self, type_code: u64) {
        self.prepend_varnum(type_code);
    }

    pub fn write_length(&mut self, length: u64) {
        self.prepend_varnum(length);
    }

    /// Writes a complete `type || length || value` record for a raw blob.
    pub fn write_blob_tlv(&mut self, type_code: u64, value: &[u8]) {
        self.prepend_bytes(value);
        self.write_length(value.len() as u64);
        self.write_type(type_code);
    }

    /// Writes a complete record whose value is a minimally-encoded
    /// NonNegativeInteger.
    pub fn write_non_negative_integer_tlv(&mut self, type_code: u64, value: u64) {
        let encoded = encode_non_negative_integer(value);
        self.prepend_bytes(&encoded);
        self.write_length(encoded.len() as u64);
        self.write_type(type_code);
    }

    /// As [`Self::write_non_negative_integer_tlv`], but a no-op when `value`
    /// is `None` — the idiomatic replacement for the "−1 means absent"
    /// convention used by optional integer fields in the data model.
    pub fn write_optional_non_negative_integer_tlv(
        &mut self,
        type_code: u64,
        value: Option<u64>,
    ) {
        if let Some(v) = value {
            self.write_non_negative_integer_tlv(type_code, v);
        }
    }

    /// Returns a marker recording the current body length; pass it to
    /// [`Self::finish_nested_tlv`] once every child of the container has
    /// been written.
    pub fn start_nested_tlv(&self) -> usize {
        self.buf.len()
    }

    /// Closes a container opened with [`Self::start_nested_tlv`], writing
    /// its `type` and `length` ahead of everything written since `start`.
    pub fn finish_nested_tlv(&mut self, start: usize, type_code: u64) {
        let body_len = (self.buf.len() - start) as u64;
        self.write_length(body_len);
        self.write_type(type_code);
    }

    /// Finalizes the encoder, producing the forward-ordered wire bytes.
    pub fn output(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

/// Random-access decoder over an immutable input buffer.
#[derive(Debug, Clone)]
pub struct TlvDecoder {
    input: Bytes,
    pos: usize,
}

impl TlvDecoder {
    pub fn new(input: impl Into<Bytes>) -> Self {
        TlvDecoder {
            input: input.into(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Reads the type code at the current position without consuming it.
    pub fn peek_type(&self) -> Result<u64> {
        let mut p = self.pos;
        decode_varnum(&self.input, &mut p)
    }

    /// Reads and consumes a `(type, length)` pair, leaving the position at
    /// the start of the value.
    pub fn read_type_and_length(&mut self) -> Result<(u64, u64)> {
        let type_code = decode_varnum(&self.input, &mut self.pos)?;
        let length = decode_varnum(&self.input, &mut self.pos)?;
        let end = self
            .pos
            .checked_add(length as usize)
            .ok_or(EncodingReason::NestedOverflow)?;
        if end > self.input.len() {
            return Err(EncodingReason::Truncated {
                needed: end,
                available: self.input.len(),
            });
        }
        Ok((type_code, length))
    }

    /// Reads `(type, length)` and asserts `type == expected_type`.
    fn read_type_and_length_expect(&mut self, expected_type: u64) -> Result<u64> {
        let (type_code, length) = self.read_type_and_length()?;
        if type_code != expected_type {
            return Err(EncodingReason::UnexpectedType {
                expected: expected_type,
                found: type_code,
            });
        }
        Ok(length)
    }

    pub fn read_non_negative_integer_tlv(&mut self, expected_type: u64) -> Result<u64> {
        let length = self.read_type_and_length_expect(expected_type)?;
        let start = self.pos;
        let end = start + length as usize;
        let value = decode_non_negative_integer(&self.input[start..end])?;
        self.pos = end;
        Ok(value)
    }

    pub fn read_optional_non_negative_integer_tlv(
        &mut self,
        expected_type: u64,
    ) -> Result<Option<u64>> {
        if !self.is_empty() && self.peek_type()? == expected_type {
            Ok(Some(self.read_non_negative_integer_tlv(expected_type)?))
        } else {
            Ok(None)
        }
    }

    /// Reads exactly `length` bytes starting at the current position as a
    /// [`Blob`], advancing past them. Used after [`Self::read_type_and_length`]
    /// when the caller doesn't know the type ahead of time (e.g. iterating
    /// over a name's components, each of which may carry a different type
    /// code).
    pub fn read_value(&mut self, length: u64) -> Result<Blob> {
        let start = self.pos;
        let end = start + length as usize;
        let value = self.input.slice(start..end);
        self.pos = end;
        Ok(Blob::from(value))
    }

    pub fn read_blob_tlv(&mut self, expected_type: u64) -> Result<Blob> {
        let length = self.read_type_and_length_expect(expected_type)?;
        let start = self.pos;
        let end = start + length as usize;
        let value = self.input.slice(start..end);
        self.pos = end;
        Ok(Blob::from(value))
    }

    pub fn read_optional_blob_tlv(&mut self, expected_type: u64) -> Result<Option<Blob>> {
        if !self.is_empty() && self.peek_type()? == expected_type {
            Ok(Some(self.read_blob_tlv(expected_type)?))
        } else {
            Ok(None)
        }
    }

    /// Reads the `(type, length)` header of a nested container, returning
    /// the offset at which its body ends. Pass that offset to
    /// [`Self::finish_nested_tlvs`] once every expected child has been read.
    pub fn read_nested_tlvs_start(&mut self, expected_type: u64) -> Result<usize> {
        let length = self.read_type_and_length_expect(expected_type)?;
        Ok(self.pos + length as usize)
    }

    /// Verifies the decoder has consumed exactly up to `end`. If it hasn't
    /// and `allow_unrecognized` is set, skips trailing TLVs whose type is
    /// *non-critical* (odd-numbered, per the NDN-TLV evolvability rule);
    /// an even-numbered trailing type is always an error.
    pub fn finish_nested_tlvs(&mut self, end: usize, allow_unrecognized: bool) -> Result<()> {
        while self.pos < end {
            let type_code = self.peek_type()?;
            if !allow_unrecognized || type_code % 2 == 0 {
                return Err(EncodingReason::UnrecognizedCritical(type_code));
            }
            let (_, length) = self.read_type_and_length()?;
            self.pos += length as usize;
        }
        if self.pos != end {
            return Err(EncodingReason::NestedOverflow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varnum_round_trip_across_all_size_classes() {
        for v in [0u64, 1, 252, 253, 0xFFFF, 0x1_0000, 0xFFFF_FFFF, u64::MAX] {
            let encoded = encode_varnum(v);
            let mut pos = 0;
            let decoded = decode_varnum(&encoded, &mut pos).expect("decode");
            assert_eq!(decoded, v);
            assert_eq!(pos, encoded.len());
        }
    }

    #[test]
    fn varnum_size_classes_match_spec() {
        assert_eq!(encode_varnum(252).len(), 1);
        assert_eq!(encode_varnum(253).len(), 3);
        assert_eq!(encode_varnum(0xFFFF).len(), 3);
        assert_eq!(encode_varnum(0x1_0000).len(), 5);
        assert_eq!(encode_varnum(0xFFFF_FFFF).len(), 5);
        assert_eq!(encode_varnum(0x1_0000_0000).len(), 9);
    }

    #[test]
    fn non_negative_integer_chooses_minimal_width() {
        assert_eq!(encode_non_negative_integer(0).len(), 1);
        assert_eq!(encode_non_negative_integer(0xFF).len(), 1);
        assert_eq!(encode_non_negative_integer(0x100).len(), 2);
        assert_eq!(encode_non_negative_integer(0xFFFF).len(), 2);
        assert_eq!(encode_non_negative_integer(0x1_0000).len(), 4);
        assert_eq!(encode_non_negative_integer(0xFFFF_FFFF).len(), 4);
        assert_eq!(encode_non_negative_integer(0x1_0000_0000).len(), 8);
    }

    #[test]
    fn non_negative_integer_round_trip() {
        for v in [0u64, 1, 0xFF, 0x1234, 0xFFFF_FFFF, u64::MAX] {
            let encoded = encode_non_negative_integer(v);
            assert_eq!(decode_non_negative_integer(&encoded).expect("decode"), v);
        }
    }

    #[test]
    fn rejects_invalid_integer_length() {
        let err = decode_non_negative_integer(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, EncodingReason::InvalidIntegerLength(3));
    }

    #[test]
    fn blob_tlv_round_trips() {
        let mut enc = TlvEncoder::new();
        enc.write_blob_tlv(8, b"hello");
        let bytes = enc.output();

        let mut dec = TlvDecoder::new(bytes);
        let blob = dec.read_blob_tlv(8).expect("decode");
        assert_eq!(blob.as_bytes(), b"hello");
        assert!(dec.is_empty());
    }

    #[test]
    fn nested_tlv_wraps_children_in_forward_order() {
        let mut enc = TlvEncoder::new();
        let start = enc.start_nested_tlv();
        // Written in reverse of the desired wire order: the later call
        // ends up first in the final encoding.
        enc.write_blob_tlv(8, b"x");
        enc.write_non_negative_integer_tlv(10, 42);
        enc.finish_nested_tlv(start, 100);
        let bytes = enc.output();

        let mut dec = TlvDecoder::new(bytes);
        let end = dec.read_nested_tlvs_start(100).expect("start");
        let n = dec.read_non_negative_integer_tlv(10).expect("int");
        assert_eq!(n, 42);
        let b = dec.read_blob_tlv(8).expect("blob");
        assert_eq!(b.as_bytes(), b"x");
        dec.finish_nested_tlvs(end, false).expect("finish");
    }

    #[test]
    fn finish_nested_tlvs_skips_non_critical_trailing_types() {
        let mut enc = TlvEncoder::new();
        let start = enc.start_nested_tlv();
        enc.write_blob_tlv(9, b"future-non-critical");
        enc.write_blob_tlv(8, b"x");
        enc.finish_nested_tlv(start, 100);
        let bytes = enc.output();

        let mut dec = TlvDecoder::new(bytes);
        let end = dec.read_nested_tlvs_start(100).expect("start");
        let b = dec.read_blob_tlv(8).expect("blob");
        assert_eq!(b.as_bytes(), b"x");
        dec.finish_nested_tlvs(end, true).expect("finish");
    }

    #[test]
    fn finish_nested_tlvs_rejects_critical_trailing_types() {
        let mut enc = TlvEncoder::new();
        let start = enc.start_nested_tlv();
        enc.write_blob_tlv(200, b"future-critical");
        enc.write_blob_tlv(8, b"x");
        enc.finish_nested_tlv(start, 100);
        let bytes = enc.output();

        let mut dec = TlvDecoder::new(bytes);
        let end = dec.read_nested_tlvs_start(100).expect("start");
        let _ = dec.read_blob_tlv(8).expect("blob");
        let err = dec.finish_nested_tlvs(end, true).unwrap_err();
        assert_eq!(err, EncodingReason::UnrecognizedCritical(200));
    }

    #[test]
    fn truncated_input_is_reported() {
        let mut dec = TlvDecoder::new(Bytes::from_static(&[8, 5, b'h', b'i']));
        let err = dec.read_blob_tlv(8).unwrap_err();
        assert!(matches!(err, EncodingReason::Truncated { .. }));
    }
}
