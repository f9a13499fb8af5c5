// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Reassembles transport byte deliveries into complete top-level TLV
//! elements. A delivery may split an element across reads, or may bundle
//! several elements into one read; either way the caller only ever sees
//! whole elements, in order.

use bytes::{Bytes, BytesMut};

use crate::{
    encoding::tlv::decode_varnum,
    error::{EncodingReason, NdnError, Result},
    wire::tlv_type as t,
};

#[derive(Debug, Default)]
pub struct ElementReader {
    residual: BytesMut,
}

impl ElementReader {
    pub fn new() -> Self {
        ElementReader::default()
    }

    /// Feeds newly-received bytes in, returning every complete element now
    /// available. Never blocks; leftover partial bytes stay buffered for
    /// the next call. An unrecognized leading type discards the residual
    /// buffer and returns `Err` — the caller should reset the transport,
    /// since the reader has no way to resynchronize mid-stream.
    pub fn on_received_data(&mut self, data: &[u8]) -> Result<Vec<Bytes>> {
        self.residual.extend_from_slice(data);
        let mut elements = Vec::new();

        loop {
            match try_split_one_element(&self.residual) {
                Ok(Some(len)) => {
                    let element = self.residual.split_to(len).freeze();
                    elements.push(element);
                },
                Ok(None) => break,
                Err(err) => {
                    self.residual.clear();
                    return Err(err);
                },
            }
        }

        Ok(elements)
    }
}

/// Returns the byte length of the leading complete TLV element in `buf`, or
/// `None` if `buf` doesn't yet hold one in full, or `Err` if the leading
/// type code isn't one of the recognized top-level element types.
fn try_split_one_element(buf: &[u8]) -> Result<Option<usize>> {
    if buf.is_empty() {
        return Ok(None);
    }
    let mut pos = 0;
    let type_code = match decode_varnum(buf, &mut pos) {
        Ok(v) => v,
        Err(EncodingReason::Truncated { .. }) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if !matches!(type_code, t::INTEREST | t::DATA | t::LP_PACKET) {
        return Err(bad_leading_byte());
    }
    let length = match decode_varnum(buf, &mut pos) {
        Ok(v) => v,
        Err(EncodingReason::Truncated { .. }) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let total = match pos.checked_add(length as usize) {
        Some(t) => t,
        None => return Err(bad_leading_byte()),
    };
    if total > buf.len() {
        Ok(None)
    } else {
        Ok(Some(total))
    }
}

/// Raised when the leading type code of a fresh element isn't one of the
/// recognized top-level element types (Interest, Data, NDNLPv2 packet); the
/// caller should reset the transport, since the reader has no way to
/// resynchronize.
pub fn bad_leading_byte() -> NdnError {
    NdnError::Encoding(EncodingReason::BadVarNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassembles_element_split_across_two_deliveries() {
        let mut reader = ElementReader::new();
        let whole = [5u8, 2, 0xAA, 0xBB];
        let first = reader.on_received_data(&whole[..2]).unwrap();
        assert!(first.is_empty());
        let second = reader.on_received_data(&whole[2..]).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].as_ref(), &whole[..]);
    }

    #[test]
    fn splits_two_bundled_elements_from_one_delivery() {
        let mut reader = ElementReader::new();
        let bundled = [5u8, 1, 0x01, 6u8, 1, 0x02];
        let elements = reader.on_received_data(&bundled).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].as_ref(), &[5, 1, 1]);
        assert_eq!(elements[1].as_ref(), &[6, 1, 2]);
    }

    #[test]
    fn unrecognized_leading_type_is_rejected_and_discards_residual() {
        let mut reader = ElementReader::new();
        let garbage = [200u8, 1, 0xAA, 5u8, 1, 0x01];
        let err = reader.on_received_data(&garbage).unwrap_err();
        assert!(matches!(err, NdnError::Encoding(EncodingReason::BadVarNumber)));
        // The whole delivery, including the well-formed Interest element
        // that followed the bad byte, was discarded along with it.
        assert!(reader.on_received_data(&[]).unwrap().is_empty());
    }

    #[test]
    fn leaves_partial_trailing_bytes_buffered() {
        let mut reader = ElementReader::new();
        let data = [5u8, 1, 0x01, 6u8, 2, 0xAA];
        let elements = reader.on_received_data(&data).unwrap();
        assert_eq!(elements.len(), 1);
        let rest = reader.on_received_data(&[0xBB]).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].as_ref(), &[6, 2, 0xAA, 0xBB]);
    }
}
