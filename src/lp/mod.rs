// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! NDNLPv2 link-layer envelope: header fields wrapping an Interest/Data
//! fragment. Only the header fields this runtime needs are modeled —
//! `IncomingFaceId` and `Nack`; everything else in a decoded envelope is
//! preserved as its raw fragment bytes and never otherwise inspected.

use bytes::Bytes;

use crate::{
    encoding::{TlvDecoder, TlvEncoder},
    error::{EncodingReason, NdnError, Result},
    packet::network_nack::{NackReason, NetworkNack},
    wire::tlv_type,
};

/// Header fields decoded from an NDNLPv2 packet, attached to the decoded
/// Interest/Data as a read-only back-reference so the application can read
/// `incoming_face_id` or a Nack reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LpPacket {
    pub incoming_face_id: Option<u64>,
    pub nack: Option<NetworkNack>,
}

impl LpPacket {
    pub fn is_empty_envelope(&self) -> bool {
        self.incoming_face_id.is_none() && self.nack.is_none()
    }
}

/// Decodes an `LpPacket` TLV, returning the header fields and the raw
/// fragment bytes (the caller decodes the fragment as Interest or Data).
pub fn decode_lp_packet(input: Bytes) -> Result<(LpPacket, Bytes)> {
    let mut dec = TlvDecoder::new(input);
    let end = dec
        .read_nested_tlvs_start(tlv_type::LP_PACKET)
        .map_err(NdnError::from)?;

    let mut lp = LpPacket::default();
    let mut fragment = Bytes::new();

    while dec.position() < end {
        let type_code = dec.peek_type().map_err(NdnError::from)?;
        match type_code {
            tlv_type::INCOMING_FACE_ID => {
                lp.incoming_face_id =
                    Some(dec.read_non_negative_integer_tlv(tlv_type::INCOMING_FACE_ID)?);
            },
            tlv_type::NACK => {
                let nack_end = dec
                    .read_nested_tlvs_start(tlv_type::NACK)
                    .map_err(NdnError::from)?;
                let reason = dec.read_non_negative_integer_tlv(tlv_type::NACK_REASON)?;
                dec.finish_nested_tlvs(nack_end, true).map_err(NdnError::from)?;
                lp.nack = Some(NetworkNack::new(NackReason::from_code(reason)));
            },
            tlv_type::FRAGMENT => {
                fragment = dec.read_blob_tlv(tlv_type::FRAGMENT)?.bytes();
            },
            other if other % 2 == 1 => {
                // Non-critical field this runtime doesn't model; skip it.
                let (_, length) = dec.read_type_and_length().map_err(NdnError::from)?;
                dec.seek(dec.position() + length as usize);
            },
            other => return Err(EncodingReason::UnrecognizedCritical(other).into()),
        }
    }
    dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;

    Ok((lp, fragment))
}

/// Encodes `fragment` (an already wire-encoded Interest or Data) wrapped in
/// an `LpPacket` envelope carrying `lp`'s header fields.
pub fn encode_lp_packet(lp: &LpPacket, fragment: &[u8]) -> Bytes {
    let mut enc = TlvEncoder::new();
    let start = enc.start_nested_tlv();

    enc.write_blob_tlv(tlv_type::FRAGMENT, fragment);

    if let Some(nack) = lp.nack {
        let nack_start = enc.start_nested_tlv();
        enc.write_non_negative_integer_tlv(tlv_type::NACK_REASON, nack.reason.to_code());
        enc.finish_nested_tlv(nack_start, tlv_type::NACK);
    }

    enc.write_optional_non_negative_integer_tlv(tlv_type::INCOMING_FACE_ID, lp.incoming_face_id);

    enc.finish_nested_tlv(start, tlv_type::LP_PACKET);
    enc.output()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_incoming_face_id_and_fragment() {
        let lp = LpPacket {
            incoming_face_id: Some(12),
            nack: None,
        };
        let wire = encode_lp_packet(&lp, b"fragment-bytes");
        let (decoded, fragment) = decode_lp_packet(wire).expect("decode");
        assert_eq!(decoded.incoming_face_id, Some(12));
        assert_eq!(fragment.as_ref(), b"fragment-bytes");
    }

    #[test]
    fn round_trips_nack_reason() {
        let lp = LpPacket {
            incoming_face_id: None,
            nack: Some(NetworkNack::new(NackReason::NoRoute)),
        };
        let wire = encode_lp_packet(&lp, b"x");
        let (decoded, _) = decode_lp_packet(wire).expect("decode");
        assert_eq!(decoded.nack, Some(NetworkNack::new(NackReason::NoRoute)));
    }
}
