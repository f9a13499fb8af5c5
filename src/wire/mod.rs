// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `WireFormat` capability set: a bidirectional mapping between the
//! packet model and its byte encoding. The engine is generic over this
//! trait rather than hard-coded to a single format; only the NDN-TLV
//! format is implemented, since the legacy Binary-XML format is an
//! explicit non-goal.

pub mod tlv_type;
pub mod tlv_wire_format;

use bytes::Bytes;

use crate::{
    error::Result,
    lp::LpPacket,
    name::Name,
    packet::{ControlParameters, ControlResponse, Data, DelegationSet, Interest, Signature},
};

pub use tlv_wire_format::TlvWireFormat;

/// A `[begin, end)` byte range within a packet's own wire encoding, used to
/// report the portion covered by a signature.
pub type SignedRange = (usize, usize);

pub trait WireFormat {
    fn encode_name(&self, name: &Name) -> Bytes;
    fn decode_name(&self, input: Bytes) -> Result<Name>;

    fn encode_interest(&self, interest: &Interest) -> Result<(Bytes, SignedRange)>;
    fn decode_interest(&self, input: Bytes) -> Result<(Interest, SignedRange)>;

    fn encode_data(&self, data: &Data) -> Result<(Bytes, SignedRange)>;
    fn decode_data(&self, input: Bytes) -> Result<(Data, SignedRange)>;

    fn encode_control_parameters(&self, params: &ControlParameters) -> Bytes;
    fn decode_control_parameters(&self, input: Bytes) -> Result<ControlParameters>;

    fn encode_control_response(&self, response: &ControlResponse) -> Bytes;
    fn decode_control_response(&self, input: Bytes) -> Result<ControlResponse>;

    fn encode_signature_info(&self, signature: &Signature) -> Bytes;
    fn decode_signature_info(&self, input: Bytes) -> Result<Signature>;
    fn encode_signature_value(&self, value: &[u8]) -> Bytes;

    fn encode_delegation_set(&self, set: &DelegationSet) -> Bytes;
    fn decode_delegation_set(&self, input: Bytes) -> Result<DelegationSet>;

    fn encode_lp_packet(&self, lp: &LpPacket, fragment: &[u8]) -> Bytes;
    fn decode_lp_packet(&self, input: Bytes) -> Result<(LpPacket, Bytes)>;
}
