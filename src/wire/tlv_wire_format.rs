// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The only wire format this runtime speaks: NDN-TLV ("packet format 0.3").
//!
//! Every encode method below writes its TLV fields through
//! [`TlvEncoder`] in the *reverse* of their wire order — the encoder
//! prepends, so the last call placed ends up first on the wire. Each
//! function's comments spell out the forward order it's reconstructing.

use bytes::Bytes;

use super::{tlv_type as t, SignedRange, WireFormat};
use crate::{
    encoding::{TlvDecoder, TlvEncoder},
    error::{NdnError, Result},
    lp,
    name::{Name, NameComponent},
    packet::{
        control_parameters::ControlParameters,
        control_response::ControlResponse,
        data::Data,
        delegation_set::DelegationSet,
        forwarding_flags::ForwardingFlags,
        interest::Interest,
        meta_info::{ContentType, MetaInfo},
        selectors::Selectors,
        signature::{KeyLocator, Signature, SignatureType},
    },
};

/// The NDN-TLV wire format. Stateless — a unit struct rather than a global
/// singleton, so callers thread it explicitly through encode/decode calls
/// instead of relying on process-wide mutable default-format state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvWireFormat;

fn encode_name_into(enc: &mut TlvEncoder, name: &Name) {
    let start = enc.start_nested_tlv();
    for c in name.components().iter().rev() {
        enc.write_blob_tlv(c.type_code(), c.value().as_bytes());
    }
    enc.finish_nested_tlv(start, t::NAME);
}

fn decode_name_from(dec: &mut TlvDecoder) -> Result<Name> {
    let end = dec.read_nested_tlvs_start(t::NAME).map_err(NdnError::from)?;
    let mut components = Vec::new();
    while dec.position() < end {
        let (type_code, length) = dec.read_type_and_length().map_err(NdnError::from)?;
        let value = dec.read_value(length).map_err(NdnError::from)?;
        components.push(NameComponent::new(type_code, value.bytes()));
    }
    Ok(Name::from_components(components))
}

fn encode_key_locator_into(enc: &mut TlvEncoder, locator: &KeyLocator) {
    match locator {
        KeyLocator::None => {},
        KeyLocator::KeyDigest(digest) => {
            let start = enc.start_nested_tlv();
            enc.write_blob_tlv(t::KEY_LOCATOR_DIGEST, digest.as_bytes());
            enc.finish_nested_tlv(start, t::KEY_LOCATOR);
        },
        KeyLocator::Name(name) => {
            let start = enc.start_nested_tlv();
            encode_name_into(enc, name);
            enc.finish_nested_tlv(start, t::KEY_LOCATOR);
        },
    }
}

fn decode_key_locator_from(dec: &mut TlvDecoder) -> Result<KeyLocator> {
    let end = dec
        .read_nested_tlvs_start(t::KEY_LOCATOR)
        .map_err(NdnError::from)?;
    if dec.position() >= end {
        return Ok(KeyLocator::None);
    }
    let locator = if dec.peek_type().map_err(NdnError::from)? == t::NAME {
        KeyLocator::Name(decode_name_from(dec)?)
    } else {
        KeyLocator::KeyDigest(dec.read_blob_tlv(t::KEY_LOCATOR_DIGEST)?)
    };
    dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
    Ok(locator)
}

fn encode_signature_info_into(enc: &mut TlvEncoder, sig: &Signature) {
    let start = enc.start_nested_tlv();
    encode_key_locator_into(enc, &sig.key_locator);
    enc.write_non_negative_integer_tlv(t::SIGNATURE_TYPE, sig.signature_type.to_code());
    enc.finish_nested_tlv(start, t::SIGNATURE_INFO);
}

fn decode_signature_info_from(dec: &mut TlvDecoder) -> Result<Signature> {
    let end = dec
        .read_nested_tlvs_start(t::SIGNATURE_INFO)
        .map_err(NdnError::from)?;
    let signature_type = SignatureType::from_code(dec.read_non_negative_integer_tlv(t::SIGNATURE_TYPE)?);
    let key_locator = if dec.position() < end {
        decode_key_locator_from(dec)?
    } else {
        KeyLocator::None
    };
    dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
    Ok(Signature {
        signature_type,
        key_locator,
        value: crate::blob::Blob::empty(),
    })
}

fn encode_meta_info_into(enc: &mut TlvEncoder, meta: &MetaInfo) {
    let start = enc.start_nested_tlv();
    if let Some(final_block_id) = &meta.final_block_id {
        let fbid_start = enc.start_nested_tlv();
        enc.write_blob_tlv(final_block_id.type_code(), final_block_id.value().as_bytes());
        enc.finish_nested_tlv(fbid_start, t::FINAL_BLOCK_ID);
    }
    enc.write_optional_non_negative_integer_tlv(t::FRESHNESS_PERIOD, meta.freshness_period);
    if meta.content_type.to_code() != 0 {
        enc.write_non_negative_integer_tlv(t::CONTENT_TYPE, meta.content_type.to_code());
    }
    enc.finish_nested_tlv(start, t::META_INFO);
}

fn decode_meta_info_from(dec: &mut TlvDecoder) -> Result<MetaInfo> {
    let end = dec
        .read_nested_tlvs_start(t::META_INFO)
        .map_err(NdnError::from)?;
    let mut meta = MetaInfo::new();
    if !dec.is_empty() && dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::CONTENT_TYPE {
        meta.content_type = ContentType::from_code(dec.read_non_negative_integer_tlv(t::CONTENT_TYPE)?);
    }
    meta.freshness_period = dec.read_optional_non_negative_integer_tlv(t::FRESHNESS_PERIOD)?;
    if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::FINAL_BLOCK_ID {
        let fbid_end = dec
            .read_nested_tlvs_start(t::FINAL_BLOCK_ID)
            .map_err(NdnError::from)?;
        let (type_code, length) = dec.read_type_and_length().map_err(NdnError::from)?;
        let value = dec.read_value(length).map_err(NdnError::from)?;
        dec.finish_nested_tlvs(fbid_end, true).map_err(NdnError::from)?;
        meta.final_block_id = Some(NameComponent::new(type_code, value.bytes()));
    }
    dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
    Ok(meta)
}

fn encode_selectors_into(enc: &mut TlvEncoder, selectors: &Selectors) {
    let start = enc.start_nested_tlv();
    if selectors.must_be_fresh {
        enc.write_blob_tlv(t::MUST_BE_FRESH, &[]);
    }
    enc.write_optional_non_negative_integer_tlv(t::CHILD_SELECTOR, selectors.child_selector);
    if let Some(locator) = &selectors.publisher_public_key_locator {
        encode_key_locator_into(enc, locator);
    }
    enc.write_optional_non_negative_integer_tlv(
        t::MAX_SUFFIX_COMPONENTS,
        selectors.max_suffix_components,
    );
    enc.write_optional_non_negative_integer_tlv(
        t::MIN_SUFFIX_COMPONENTS,
        selectors.min_suffix_components,
    );
    enc.finish_nested_tlv(start, t::SELECTORS);
}

fn decode_selectors_from(dec: &mut TlvDecoder) -> Result<Selectors> {
    let end = dec
        .read_nested_tlvs_start(t::SELECTORS)
        .map_err(NdnError::from)?;
    let mut selectors = Selectors::new();
    selectors.min_suffix_components =
        dec.read_optional_non_negative_integer_tlv(t::MIN_SUFFIX_COMPONENTS)?;
    selectors.max_suffix_components =
        dec.read_optional_non_negative_integer_tlv(t::MAX_SUFFIX_COMPONENTS)?;
    if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::PUBLISHER_PUBLIC_KEY_LOCATOR {
        selectors.publisher_public_key_locator = Some(decode_key_locator_from(dec)?);
    }
    // Exclude is not modeled in decode (advisory-only at this layer); skip
    // it if present so trailing fields still parse.
    if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::EXCLUDE {
        let (_, length) = dec.read_type_and_length().map_err(NdnError::from)?;
        dec.seek(dec.position() + length as usize);
    }
    selectors.child_selector = dec.read_optional_non_negative_integer_tlv(t::CHILD_SELECTOR)?;
    if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::MUST_BE_FRESH {
        dec.read_blob_tlv(t::MUST_BE_FRESH)?;
        selectors.must_be_fresh = true;
    }
    dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
    Ok(selectors)
}

impl WireFormat for TlvWireFormat {
    fn encode_name(&self, name: &Name) -> Bytes {
        let mut enc = TlvEncoder::new();
        encode_name_into(&mut enc, name);
        enc.output()
    }

    fn decode_name(&self, input: Bytes) -> Result<Name> {
        let mut dec = TlvDecoder::new(input);
        decode_name_from(&mut dec)
    }

    /// Forward order: `Name, Selectors?, Nonce, InterestLifetime?, Scope?`.
    /// Written here in reverse: Scope, InterestLifetime, Nonce, Selectors,
    /// Name. The signed range covers Name..=Nonce.
    fn encode_interest(&self, interest: &Interest) -> Result<(Bytes, SignedRange)> {
        let mut enc = TlvEncoder::new();
        let body_start = enc.start_nested_tlv();

        enc.write_optional_non_negative_integer_tlv(t::SCOPE, interest.scope());
        enc.write_optional_non_negative_integer_tlv(t::INTEREST_LIFETIME, interest.interest_lifetime());

        // Boundary between Nonce and whatever follows it (InterestLifetime
        // or Scope, or the end of the body) — this is `signed_end` once we
        // know the packet's final total length.
        let nonce_end_mark = enc.start_nested_tlv();

        let mut nonce = interest.nonce();
        if nonce == [0; 4] {
            let mut fresh = Interest::new(interest.name().clone());
            fresh.refresh_nonce();
            nonce = fresh.nonce();
        }
        enc.write_blob_tlv(t::NONCE, &nonce);

        if !interest.selectors().is_empty() {
            encode_selectors_into(&mut enc, interest.selectors());
        }

        encode_name_into(&mut enc, interest.name());
        // After writing Name (the last call), the amount written so far is
        // exactly the body length — Name starts at body offset 0.
        let name_start_mark = enc.start_nested_tlv();

        enc.finish_nested_tlv(body_start, t::INTEREST);
        let bytes = enc.output();
        let total = bytes.len();

        let signed_begin = total - name_start_mark;
        let signed_end = total - nonce_end_mark;
        Ok((bytes, (signed_begin, signed_end)))
    }

    fn decode_interest(&self, input: Bytes) -> Result<(Interest, SignedRange)> {
        let mut dec = TlvDecoder::new(input);
        let end = dec.read_nested_tlvs_start(t::INTEREST).map_err(NdnError::from)?;
        let signed_begin = dec.position();

        let name = decode_name_from(&mut dec)?;
        let mut interest = Interest::new(name);

        if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::SELECTORS {
            interest.set_selectors(decode_selectors_from(&mut dec)?);
        }

        let nonce_blob = dec.read_blob_tlv(t::NONCE)?;
        let mut nonce = [0u8; 4];
        let n = nonce_blob.len().min(4);
        nonce[..n].copy_from_slice(&nonce_blob.as_bytes()[..n]);
        interest.set_nonce(nonce);
        let signed_end = dec.position();

        interest.set_interest_lifetime(dec.read_optional_non_negative_integer_tlv(t::INTEREST_LIFETIME)?);
        interest.set_scope(dec.read_optional_non_negative_integer_tlv(t::SCOPE)?);

        dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
        Ok((interest, (signed_begin, signed_end)))
    }

    /// Forward order: `Name, MetaInfo, Content, SignatureInfo,
    /// SignatureValue`. Written in reverse: SignatureValue, SignatureInfo,
    /// Content, MetaInfo, Name. Signed range covers Name..=SignatureInfo.
    fn encode_data(&self, data: &Data) -> Result<(Bytes, SignedRange)> {
        let mut enc = TlvEncoder::new();
        let body_start = enc.start_nested_tlv();

        enc.write_blob_tlv(t::SIGNATURE_VALUE, data.signature().value.as_bytes());
        // Boundary between SignatureInfo and SignatureValue — this becomes
        // `signed_end`.
        let sig_value_start_mark = enc.start_nested_tlv();

        encode_signature_info_into(&mut enc, data.signature());
        enc.write_blob_tlv(t::CONTENT, data.content().as_bytes());
        encode_meta_info_into(&mut enc, data.meta_info());
        encode_name_into(&mut enc, data.name());
        let name_start_mark = enc.start_nested_tlv();

        enc.finish_nested_tlv(body_start, t::DATA);
        let bytes = enc.output();
        let total = bytes.len();

        let signed_begin = total - name_start_mark;
        let signed_end = total - sig_value_start_mark;
        Ok((bytes, (signed_begin, signed_end)))
    }

    fn decode_data(&self, input: Bytes) -> Result<(Data, SignedRange)> {
        let mut dec = TlvDecoder::new(input);
        let end = dec.read_nested_tlvs_start(t::DATA).map_err(NdnError::from)?;
        let signed_begin = dec.position();

        let name = decode_name_from(&mut dec)?;
        let mut data = Data::new(name);
        data.set_meta_info(decode_meta_info_from(&mut dec)?);
        data.set_content(dec.read_blob_tlv(t::CONTENT)?.bytes());

        let mut signature = decode_signature_info_from(&mut dec)?;
        let signed_end = dec.position();
        signature.value = dec.read_blob_tlv(t::SIGNATURE_VALUE)?;
        data.set_signature(signature);

        dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
        Ok((data, (signed_begin, signed_end)))
    }

    fn encode_control_parameters(&self, params: &ControlParameters) -> Bytes {
        let mut enc = TlvEncoder::new();
        let start = enc.start_nested_tlv();

        enc.write_optional_non_negative_integer_tlv(t::EXPIRATION_PERIOD, params.expiration_period);
        if let Some(strategy) = &params.strategy {
            let s_start = enc.start_nested_tlv();
            encode_name_into(&mut enc, strategy);
            enc.finish_nested_tlv(s_start, t::STRATEGY);
        }
        if let Some(flags) = params.flags {
            enc.write_non_negative_integer_tlv(t::FORWARDING_FLAGS, flags.bits() as u64);
        }
        enc.write_optional_non_negative_integer_tlv(t::COST, params.cost);
        enc.write_optional_non_negative_integer_tlv(t::ORIGIN, params.origin);
        enc.write_optional_non_negative_integer_tlv(t::LOCAL_CONTROL_FEATURE, params.local_control_feature);
        if let Some(uri) = &params.uri {
            enc.write_blob_tlv(t::URI, uri.as_bytes());
        }
        enc.write_optional_non_negative_integer_tlv(t::FACE_ID, params.face_id);
        if let Some(name) = &params.name {
            encode_name_into(&mut enc, name);
        }

        enc.finish_nested_tlv(start, t::CONTROL_PARAMETERS);
        enc.output()
    }

    fn decode_control_parameters(&self, input: Bytes) -> Result<ControlParameters> {
        let mut dec = TlvDecoder::new(input);
        let end = dec
            .read_nested_tlvs_start(t::CONTROL_PARAMETERS)
            .map_err(NdnError::from)?;
        let mut params = ControlParameters::new();

        if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::NAME {
            params.name = Some(decode_name_from(&mut dec)?);
        }
        params.face_id = dec.read_optional_non_negative_integer_tlv(t::FACE_ID)?;
        if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::URI {
            let uri_blob = dec.read_blob_tlv(t::URI)?;
            params.uri = Some(String::from_utf8_lossy(uri_blob.as_bytes()).into_owned());
        }
        params.local_control_feature =
            dec.read_optional_non_negative_integer_tlv(t::LOCAL_CONTROL_FEATURE)?;
        params.origin = dec.read_optional_non_negative_integer_tlv(t::ORIGIN)?;
        params.cost = dec.read_optional_non_negative_integer_tlv(t::COST)?;
        if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::FORWARDING_FLAGS {
            let bits = dec.read_non_negative_integer_tlv(t::FORWARDING_FLAGS)?;
            params.flags = Some(ForwardingFlags::from_bits_truncate(bits as u32));
        }
        if dec.position() < end && dec.peek_type().map_err(NdnError::from)? == t::STRATEGY {
            let s_end = dec.read_nested_tlvs_start(t::STRATEGY).map_err(NdnError::from)?;
            params.strategy = Some(decode_name_from(&mut dec)?);
            dec.finish_nested_tlvs(s_end, true).map_err(NdnError::from)?;
        }
        params.expiration_period = dec.read_optional_non_negative_integer_tlv(t::EXPIRATION_PERIOD)?;

        dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
        Ok(params)
    }

    fn encode_control_response(&self, response: &ControlResponse) -> Bytes {
        let mut enc = TlvEncoder::new();
        let start = enc.start_nested_tlv();
        if let Some(body) = &response.body {
            enc.write_blob_tlv(t::CONTROL_PARAMETERS, body.as_bytes());
        }
        enc.write_blob_tlv(t::CONTROL_RESPONSE_STATUS_TEXT, response.status_text.as_bytes());
        enc.write_non_negative_integer_tlv(t::CONTROL_RESPONSE_STATUS_CODE, response.status_code as u64);
        enc.finish_nested_tlv(start, t::CONTROL_RESPONSE);
        enc.output()
    }

    fn decode_control_response(&self, input: Bytes) -> Result<ControlResponse> {
        let mut dec = TlvDecoder::new(input);
        let end = dec
            .read_nested_tlvs_start(t::CONTROL_RESPONSE)
            .map_err(NdnError::from)?;
        let status_code = dec.read_non_negative_integer_tlv(t::CONTROL_RESPONSE_STATUS_CODE)? as u32;
        let status_text_blob = dec.read_blob_tlv(t::CONTROL_RESPONSE_STATUS_TEXT)?;
        let status_text = String::from_utf8_lossy(status_text_blob.as_bytes()).into_owned();
        let body = if dec.position() < end {
            Some(dec.read_blob_tlv(t::CONTROL_PARAMETERS)?)
        } else {
            None
        };
        dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
        Ok(ControlResponse {
            status_code,
            status_text,
            body,
        })
    }

    fn encode_signature_info(&self, signature: &Signature) -> Bytes {
        let mut enc = TlvEncoder::new();
        encode_signature_info_into(&mut enc, signature);
        enc.output()
    }

    fn decode_signature_info(&self, input: Bytes) -> Result<Signature> {
        let mut dec = TlvDecoder::new(input);
        decode_signature_info_from(&mut dec)
    }

    fn encode_signature_value(&self, value: &[u8]) -> Bytes {
        let mut enc = TlvEncoder::new();
        enc.write_blob_tlv(t::SIGNATURE_VALUE, value);
        enc.output()
    }

    fn encode_delegation_set(&self, set: &DelegationSet) -> Bytes {
        let mut enc = TlvEncoder::new();
        for entry in set.entries().iter().rev() {
            let start = enc.start_nested_tlv();
            encode_name_into(&mut enc, &entry.name);
            enc.write_non_negative_integer_tlv(t::PREFERENCE, entry.preference as u64);
            enc.finish_nested_tlv(start, t::DELEGATION);
        }
        enc.output()
    }

    fn decode_delegation_set(&self, input: Bytes) -> Result<DelegationSet> {
        let mut dec = TlvDecoder::new(input);
        let mut set = DelegationSet::new();
        while !dec.is_empty() {
            let end = dec.read_nested_tlvs_start(t::DELEGATION).map_err(NdnError::from)?;
            let preference = dec.read_non_negative_integer_tlv(t::PREFERENCE)? as i32;
            let name = decode_name_from(&mut dec)?;
            dec.finish_nested_tlvs(end, true).map_err(NdnError::from)?;
            set.add_unsorted(preference, name);
        }
        Ok(set)
    }

    fn encode_lp_packet(&self, lp: &lp::LpPacket, fragment: &[u8]) -> Bytes {
        lp::encode_lp_packet(lp, fragment)
    }

    fn decode_lp_packet(&self, input: Bytes) -> Result<(lp::LpPacket, Bytes)> {
        lp::decode_lp_packet(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::conventions;

    #[test]
    fn name_round_trips_through_tlv() {
        let wf = TlvWireFormat;
        let mut name = Name::new();
        name.append(NameComponent::generic(b"a".to_vec()));
        name.append(conventions::segment(7));
        let wire = wf.encode_name(&name);
        let decoded = wf.decode_name(wire).expect("decode");
        assert_eq!(decoded, name);
    }

    #[test]
    fn interest_round_trips_and_reports_signed_range_over_name_and_nonce() {
        let wf = TlvWireFormat;
        let mut interest = Interest::new(Name::parse("/a/b").unwrap());
        interest.set_nonce([1, 2, 3, 4]);
        interest.set_interest_lifetime(Some(4000));

        let (wire, (begin, end)) = wf.encode_interest(&interest).expect("encode");
        assert_eq!(wire[0], 5); // INTEREST type code

        let (decoded, (d_begin, d_end)) = wf.decode_interest(wire).expect("decode");
        assert_eq!(decoded.name().to_uri(), "/a/b");
        assert_eq!(decoded.nonce(), [1, 2, 3, 4]);
        assert_eq!(decoded.interest_lifetime(), Some(4000));
        assert_eq!((begin, end), (d_begin, d_end));
    }

    #[test]
    fn data_round_trips_and_signed_range_excludes_signature_value() {
        let wf = TlvWireFormat;
        let mut data = Data::new(Name::parse("/a/b/c").unwrap());
        data.set_content(b"\xDE\xAD".to_vec());

        let (wire, (begin, end)) = wf.encode_data(&data).expect("encode");
        let signed_bytes = wire[begin..end].to_vec();

        let (decoded, (d_begin, d_end)) = wf.decode_data(wire.clone()).expect("decode");
        assert_eq!(decoded.name().to_uri(), "/a/b/c");
        assert_eq!(decoded.content().as_bytes(), &[0xDE, 0xAD]);
        assert_eq!((begin, end), (d_begin, d_end));
        assert_eq!(&wire[d_begin..d_end], signed_bytes.as_slice());
    }

    #[test]
    fn control_parameters_round_trip() {
        let wf = TlvWireFormat;
        let params = ControlParameters::new()
            .with_name(Name::parse("/app").unwrap())
            .with_flags(ForwardingFlags::defaults());
        let wire = wf.encode_control_parameters(&params);
        let decoded = wf.decode_control_parameters(wire).expect("decode");
        assert_eq!(decoded.name.unwrap().to_uri(), "/app");
        assert_eq!(decoded.flags, Some(ForwardingFlags::defaults()));
    }

    #[test]
    fn control_response_round_trip() {
        let wf = TlvWireFormat;
        let response = ControlResponse {
            status_code: 200,
            status_text: "OK".to_string(),
            body: None,
        };
        let wire = wf.encode_control_response(&response);
        let decoded = wf.decode_control_response(wire).expect("decode");
        assert_eq!(decoded, response);
    }
}
