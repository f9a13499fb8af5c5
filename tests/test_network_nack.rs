// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod support;

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use ndn_client_rs::{
    face::Face,
    lp::LpPacket,
    name::Name,
    packet::{Interest, NackReason, NetworkNack},
    wire::{TlvWireFormat, WireFormat},
};
use support::HarnessTransport;

#[tokio::test]
async fn nack_fires_exactly_once_and_suppresses_timeout() {
    let transport = HarnessTransport::new(true);
    let face = Face::with_tlv_wire_format(transport.clone());

    let nack_count = Arc::new(AtomicU64::new(0));
    let nack_count_in_closure = nack_count.clone();
    let last_reason = Arc::new(std::sync::Mutex::new(None));
    let last_reason_in_closure = last_reason.clone();
    let timed_out = Arc::new(AtomicBool::new(false));
    let timed_out_in_closure = timed_out.clone();

    let mut interest = Interest::new(Name::parse("/x").unwrap());
    interest.set_interest_lifetime(Some(1000));

    face.express_interest(
        interest,
        None,
        Some(Box::new(move |_interest| {
            timed_out_in_closure.store(true, Ordering::SeqCst);
        })),
        Some(Box::new(move |_interest, nack: &NetworkNack| {
            nack_count_in_closure.fetch_add(1, Ordering::SeqCst);
            *last_reason_in_closure.lock().unwrap() = Some(nack.reason);
        })),
    )
    .await
    .unwrap();

    // The forwarder echoes the Interest it rejected — same name and nonce
    // as what we sent, which the harness recovers by decoding the wire
    // bytes our own express_interest call produced.
    let wf = TlvWireFormat;
    let (sent_interest, _) = wf.decode_interest(transport.last_sent()).unwrap();

    let lp = LpPacket {
        incoming_face_id: None,
        nack: Some(NetworkNack::new(NackReason::NoRoute)),
    };
    let (fragment, _) = wf.encode_interest(&sent_interest).unwrap();
    let wire = ndn_client_rs::lp::encode_lp_packet(&lp, &fragment);
    transport.deliver(wire);

    assert_eq!(nack_count.load(Ordering::SeqCst), 1);
    assert_eq!(last_reason.lock().unwrap().unwrap(), NackReason::NoRoute);
    assert!(!timed_out.load(Ordering::SeqCst));
}
