// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod support;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use ndn_client_rs::{
    face::Face,
    name::Name,
    packet::{Data, Interest},
    wire::{TlvWireFormat, WireFormat},
};
use support::HarnessTransport;

#[tokio::test]
async fn data_satisfies_the_matching_pending_interest() {
    let transport = HarnessTransport::new(true);
    let face = Face::with_tlv_wire_format(transport.clone());

    let received = Arc::new(Mutex::new(None));
    let received_in_closure = received.clone();
    let timed_out = Arc::new(AtomicBool::new(false));
    let timed_out_in_closure = timed_out.clone();

    let mut interest = Interest::new(Name::parse("/a/b").unwrap());
    interest.set_interest_lifetime(Some(1000));

    let id = face
        .express_interest(
            interest,
            Some(Box::new(move |_interest, data: &Data| {
                *received_in_closure.lock().unwrap() = Some(data.clone());
            })),
            Some(Box::new(move |_interest| {
                timed_out_in_closure.store(true, Ordering::SeqCst);
            })),
            None,
        )
        .await
        .unwrap();

    let sent = transport.last_sent();
    assert_eq!(sent.as_ref()[0], 0x05, "a wire-encoded Interest starts with the Interest type code");

    let mut data = Data::new(Name::parse("/a/b/c").unwrap());
    data.set_content(vec![0xDE, 0xAD]);
    let wf = TlvWireFormat;
    let (encoded, _) = wf.encode_data(&data).unwrap();
    transport.deliver(encoded);

    let got = received.lock().unwrap().take().expect("on_data should have fired");
    assert_eq!(got.name(), &Name::parse("/a/b/c").unwrap());
    assert_eq!(got.content().as_bytes(), &[0xDE, 0xAD]);
    assert!(!timed_out.load(Ordering::SeqCst));

    // The PIT entry was consumed by the matching Data; nothing left to cancel.
    assert!(!face.remove_pending_interest(id));
}
