// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod support;

use std::sync::{Arc, Mutex};

use ndn_client_rs::{
    face::Face,
    name::Name,
    packet::{Data, Interest},
    wire::{TlvWireFormat, WireFormat},
};
use support::HarnessTransport;
use tokio::sync::oneshot;

/// Exercises the `face` argument a dispatched `onInterest` handler
/// receives: the handler answers through it with `put_data` rather than
/// reaching back into any engine internals.
#[tokio::test]
async fn on_interest_handler_answers_through_the_supplied_face() {
    let transport = HarnessTransport::new(true);
    let face = Face::with_tlv_wire_format(transport.clone());

    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));

    face.set_interest_filter(
        Name::parse("/a").unwrap(),
        Arc::new(move |_prefix, interest: &Interest, handler_face: &Face, _filter_id, _filter| {
            let handler_face = handler_face.clone();
            let name = interest.name().clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut data = Data::new(name);
                data.set_content(vec![0xDE, 0xAD]);
                handler_face.put_data(&data).await.unwrap();
                if let Some(tx) = tx.lock().unwrap().take() {
                    let _ = tx.send(());
                }
            });
        }),
    );

    // Drive a connect so the engine has an ElementSink to deliver to.
    face.express_interest(Interest::new(Name::parse("/local/timeout").unwrap()), None, None, None)
        .await
        .unwrap();

    let wf = TlvWireFormat;
    let inbound = Interest::new(Name::parse("/a/b").unwrap());
    let (encoded, _) = wf.encode_interest(&inbound).unwrap();
    transport.deliver(encoded);

    rx.await.unwrap();

    let (decoded, _) = wf.decode_data(transport.last_sent()).unwrap();
    assert_eq!(decoded.name(), &Name::parse("/a/b").unwrap());
    assert_eq!(decoded.content().as_bytes(), &[0xDE, 0xAD]);
}
