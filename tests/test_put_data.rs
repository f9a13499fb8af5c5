// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod support;

use ndn_client_rs::{
    face::Face,
    name::Name,
    packet::{Data, Interest},
    wire::{TlvWireFormat, WireFormat},
};
use support::HarnessTransport;

#[tokio::test]
async fn put_data_sends_the_wire_encoded_packet() {
    let transport = HarnessTransport::new(true);
    let face = Face::with_tlv_wire_format(transport.clone());

    // Drive a connect without actually putting anything on the wire yet:
    // the reserved `/local/timeout` prefix is never sent.
    face.express_interest(Interest::new(Name::parse("/local/timeout").unwrap()), None, None, None)
        .await
        .unwrap();

    let mut data = Data::new(Name::parse("/a/b/c").unwrap());
    data.set_content(vec![0xDE, 0xAD]);
    face.put_data(&data).await.unwrap();

    let wf = TlvWireFormat;
    let (decoded, _) = wf.decode_data(transport.last_sent()).unwrap();
    assert_eq!(decoded.name(), data.name());
    assert_eq!(decoded.content().as_bytes(), &[0xDE, 0xAD]);
}
