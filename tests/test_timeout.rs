// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod support;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use ndn_client_rs::{face::Face, name::Name, packet::Interest};
use support::HarnessTransport;

#[tokio::test]
async fn unanswered_interest_times_out() {
    let transport = HarnessTransport::new(true);
    let face = Face::with_tlv_wire_format(transport);

    let timed_out = Arc::new(AtomicBool::new(false));
    let timed_out_in_closure = timed_out.clone();

    let mut interest = Interest::new(Name::parse("/never/answered").unwrap());
    interest.set_interest_lifetime(Some(50));

    let id = face
        .express_interest(
            interest,
            None,
            Some(Box::new(move |_interest| {
                timed_out_in_closure.store(true, Ordering::SeqCst);
            })),
            None,
        )
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    assert!(timed_out.load(Ordering::SeqCst));
    assert!(!face.remove_pending_interest(id));
}
