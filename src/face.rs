// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The application-facing surface. `Face` owns nothing the engine doesn't
//! already own — it exists so callers interact with one stable, ergonomic
//! type instead of wiring up a [`Node`], a [`Transport`], and a
//! [`WireFormat`] by hand for every application.

use std::sync::Arc;

use crate::{
    error::Result,
    name::Name,
    node::{
        callbacks::{OnData, OnInterest, OnNack, OnRegisterFailed, OnRegisterSuccess, OnTimeout},
        Node,
    },
    packet::{forwarding_flags::ForwardingFlags, Data, Interest},
    security::CommandInterestSigner,
    transport::Transport,
    wire::{TlvWireFormat, WireFormat},
};

/// A thin façade over [`Node`]: `expressInterest`/`registerPrefix` calls
/// arrive here, get forwarded to the engine, and the engine's dispatch
/// loop calls back into application-supplied closures. Cloning a `Face`
/// is cheap — it's a handle to the same underlying engine.
#[derive(Clone)]
pub struct Face {
    node: Arc<Node>,
}

impl Face {
    /// Builds a Face over `transport`, encoding and decoding with
    /// `wire_format`.
    pub fn new(transport: Arc<dyn Transport>, wire_format: Arc<dyn WireFormat + Send + Sync>) -> Face {
        Face {
            node: Node::new(transport, wire_format),
        }
    }

    /// Wraps an existing engine handle. Used by the engine's own dispatch
    /// loop to hand a matched `onInterest` callback a `Face` it can call
    /// `put_data` on, without exposing `Node` itself outside the crate.
    pub(crate) fn from_node(node: Arc<Node>) -> Face {
        Face { node }
    }

    /// Convenience constructor for the common case: NDN-TLV encoding over
    /// a concrete transport, no configuration beyond that.
    pub fn with_tlv_wire_format(transport: Arc<dyn Transport>) -> Face {
        Face::new(transport, Arc::new(TlvWireFormat))
    }

    /// Installs the signer used to authenticate forwarder-management
    /// command Interests issued by [`Face::register_prefix`]. Must be set
    /// before the first `register_prefix` call; registration fails
    /// otherwise.
    pub fn set_command_signer(&self, signer: Arc<CommandInterestSigner>) {
        self.node.set_command_signer(signer);
    }

    /// Expresses `interest`, returning the pending-interest id that
    /// [`Face::remove_pending_interest`] later cancels by.
    pub async fn express_interest(
        &self,
        interest: Interest,
        on_data: Option<OnData>,
        on_timeout: Option<OnTimeout>,
        on_nack: Option<OnNack>,
    ) -> Result<u64> {
        self.node.express_interest(interest, on_data, on_timeout, on_nack).await
    }

    /// Cancels a pending Interest expressed earlier; `false` if `id` is
    /// unknown (already satisfied, timed out, or already removed).
    pub fn remove_pending_interest(&self, id: u64) -> bool {
        self.node.remove_pending_interest(id)
    }

    /// Registers a callback for incoming Interests under `prefix` without
    /// contacting the forwarder's management plane. Use
    /// [`Face::register_prefix`] to also advertise the prefix to the
    /// forwarder's RIB.
    pub fn set_interest_filter(&self, prefix: Name, on_interest: OnInterest) -> u64 {
        self.node.set_interest_filter(prefix, on_interest)
    }

    pub fn unset_interest_filter(&self, id: u64) -> bool {
        self.node.unset_interest_filter(id)
    }

    /// Advertises `prefix` to the connected forwarder and, if `on_interest`
    /// is given, installs it as the filter callback once the forwarder
    /// acknowledges the registration.
    pub async fn register_prefix(
        &self,
        prefix: Name,
        on_interest: Option<OnInterest>,
        on_failed: OnRegisterFailed,
        on_success: Option<OnRegisterSuccess>,
        flags: ForwardingFlags,
    ) -> Result<u64> {
        self.node
            .register_prefix(prefix, on_interest, on_failed, on_success, flags)
            .await
    }

    pub fn remove_registered_prefix(&self, id: u64) -> bool {
        self.node.remove_registered_prefix(id)
    }

    /// Sends `data` to the connected forwarder, e.g. in response to an
    /// Interest delivered to a filter installed via
    /// [`Face::set_interest_filter`]. Enqueue-and-return.
    pub async fn put_data(&self, data: &Data) -> Result<()> {
        self.node.put_data(data).await
    }

    /// Pumps a synchronous transport's I/O loop one step; a no-op when the
    /// underlying transport is async (the common case).
    pub async fn process_events(&self) -> Result<()> {
        self.node.process_events().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::transport::ElementSink;

    /// A transport that never actually talks to anything, so `Face`'s
    /// plumbing can be exercised without a real forwarder.
    struct NullTransport {
        sink: Mutex<Option<Arc<dyn ElementSink>>>,
        sent: Mutex<Vec<Vec<u8>>>,
    }

    impl NullTransport {
        fn new() -> Self {
            NullTransport {
                sink: Mutex::new(None),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for NullTransport {
        async fn connect(&self, sink: Arc<dyn ElementSink>) -> Result<()> {
            *self.sink.lock().unwrap() = Some(sink);
            Ok(())
        }

        async fn send(&self, data: &[u8]) -> Result<()> {
            self.sent.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }

        fn is_connected(&self) -> bool {
            true
        }

        fn is_local(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn express_interest_reaches_the_transport() {
        let transport = Arc::new(NullTransport::new());
        let face = Face::with_tlv_wire_format(transport.clone());

        let interest = Interest::new(Name::parse("/a/b").unwrap());
        let id = face.express_interest(interest, None, None, None).await.unwrap();
        assert!(id > 0);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_an_unknown_pending_interest_is_false() {
        let transport = Arc::new(NullTransport::new());
        let face = Face::with_tlv_wire_format(transport);
        assert!(!face.remove_pending_interest(99));
    }

    #[tokio::test]
    async fn interest_filter_fires_on_matching_element() {
        let transport = Arc::new(NullTransport::new());
        let face = Face::with_tlv_wire_format(transport.clone());

        let fired = Arc::new(AtomicBool::new(false));
        let fired_in_closure = fired.clone();
        face.set_interest_filter(
            Name::parse("/a").unwrap(),
            Arc::new(move |_prefix, _interest, _face, _id, _filter| {
                fired_in_closure.store(true, Ordering::SeqCst);
            }),
        );

        // Drive a connect so the engine has an ElementSink to deliver to.
        let interest = Interest::new(Name::parse("/local/timeout").unwrap());
        face.express_interest(interest, None, None, None).await.unwrap();

        let sink = transport.sink.lock().unwrap().clone().unwrap();
        let wf = TlvWireFormat;
        let probe = Interest::new(Name::parse("/a/b").unwrap());
        let (encoded, _) = wf.encode_interest(&probe).unwrap();
        sink.on_receive(Bytes::from(encoded.to_vec()));

        assert!(fired.load(Ordering::SeqCst));
    }
}
