// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! An in-process transport for driving the engine end to end without a
//! real socket: `connect` just records the sink, `send` records the bytes
//! instead of writing them anywhere, and the test harness calls
//! `deliver` to feed bytes back in as if they'd arrived off the wire.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use ndn_client_rs::{error::Result, transport::ElementSink, transport::Transport};

pub struct HarnessTransport {
    sink: Mutex<Option<Arc<dyn ElementSink>>>,
    sent: Mutex<Vec<Bytes>>,
    local: bool,
}

impl HarnessTransport {
    pub fn new(local: bool) -> Arc<Self> {
        Arc::new(HarnessTransport {
            sink: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            local,
        })
    }

    /// Every element handed to `Transport::send` so far, oldest first.
    pub fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Bytes {
        self.sent.lock().unwrap().last().cloned().expect("nothing sent yet")
    }

    /// Feeds `element` to the engine as if it had just arrived off the
    /// wire. Panics if `connect` hasn't run yet — callers should drive at
    /// least one `express_interest`/`register_prefix` first.
    pub fn deliver(&self, element: Bytes) {
        let sink = self.sink.lock().unwrap().clone().expect("transport not connected yet");
        sink.on_receive(element);
    }
}

#[async_trait]
impl Transport for HarnessTransport {
    async fn connect(&self, sink: Arc<dyn ElementSink>) -> Result<()> {
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    async fn send(&self, data: &[u8]) -> Result<()> {
        self.sent.lock().unwrap().push(Bytes::copy_from_slice(data));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        *self.sink.lock().unwrap() = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    fn is_local(&self) -> bool {
        self.local
    }
}

/// A synchronous transport (`is_async() == false`): `connect` completes
/// immediately with no background task, and injected elements only reach
/// the sink once the caller drives [`Transport::process_events`] — the
/// single-threaded cooperative deployment mode.
pub struct SyncLoopbackTransport {
    sink: Mutex<Option<Arc<dyn ElementSink>>>,
    sent: Mutex<Vec<Bytes>>,
    queued: Mutex<Vec<Bytes>>,
}

impl SyncLoopbackTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(SyncLoopbackTransport {
            sink: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            queued: Mutex::new(Vec::new()),
        })
    }

    pub fn last_sent(&self) -> Bytes {
        self.sent.lock().unwrap().last().cloned().expect("nothing sent yet")
    }

    /// Queues `element` for delivery on the next `process_events` call,
    /// rather than delivering it straight away like `HarnessTransport`.
    pub fn queue_for_delivery(&self, element: Bytes) {
        self.queued.lock().unwrap().push(element);
    }
}

#[async_trait]
impl Transport for SyncLoopbackTransport {
    async fn connect(&self, sink: Arc<dyn ElementSink>) -> Result<()> {
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    async fn send(&self, data: &[u8]) -> Result<()> {
        self.sent.lock().unwrap().push(Bytes::copy_from_slice(data));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        *self.sink.lock().unwrap() = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    fn is_local(&self) -> bool {
        true
    }

    fn is_async(&self) -> bool {
        false
    }

    async fn process_events(&self) -> Result<()> {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            for element in self.queued.lock().unwrap().drain(..) {
                sink.on_receive(element);
            }
        }
        Ok(())
    }
}
