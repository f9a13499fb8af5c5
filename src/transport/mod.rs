// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The byte-stream transport contract. The transport owns the socket; the
//! engine owns the element sink it feeds framed packets into. A concrete
//! TCP implementation lives in [`tcp`]; tests exercise the engine against
//! an in-process duplex-pipe implementation instead.

pub mod element_reader;
pub mod tcp;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Receives whole decoded elements as the transport's background read task
/// produces them. Implemented by the Node; kept as a trait so the
/// transport layer doesn't depend on the engine.
pub trait ElementSink: Send + Sync {
    fn on_receive(&self, element: Bytes);
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Establishes the connection and starts delivering received elements
    /// to `sink` on a background task. Always async — a single-threaded
    /// synchronous deployment is realized by driving the same engine on a
    /// current-thread `tokio` runtime rather than by a second, blocking
    /// transport implementation.
    async fn connect(&self, sink: std::sync::Arc<dyn ElementSink>) -> Result<()>;

    async fn send(&self, data: &[u8]) -> Result<()>;

    async fn close(&self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Whether `connectionInfo` resolves to a loopback address, used to
    /// pick the local vs. remote prefix-registration command namespace.
    fn is_local(&self) -> bool;

    /// True iff `connect` returns as soon as it has spawned a background
    /// task that delivers received elements to the sink on its own —
    /// [`tcp::TcpTransport`] always does. A synchronous transport instead
    /// blocks inside `connect` until the handshake completes and expects
    /// the caller to drive its read loop one step at a time via
    /// [`Transport::process_events`].
    fn is_async(&self) -> bool {
        true
    }

    /// Pumps one iteration of a synchronous transport's I/O loop: read
    /// whatever is available without blocking, hand complete elements to
    /// the sink, and return. A no-op for an async transport, which
    /// delivers elements from its own background task instead.
    async fn process_events(&self) -> Result<()> {
        Ok(())
    }
}
