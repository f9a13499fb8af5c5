// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The reference transport: a TCP connection to a forwarder, split into
//! owned read/write halves each behind their own lock, with a background
//! task feeding received bytes through an [`ElementReader`] into the
//! engine's element sink.

use std::{
    net::{IpAddr, SocketAddr},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    sync::Mutex,
};
use tracing::{debug, trace, warn};

use super::{element_reader::ElementReader, ElementSink, Transport};
use crate::error::{NdnError, Result};

/// Default NDN-over-TCP port.
pub const DEFAULT_PORT: u16 = 6363;

pub struct TcpTransport {
    host: String,
    port: u16,
    write_half: Mutex<Option<OwnedWriteHalf>>,
    connected: Arc<AtomicBool>,
    is_local: AtomicBool,
}

impl TcpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        TcpTransport {
            host: host.into(),
            port,
            write_half: Mutex::new(None),
            connected: Arc::new(AtomicBool::new(false)),
            is_local: AtomicBool::new(false),
        }
    }

    fn classify_local(addr: &SocketAddr) -> bool {
        match addr.ip() {
            IpAddr::V4(v4) => v4.is_loopback(),
            IpAddr::V6(v6) => v6.is_loopback(),
        }
    }

    async fn read_loop(
        mut read_half: OwnedReadHalf,
        sink: Arc<dyn ElementSink>,
        connected: Arc<AtomicBool>,
    ) {
        let mut reader = ElementReader::new();
        let mut buf = [0u8; 16 * 1024];
        loop {
            match read_half.read(&mut buf).await {
                Ok(0) => {
                    debug!("tcp transport: peer closed connection");
                    break;
                },
                Ok(n) => match reader.on_received_data(&buf[..n]) {
                    Ok(elements) => {
                        for element in elements {
                            trace!(len = element.len(), "tcp transport: element received");
                            sink.on_receive(element);
                        }
                    },
                    Err(err) => {
                        warn!(%err, "tcp transport: malformed element, dropping connection");
                        break;
                    },
                },
                Err(err) => {
                    warn!(%err, "tcp transport: read error");
                    break;
                },
            }
        }
        connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&self, sink: Arc<dyn ElementSink>) -> Result<()> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        stream.set_nodelay(true).ok();
        if let Ok(addr) = stream.peer_addr() {
            self.is_local.store(Self::classify_local(&addr), Ordering::SeqCst);
        }

        let (read_half, write_half) = stream.into_split();
        *self.write_half.lock().await = Some(write_half);
        self.connected.store(true, Ordering::SeqCst);

        tokio::spawn(Self::read_loop(read_half, sink, self.connected.clone()));
        Ok(())
    }

    async fn send(&self, data: &[u8]) -> Result<()> {
        let mut guard = self.write_half.lock().await;
        match guard.as_mut() {
            Some(write_half) => {
                write_half.write_all(data).await?;
                Ok(())
            },
            None => Err(NdnError::NotConnected),
        }
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.write_half.lock().await;
        if let Some(mut write_half) = guard.take() {
            write_half.shutdown().await.ok();
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn is_local(&self) -> bool {
        self.is_local.load(Ordering::SeqCst)
    }
}
