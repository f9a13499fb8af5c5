// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The protocol engine: owns the transport, the coordination tables, and
//! the connection lifecycle, and ties them together into `expressInterest`,
//! `registerPrefix`, and incoming-element dispatch.

pub mod callbacks;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Weak,
    },
    time::Duration,
};

use bytes::Bytes;
use callbacks::{OnData, OnInterest, OnNack, OnRegisterFailed, OnRegisterSuccess, OnTimeout};
use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, trace, warn};

use crate::{
    encoding::TlvDecoder,
    error::{NdnError, Result},
    lp,
    name::Name,
    packet::{
        control_parameters::ControlParameters, forwarding_flags::ForwardingFlags,
        interest_filter::InterestFilter, network_nack::NetworkNack, Data, Interest,
    },
    security::CommandInterestSigner,
    tables::{
        delayed_call_table::call_later, InterestFilterTable, PendingInterestEntry,
        PendingInterestTable, RegisteredPrefixEntry, RegisteredPrefixTable,
    },
    transport::{ElementSink, Transport},
    wire::{tlv_type as t, WireFormat},
};

/// Hard ceiling on a wire-encoded Interest or Data, enforced on send.
pub const MAX_NDN_PACKET_SIZE: usize = 8800;

const DEFAULT_INTEREST_TIMEOUT_MS: u64 = 4000;
const LOCAL_REGISTER_LIFETIME_MS: u64 = 2000;
const REMOTE_REGISTER_LIFETIME_MS: u64 = 4000;

static LOCALHOST_RIB_REGISTER: Lazy<Name> =
    Lazy::new(|| Name::parse("/localhost/nfd/rib/register").expect("valid constant name"));
static LOCALHOP_RIB_REGISTER: Lazy<Name> =
    Lazy::new(|| Name::parse("/localhop/nfd/rib/register").expect("valid constant name"));
/// A purely local timer escape valve: Interests under this prefix are never
/// sent to the transport, only used to drive `callLater`-style local waits.
static RESERVED_LOCAL_TIMEOUT: Lazy<Name> =
    Lazy::new(|| Name::parse("/local/timeout").expect("valid constant name"));

/// Runs `f`, catching and logging a panic rather than letting it unwind
/// through the dispatch loop — a handler failure never tears down the
/// engine.
fn invoke_guarded(f: impl FnOnce()) {
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).is_err() {
        warn!("dispatch callback panicked; continuing");
    }
}

pub struct Node {
    transport: Arc<dyn Transport>,
    wire_format: Arc<dyn WireFormat + Send + Sync>,
    pit: PendingInterestTable,
    filters: InterestFilterTable,
    registrations: RegisteredPrefixTable,
    command_signer: std::sync::Mutex<Option<Arc<CommandInterestSigner>>>,
    last_entry_id: AtomicU64,
    connected: AtomicBool,
    /// Serializes the first connection attempt; every `expressInterest`/
    /// `registerPrefix` that arrives before it completes awaits this lock
    /// instead of racing a second `connect`, which stands in for the
    /// reference engine's explicit `onConnected` FIFO queue now that this
    /// port's `Transport` is always async (see `DESIGN.md`).
    connect_lock: tokio::sync::Mutex<()>,
    /// A weak handle to this `Node`'s own `Arc`, set once at construction.
    /// Lets a `&self` method (e.g. `ElementSink::on_receive`, which a
    /// transport calls through a type-erased `Arc<dyn ElementSink>`)
    /// recover an owned `Arc<Node>` to hand to application callbacks as a
    /// [`crate::face::Face`].
    weak_self: OnceCell<Weak<Node>>,
}

impl Node {
    pub fn new(transport: Arc<dyn Transport>, wire_format: Arc<dyn WireFormat + Send + Sync>) -> Arc<Self> {
        let node = Arc::new(Node {
            transport,
            wire_format,
            pit: PendingInterestTable::new(),
            filters: InterestFilterTable::new(),
            registrations: RegisteredPrefixTable::new(),
            command_signer: std::sync::Mutex::new(None),
            last_entry_id: AtomicU64::new(0),
            connected: AtomicBool::new(false),
            connect_lock: tokio::sync::Mutex::new(()),
            weak_self: OnceCell::new(),
        });
        node.weak_self.set(Arc::downgrade(&node)).ok();
        node
    }

    fn arc_self(&self) -> Arc<Node> {
        self.weak_self
            .get()
            .and_then(Weak::upgrade)
            .expect("Node is always constructed via Node::new, which sets weak_self")
    }

    pub fn set_command_signer(&self, signer: Arc<CommandInterestSigner>) {
        *self.command_signer.lock().unwrap_or_else(|e| e.into_inner()) = Some(signer);
    }

    fn next_entry_id(&self) -> u64 {
        self.last_entry_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn ensure_connected(self: &Arc<Self>) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }
        let _guard = self.connect_lock.lock().await;
        if self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }
        let sink: Arc<dyn ElementSink> = Arc::clone(self) as Arc<dyn ElementSink>;
        // Both deployment modes in the concurrency model collapse to this
        // one call: an async transport (`is_async() == true`) returns once
        // its background read task is spawned, while a synchronous
        // transport blocks here until the handshake completes and expects
        // `process_events` to be driven afterward. Either way,
        // `connect_lock` serializes concurrent callers the same way a
        // FIFO queue of continuations would.
        self.transport.connect(sink).await?;
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Pumps a synchronous transport's I/O loop one step; a no-op for an
    /// async transport (see [`Transport::is_async`]).
    pub async fn process_events(&self) -> Result<()> {
        self.transport.process_events().await
    }

    /// Expresses `interest`, allocating a fresh id, a fresh nonce, and — if
    /// a lifetime or `on_timeout` is present — a scheduled timeout.
    pub async fn express_interest(
        self: &Arc<Self>,
        interest: Interest,
        on_data: Option<OnData>,
        on_timeout: Option<OnTimeout>,
        on_nack: Option<OnNack>,
    ) -> Result<u64> {
        self.ensure_connected().await?;
        self.express_interest_connected(interest, on_data, on_timeout, on_nack).await
    }

    async fn express_interest_connected(
        self: &Arc<Self>,
        mut interest: Interest,
        on_data: Option<OnData>,
        on_timeout: Option<OnTimeout>,
        on_nack: Option<OnNack>,
    ) -> Result<u64> {
        let id = self.next_entry_id();
        interest.refresh_nonce();

        let timeout_token = if interest.interest_lifetime().is_some() || on_timeout.is_some() {
            let delay_ms = interest.interest_lifetime().unwrap_or(DEFAULT_INTEREST_TIMEOUT_MS);
            let node = Arc::clone(self);
            Some(call_later(Duration::from_millis(delay_ms), move || {
                node.process_interest_timeout(id);
            }))
        } else {
            None
        };

        self.pit.add(PendingInterestEntry {
            id,
            interest: interest.clone(),
            on_data,
            on_timeout,
            on_nack,
            timeout_cancel: timeout_token.unwrap_or_default(),
        });

        if !RESERVED_LOCAL_TIMEOUT.is_prefix_of(interest.name()) {
            let (wire, _signed_range) = self.wire_format.encode_interest(&interest)?;
            if wire.len() > MAX_NDN_PACKET_SIZE {
                self.pit.remove_entry(id);
                return Err(NdnError::PacketTooLarge {
                    size: wire.len(),
                    max: MAX_NDN_PACKET_SIZE,
                });
            }
            debug!(id, len = wire.len(), name = %interest.name(), "sending interest");
            self.transport.send(&wire).await?;
        }

        Ok(id)
    }

    /// Sends `data` out over the transport. Enqueue-and-return: no PIT
    /// bookkeeping happens here, since satisfying a pending Interest is the
    /// forwarder's job once the Data arrives back over the wire.
    pub async fn put_data(self: &Arc<Self>, data: &Data) -> Result<()> {
        self.ensure_connected().await?;

        let (wire, _signed_range) = self.wire_format.encode_data(data)?;
        if wire.len() > MAX_NDN_PACKET_SIZE {
            return Err(NdnError::PacketTooLarge {
                size: wire.len(),
                max: MAX_NDN_PACKET_SIZE,
            });
        }
        debug!(len = wire.len(), name = %data.name(), "sending data");
        self.transport.send(&wire).await
    }

    fn process_interest_timeout(self: &Arc<Self>, id: u64) {
        if let Some(entry) = self.pit.remove_entry(id) {
            if let Some(on_timeout) = entry.on_timeout {
                let interest = entry.interest;
                invoke_guarded(move || on_timeout(&interest));
            }
        }
    }

    pub fn remove_pending_interest(&self, id: u64) -> bool {
        if let Some(entry) = self.pit.remove_entry(id) {
            entry.timeout_cancel.cancel();
            true
        } else {
            false
        }
    }

    pub fn set_interest_filter(&self, prefix: Name, on_interest: OnInterest) -> u64 {
        let id = self.next_entry_id();
        self.filters.set_interest_filter(id, InterestFilter::new(prefix), on_interest);
        id
    }

    pub fn unset_interest_filter(&self, id: u64) -> bool {
        self.filters.unset_interest_filter(id)
    }

    pub fn remove_registered_prefix(&self, id: u64) -> bool {
        match self.registrations.remove_registered_prefix(id) {
            Some(entry) => {
                if let Some(filter_id) = entry.linked_filter_id {
                    self.filters.unset_interest_filter(filter_id);
                }
                true
            },
            None => false,
        }
    }

    /// Registers `prefix` with the forwarder's RIB manager, signing the
    /// command Interest with the configured [`CommandInterestSigner`].
    pub async fn register_prefix(
        self: &Arc<Self>,
        prefix: Name,
        on_interest: Option<OnInterest>,
        on_failed: OnRegisterFailed,
        on_success: Option<OnRegisterSuccess>,
        flags: ForwardingFlags,
    ) -> Result<u64> {
        self.ensure_connected().await?;

        let registered_prefix_id = self.next_entry_id();
        let (command_prefix, lifetime_ms) = if self.transport.is_local() {
            (LOCALHOST_RIB_REGISTER.clone(), LOCAL_REGISTER_LIFETIME_MS)
        } else {
            (LOCALHOP_RIB_REGISTER.clone(), REMOTE_REGISTER_LIFETIME_MS)
        };

        let params = ControlParameters::new().with_name(prefix.clone()).with_flags(flags);
        let params_bytes = self.wire_format.encode_control_parameters(&params);

        let mut command_interest = Interest::new(command_prefix);
        let mut name = command_interest.name().clone();
        name.append(crate::name::NameComponent::generic(params_bytes.to_vec()));
        command_interest.set_name(name);
        command_interest.set_interest_lifetime(Some(lifetime_ms));

        let signer = {
            let guard = self.command_signer.lock().unwrap_or_else(|e| e.into_inner());
            guard.clone()
        }
        .ok_or_else(|| NdnError::Signing("no command signer configured".to_string()))?;
        signer.make_command_interest(&mut command_interest, self.wire_format.as_ref())?;

        let on_failed_cell = Arc::new(std::sync::Mutex::new(Some(on_failed)));

        let node_for_data = Arc::clone(self);
        let prefix_for_data = prefix.clone();
        let wire_format_for_data = Arc::clone(&self.wire_format);
        let on_failed_for_data = Arc::clone(&on_failed_cell);
        let on_data: OnData = Box::new(move |_command_interest, data| {
            let response = match wire_format_for_data.decode_control_response(data.content().bytes()) {
                Ok(response) => response,
                Err(err) => {
                    warn!(%err, prefix = %prefix_for_data, "register_prefix: malformed ControlResponse");
                    if let Some(on_failed) = on_failed_for_data.lock().unwrap_or_else(|e| e.into_inner()).take() {
                        on_failed(&prefix_for_data);
                    }
                    return;
                },
            };
            if !response.is_success() {
                warn!(
                    status = response.status_code,
                    prefix = %prefix_for_data,
                    "register_prefix: forwarder rejected registration"
                );
                if let Some(on_failed) = on_failed_for_data.lock().unwrap_or_else(|e| e.into_inner()).take() {
                    on_failed(&prefix_for_data);
                }
                return;
            }

            let linked_filter_id = on_interest.as_ref().map(|handler| {
                let filter_id = node_for_data.next_entry_id();
                node_for_data.filters.set_interest_filter(
                    filter_id,
                    InterestFilter::new(prefix_for_data.clone()),
                    handler.clone(),
                );
                filter_id
            });
            node_for_data.registrations.add(RegisteredPrefixEntry {
                id: registered_prefix_id,
                prefix: prefix_for_data.clone(),
                linked_filter_id,
            });
            if let Some(on_success) = on_success {
                on_success(&prefix_for_data, registered_prefix_id);
            }
        });

        let prefix_for_timeout = prefix.clone();
        let on_failed_for_timeout = Arc::clone(&on_failed_cell);
        let on_timeout: OnTimeout = Box::new(move |_command_interest| {
            warn!(prefix = %prefix_for_timeout, "register_prefix: command interest timed out");
            if let Some(on_failed) = on_failed_for_timeout.lock().unwrap_or_else(|e| e.into_inner()).take() {
                on_failed(&prefix_for_timeout);
            }
        });

        self.express_interest_connected(command_interest, Some(on_data), Some(on_timeout), None)
            .await?;
        Ok(registered_prefix_id)
    }

    fn on_element(&self, element: Bytes) {
        let peek = TlvDecoder::new(element.clone());
        let top_type = match peek.peek_type() {
            Ok(ty) => ty,
            Err(err) => {
                warn!(%err, "dropping element with malformed leading type");
                return;
            },
        };

        let (lp_packet, fragment) = if top_type == t::LP_PACKET {
            match lp::decode_lp_packet(element) {
                Ok((lp, fragment)) => (Some(lp), fragment),
                Err(err) => {
                    warn!(%err, "dropping malformed NDNLP packet");
                    return;
                },
            }
        } else {
            (None, element)
        };

        if fragment.is_empty() {
            return;
        }
        let fragment_decoder = TlvDecoder::new(fragment.clone());
        let fragment_type = match fragment_decoder.peek_type() {
            Ok(ty) => ty,
            Err(err) => {
                warn!(%err, "dropping fragment with malformed leading type");
                return;
            },
        };

        match fragment_type {
            t::INTEREST => self.dispatch_interest(fragment, lp_packet),
            t::DATA => self.dispatch_data(fragment, lp_packet),
            other => {
                warn!(type_code = other, "dropping fragment of unrecognized top-level type");
            },
        }
    }

    fn dispatch_interest(&self, fragment: Bytes, lp_packet: Option<lp::LpPacket>) {
        let mut interest = match self.wire_format.decode_interest(fragment) {
            Ok((interest, _signed_range)) => interest,
            Err(err) => {
                warn!(%err, "dropping malformed interest");
                return;
            },
        };
        interest.set_lp_packet(lp_packet.clone());

        if let Some(nack) = lp_packet.and_then(|lp| lp.nack) {
            let network_nack = NetworkNack::new(nack.reason);
            let entries = self.pit.extract_entries_for_nack_interest(&interest);
            for entry in entries {
                if let Some(on_nack) = entry.on_nack {
                    let stored_interest = entry.interest;
                    invoke_guarded(move || on_nack(&stored_interest, &network_nack));
                }
            }
            return;
        }

        let matched = self.filters.get_matched_filters(&interest);
        trace!(name = %interest.name(), matches = matched.len(), "interest dispatched to filters");
        let face = crate::face::Face::from_node(self.arc_self());
        for matched_filter in matched {
            let interest_ref = &interest;
            let face_ref = &face;
            invoke_guarded(move || {
                (matched_filter.on_interest)(
                    matched_filter.filter.prefix(),
                    interest_ref,
                    face_ref,
                    matched_filter.id,
                    &matched_filter.filter,
                )
            });
        }
    }

    fn dispatch_data(&self, fragment: Bytes, lp_packet: Option<lp::LpPacket>) {
        let mut data = match self.wire_format.decode_data(fragment) {
            Ok((data, _signed_range)) => data,
            Err(err) => {
                warn!(%err, "dropping malformed data");
                return;
            },
        };
        data.set_lp_packet(lp_packet);

        let entries = self.pit.extract_entries_for_expressed_interest(&data);
        trace!(name = %data.name(), matches = entries.len(), "data dispatched to pending interests");
        for entry in entries {
            if let Some(on_data) = entry.on_data {
                let stored_interest = entry.interest;
                let data_ref = &data;
                invoke_guarded(move || on_data(&stored_interest, data_ref));
            }
        }
    }
}

impl ElementSink for Node {
    fn on_receive(&self, element: Bytes) {
        self.on_element(element);
    }
}
