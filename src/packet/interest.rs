// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use rand::Rng;

use crate::{lp::LpPacket, name::Name, packet::selectors::Selectors};

/// A request for content identified by name, optionally narrowed by
/// [`Selectors`] the forwarder applies on our behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    selectors: Selectors,
    scope: Option<u64>,
    /// Milliseconds; `None` means "forwarder default".
    interest_lifetime: Option<u64>,
    nonce: [u8; 4],
    /// Populated only on Interests decoded out of an NDNLPv2 envelope;
    /// read-only, never sent back out.
    lp_packet: Option<LpPacket>,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Interest {
            name,
            selectors: Selectors::new(),
            scope: None,
            interest_lifetime: None,
            nonce: [0; 4],
            lp_packet: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name = name;
        self
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub fn set_selectors(&mut self, selectors: Selectors) -> &mut Self {
        self.selectors = selectors;
        self
    }

    pub fn scope(&self) -> Option<u64> {
        self.scope
    }

    pub fn set_scope(&mut self, scope: Option<u64>) -> &mut Self {
        self.scope = scope;
        self
    }

    pub fn interest_lifetime(&self) -> Option<u64> {
        self.interest_lifetime
    }

    pub fn set_interest_lifetime(&mut self, lifetime_ms: Option<u64>) -> &mut Self {
        self.interest_lifetime = lifetime_ms;
        self
    }

    pub fn nonce(&self) -> [u8; 4] {
        self.nonce
    }

    pub fn set_nonce(&mut self, nonce: [u8; 4]) -> &mut Self {
        self.nonce = nonce;
        self
    }

    /// Assigns a fresh cryptographically random nonce, as done on every
    /// `expressInterest` call and whenever a zero-filled nonce is seen at
    /// encode time.
    pub fn refresh_nonce(&mut self) -> &mut Self {
        let mut nonce = [0u8; 4];
        rand::rng().fill_bytes(&mut nonce);
        self.nonce = nonce;
        self
    }

    pub fn lp_packet(&self) -> Option<&LpPacket> {
        self.lp_packet.as_ref()
    }

    pub fn set_lp_packet(&mut self, lp: Option<LpPacket>) -> &mut Self {
        self.lp_packet = lp;
        self
    }

    pub fn incoming_face_id(&self) -> Option<u64> {
        self.lp_packet.as_ref().and_then(|lp| lp.incoming_face_id)
    }
}
