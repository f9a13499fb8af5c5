// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::{Arc, Mutex};

use rand::Rng;

use super::signer::Signer;
use crate::{
    error::Result,
    name::NameComponent,
    packet::{Interest, Signature},
    wire::WireFormat,
};

const DEFAULT_COMMAND_INTEREST_LIFETIME_MS: u64 = 1000;
const NONCE_LEN: usize = 8;

fn minimal_big_endian(value: u64) -> Vec<u8> {
    let be = value.to_be_bytes();
    let first_nonzero = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    be[first_nonzero..].to_vec()
}

/// Turns a plain Interest into a signed command Interest a forwarder's
/// management plane will accept: appends `Timestamp`, `Nonce`,
/// `SignatureInfo`, and `SignatureValue` components to its name.
pub struct CommandInterestSigner {
    signer: Arc<dyn Signer>,
    last_timestamp_ms: Mutex<u64>,
}

impl CommandInterestSigner {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        CommandInterestSigner {
            signer,
            last_timestamp_ms: Mutex::new(0),
        }
    }

    /// Strictly increasing even across calls within the same millisecond.
    fn next_timestamp_ms(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut last = self.last_timestamp_ms.lock().unwrap_or_else(|e| e.into_inner());
        let ts = if now > *last { now } else { *last + 1 };
        *last = ts;
        ts
    }

    pub fn make_command_interest(&self, interest: &mut Interest, wire_format: &dyn WireFormat) -> Result<()> {
        let mut name = interest.name().clone();
        name.append(NameComponent::generic(minimal_big_endian(self.next_timestamp_ms())));

        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        name.append(NameComponent::generic(nonce.to_vec()));

        interest.set_name(name);

        let (signed_portion, _) = wire_format.encode_interest(interest)?;
        let value = self.signer.sign(&signed_portion)?;

        let mut sig_info = Signature::new(self.signer.signature_type());
        sig_info.key_locator = self.signer.key_locator();
        let sig_info_bytes = wire_format.encode_signature_info(&sig_info);

        let mut name = interest.name().clone();
        name.append(NameComponent::generic(sig_info_bytes.to_vec()));
        name.append(NameComponent::generic(value.bytes()));
        interest.set_name(name);

        if interest.interest_lifetime().is_none() {
            interest.set_interest_lifetime(Some(DEFAULT_COMMAND_INTEREST_LIFETIME_MS));
        }
        Ok(())
    }
}
