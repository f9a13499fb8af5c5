// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Signing support: an abstract [`Signer`] capability and the
//! [`CommandInterestSigner`] that uses one to authenticate forwarder
//! management commands. Key storage and trust policy are external
//! collaborators this runtime only calls through `Signer`.

pub mod command_interest_signer;
pub mod signer;

pub use command_interest_signer::CommandInterestSigner;
pub use signer::{DigestSha256Signer, HmacSha256Signer, Signer};
