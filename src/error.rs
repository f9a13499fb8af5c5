// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Reasons a TLV decode can fail. Kept as a nested enum rather than flat
/// variants on [`NdnError`] so that callers matching on "it was an encoding
/// problem" don't have to enumerate every sub-case.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodingReason {
    #[error("input truncated: needed {needed} bytes, had {available}")]
    Truncated { needed: usize, available: usize },

    #[error("unexpected TLV type: expected {expected}, found {found}")]
    UnexpectedType { expected: u64, found: u64 },

    #[error("malformed variable-length number")]
    BadVarNumber,

    #[error("nested TLV length overruns its parent")]
    NestedOverflow,

    #[error("non-minimal length encoding")]
    NonMinimalLength,

    #[error("unrecognized critical TLV type {0}")]
    UnrecognizedCritical(u64),

    #[error("non-negative integer TLV has invalid length {0} (must be 1, 2, 4, or 8)")]
    InvalidIntegerLength(usize),
}

/// Errors surfaced anywhere in the protocol runtime.
#[derive(Debug, Error)]
pub enum NdnError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingReason),

    #[error("wire-encoded packet is {size} bytes, exceeds maximum of {max}")]
    PacketTooLarge { size: usize, max: usize },

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("prefix registration for {prefix} failed: status {status_code} ({status_text})")]
    RegistrationFailed {
        prefix: String,
        status_code: u32,
        status_text: String,
    },

    #[error("invalid name URI: {0}")]
    BadUri(String),

    #[error("operation was cancelled")]
    Cancelled,

    #[error("not connected to a forwarder")]
    NotConnected,
}

pub type Result<T> = std::result::Result<T, NdnError>;
