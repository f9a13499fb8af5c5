// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{blob::Blob, name::Name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureType {
    Sha256WithRsa,
    Sha256WithEcdsa,
    HmacWithSha256,
    DigestSha256,
    Generic(u64),
}

impl SignatureType {
    pub fn to_code(self) -> u64 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
            SignatureType::HmacWithSha256 => 4,
            SignatureType::Generic(v) => v,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => SignatureType::DigestSha256,
            1 => SignatureType::Sha256WithRsa,
            3 => SignatureType::Sha256WithEcdsa,
            4 => SignatureType::HmacWithSha256,
            other => SignatureType::Generic(other),
        }
    }
}

/// Identifies the key used to produce a signature, by name or by a direct
/// digest of the key. Only the name form is needed for command Interests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLocator {
    Name(Name),
    KeyDigest(Blob),
    None,
}

impl Default for KeyLocator {
    fn default() -> Self {
        KeyLocator::None
    }
}

/// `SignatureInfo` plus the `SignatureValue` blob produced over the owning
/// packet's signed portion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub signature_type: SignatureType,
    pub key_locator: KeyLocator,
    pub value: Blob,
}

impl Signature {
    pub fn new(signature_type: SignatureType) -> Self {
        Signature {
            signature_type,
            key_locator: KeyLocator::None,
            value: Blob::empty(),
        }
    }

    pub fn digest_sha256() -> Self {
        Signature::new(SignatureType::DigestSha256)
    }
}
