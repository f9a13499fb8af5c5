// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::{
    blob::Blob,
    error::{NdnError, Result},
    packet::{KeyLocator, SignatureType},
};

/// Abstract signer the engine invokes over a packet's signed portion. The
/// full key-store / trust-policy engine behind a production signer is an
/// external collaborator — this runtime only needs this narrow interface.
pub trait Signer: Send + Sync {
    fn sign(&self, signed_portion: &[u8]) -> Result<Blob>;
    fn signature_type(&self) -> SignatureType;
    fn key_locator(&self) -> KeyLocator;
}

/// Signs by SHA-256 digest alone, with no key — the degenerate signer used
/// when the only requirement is tamper-evidence, not authentication.
pub struct DigestSha256Signer;

impl Signer for DigestSha256Signer {
    fn sign(&self, signed_portion: &[u8]) -> Result<Blob> {
        let digest = Sha256::digest(signed_portion);
        Ok(Blob::from(digest.to_vec()))
    }

    fn signature_type(&self) -> SignatureType {
        SignatureType::DigestSha256
    }

    fn key_locator(&self) -> KeyLocator {
        KeyLocator::None
    }
}

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over a shared secret, naming the key by `key_locator_name`.
pub struct HmacSha256Signer {
    key: Vec<u8>,
    key_locator: KeyLocator,
}

impl HmacSha256Signer {
    pub fn new(key: Vec<u8>, key_locator: KeyLocator) -> Self {
        HmacSha256Signer { key, key_locator }
    }
}

impl Signer for HmacSha256Signer {
    fn sign(&self, signed_portion: &[u8]) -> Result<Blob> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| NdnError::Signing(e.to_string()))?;
        mac.update(signed_portion);
        Ok(Blob::from(mac.finalize().into_bytes().to_vec()))
    }

    fn signature_type(&self) -> SignatureType {
        SignatureType::HmacWithSha256
    }

    fn key_locator(&self) -> KeyLocator {
        self.key_locator.clone()
    }
}
