// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    blob::Blob,
    lp::LpPacket,
    name::Name,
    packet::{meta_info::MetaInfo, signature::Signature},
};

/// A response packet: a named, signed unit of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    meta_info: MetaInfo,
    content: Blob,
    signature: Signature,
    lp_packet: Option<LpPacket>,
}

impl Data {
    pub fn new(name: Name) -> Self {
        Data {
            name,
            meta_info: MetaInfo::new(),
            content: Blob::empty(),
            signature: Signature::digest_sha256(),
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

    pub fn meta_info(&self) -> &MetaInfo {
        &self.meta_info
    }

    pub fn set_meta_info(&mut self, meta_info: MetaInfo) -> &mut Self {
        self.meta_info = meta_info;
        self
    }

    pub fn content(&self) -> &Blob {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<Blob>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn set_signature(&mut self, signature: Signature) -> &mut Self {
        self.signature = signature;
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
