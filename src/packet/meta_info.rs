// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::name::NameComponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Blob,
    Link,
    Key,
    Nack,
    Other(u64),
}

impl ContentType {
    pub fn to_code(self) -> u64 {
        match self {
            ContentType::Blob => 0,
            ContentType::Link => 1,
            ContentType::Key => 2,
            ContentType::Nack => 3,
            ContentType::Other(v) => v,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => ContentType::Blob,
            1 => ContentType::Link,
            2 => ContentType::Key,
            3 => ContentType::Nack,
            other => ContentType::Other(other),
        }
    }
}

/// Metadata carried alongside a Data packet's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaInfo {
    pub content_type: ContentType,
    /// Milliseconds; `None` means unspecified (the wire model's "negative
    /// means unspecified" collapses to an `Option` here).
    pub freshness_period: Option<u64>,
    pub final_block_id: Option<NameComponent>,
}

impl MetaInfo {
    pub fn new() -> Self {
        MetaInfo::default()
    }
}
