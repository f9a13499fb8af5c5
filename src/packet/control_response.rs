// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::blob::Blob;

/// Reply carried in the content of a Data packet answering a command
/// Interest. `status_code` 200 means success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlResponse {
    pub status_code: u32,
    pub status_text: String,
    pub body: Option<Blob>,
}

impl ControlResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
