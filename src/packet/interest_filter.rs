// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{name::Name, packet::interest::Interest};

/// A prefix plus an optional regex applied to the Interest name's suffix
/// components, used to decide whether an incoming Interest is dispatched to
/// a locally registered handler.
#[derive(Debug, Clone)]
pub struct InterestFilter {
    prefix: Name,
    regex: Option<regex::Regex>,
}

impl InterestFilter {
    pub fn new(prefix: Name) -> Self {
        InterestFilter {
            prefix,
            regex: None,
        }
    }

    pub fn with_regex(prefix: Name, pattern: &str) -> Result<Self, regex::Error> {
        Ok(InterestFilter {
            prefix,
            regex: Some(regex::Regex::new(pattern)?),
        })
    }

    pub fn prefix(&self) -> &Name {
        &self.prefix
    }

    pub fn matches(&self, interest: &Interest) -> bool {
        let name = interest.name();
        if !self.prefix.is_prefix_of(name) {
            return false;
        }
        match &self.regex {
            None => true,
            Some(re) => {
                let suffix = name.get_sub_name(self.prefix.len() as i64, None).to_uri();
                re.is_match(&suffix)
            },
        }
    }
}

impl PartialEq for InterestFilter {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
            && self.regex.as_ref().map(regex::Regex::as_str)
                == other.regex.as_ref().map(regex::Regex::as_str)
    }
}

impl Eq for InterestFilter {}
