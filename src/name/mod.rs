// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Hierarchical, typed names: the addressing scheme every Interest and Data
//! packet carries. A [`Name`] is an ordered sequence of [`NameComponent`]s
//! with a canonical total order independent of any particular component's
//! meaning, plus a human-readable URI form for configuration and logging.

pub mod component;
pub mod conventions;

use std::{cmp::Ordering, fmt};

pub use component::NameComponent;

use crate::error::{NdnError, Result};

/// An ordered sequence of name components, e.g. `/a/b/%00%01`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name {
    components: Vec<NameComponent>,
}

impl Name {
    pub fn new() -> Self {
        Name {
            components: Vec::new(),
        }
    }

    pub fn from_components(components: Vec<NameComponent>) -> Self {
        Name { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[NameComponent] {
        &self.components
    }

    pub fn append(&mut self, component: NameComponent) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn append_name(&mut self, other: &Name) -> &mut Self {
        self.components.extend(other.components.iter().cloned());
        self
    }

    /// Supports negative indices counting from the end (`-1` is the last
    /// component).
    pub fn get(&self, index: i64) -> Option<&NameComponent> {
        let len = self.components.len() as i64;
        let i = if index < 0 { len + index } else { index };
        if i < 0 || i >= len {
            None
        } else {
            self.components.get(i as usize)
        }
    }

    /// Sub-name of `count` components (or to the end if `count` exceeds
    /// the remaining length) starting at `start` (negative-index aware).
    pub fn get_sub_name(&self, start: i64, count: Option<usize>) -> Name {
        let len = self.components.len() as i64;
        let begin = if start < 0 {
            (len + start).max(0)
        } else {
            start.min(len)
        } as usize;
        let end = match count {
            Some(c) => (begin + c).min(self.components.len()),
            None => self.components.len(),
        };
        if begin >= end {
            Name::new()
        } else {
            Name::from_components(self.components[begin..end].to_vec())
        }
    }

    /// Prefix of `n` components (`n` may exceed the name's length, in
    /// which case the full name is returned).
    pub fn get_prefix(&self, n: i64) -> Name {
        if n < 0 {
            self.get_sub_name(0, Some((self.components.len() as i64 + n).max(0) as usize))
        } else {
            self.get_sub_name(0, Some(n as usize))
        }
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        if self.components.len() > other.components.len() {
            return false;
        }
        self.components
            .iter()
            .zip(other.components.iter())
            .all(|(a, b)| a == b)
    }

    /// Canonical order: component-wise using [`NameComponent::compare`];
    /// on a common-prefix tie, the shorter name sorts first.
    pub fn compare(&self, other: &Name) -> Ordering {
        for (a, b) in self.components.iter().zip(other.components.iter()) {
            match a.compare(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.components.len().cmp(&other.components.len())
    }

    /// A name sorting immediately after every other name with this name as
    /// a strict prefix: the prefix with its last component's successor
    /// appended. The empty name's successor is the one-component name
    /// `/0x00`.
    pub fn get_successor(&self) -> Name {
        if self.components.is_empty() {
            let mut out = Name::new();
            out.append(NameComponent::generic(vec![0x00]));
            return out;
        }
        let mut out = self.get_prefix(self.components.len() as i64 - 1);
        out.append(self.components.last().unwrap().successor());
        out
    }

    pub fn to_uri(&self) -> String {
        if self.components.is_empty() {
            return "/".to_string();
        }
        let mut s = String::new();
        for c in &self.components {
            s.push('/');
            s.push_str(&component_to_uri_segment(c));
        }
        s
    }

    pub fn parse(uri: &str) -> Result<Name> {
        let trimmed = uri.trim();
        let trimmed = trimmed.strip_prefix("ndn:").unwrap_or(trimmed);
        let mut name = Name::new();
        for segment in trimmed.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            name.append(uri_segment_to_component(segment)?);
        }
        Ok(name)
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl std::str::FromStr for Name {
    type Err = NdnError;

    fn from_str(s: &str) -> Result<Name> {
        Name::parse(s)
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.' | b'_')
}

/// A component consisting only of `.` characters renders with three extra
/// dots appended, so it can be told apart from the path-segment markers
/// `.` and `..` used by relative-URI resolvers.
fn component_to_uri_segment(c: &NameComponent) -> String {
    if c.is_implicit_sha256_digest() {
        return format!("sha256digest={}", hex::encode(c.value().as_bytes()));
    }
    let bytes = c.value().as_bytes();
    if bytes.iter().all(|&b| b == b'.') {
        let mut s = String::from("...");
        s.push_str(&".".repeat(bytes.len()));
        return s;
    }
    let mut s = String::new();
    for &b in bytes {
        if is_unreserved(b) {
            s.push(b as char);
        } else {
            s.push_str(&format!("%{:02X}", b));
        }
    }
    s
}

fn uri_segment_to_component(segment: &str) -> Result<NameComponent> {
    if let Some(hex_digest) = segment.strip_prefix("sha256digest=") {
        let bytes = hex::decode(hex_digest)
            .map_err(|_| NdnError::BadUri(format!("invalid sha256digest component: {segment}")))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| NdnError::BadUri(format!("sha256digest must be 32 bytes: {segment}")))?;
        return Ok(NameComponent::implicit_sha256_digest(arr));
    }

    if segment.bytes().all(|b| b == b'.') && segment.len() >= 3 {
        let dots = segment.len() - 3;
        return Ok(NameComponent::generic(vec![b'.'; dots]));
    }

    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes
                .get(i + 1)
                .and_then(|b| (*b as char).to_digit(16))
                .ok_or_else(|| NdnError::BadUri(format!("invalid percent-escape in {segment}")))?;
            let lo = bytes
                .get(i + 2)
                .and_then(|b| (*b as char).to_digit(16))
                .ok_or_else(|| NdnError::BadUri(format!("invalid percent-escape in {segment}")))?;
            out.push(((hi << 4) | lo) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(NameComponent::generic(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_round_trips_with_escapes_and_digest() {
        let uri = "/hello/%00%01/sha256digest=\
                   0000000000000000000000000000000000000000000000000000000000000001";
        let name = Name::parse(uri).unwrap();
        assert_eq!(name.len(), 3);
        assert_eq!(name.to_uri(), uri);
    }

    #[test]
    fn empty_name_uri_is_root() {
        assert_eq!(Name::new().to_uri(), "/");
        assert_eq!(Name::parse("/").unwrap(), Name::new());
    }

    #[test]
    fn all_dot_component_gets_extra_dots() {
        let mut name = Name::new();
        name.append(NameComponent::generic(b".".to_vec()));
        assert_eq!(name.to_uri(), "/....");
        assert_eq!(Name::parse("/....").unwrap(), name);
    }

    #[test]
    fn shorter_name_is_canonically_smaller_on_common_prefix() {
        let a = Name::parse("/a").unwrap();
        let b = Name::parse("/a/b").unwrap();
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn get_successor_example() {
        let mut n = Name::new();
        n.append(NameComponent::generic(vec![0xFF, 0xFF]));
        let succ = n.get_successor();
        assert_eq!(succ.get(-1).unwrap().value().as_bytes(), &[0x00, 0x00, 0x00]);
    }

    #[test]
    fn empty_name_successor_is_single_zero_byte() {
        let succ = Name::new().get_successor();
        assert_eq!(succ.to_uri(), "/%00");
    }

    #[test]
    fn parse_ignores_dot_and_dot_dot_segments() {
        assert_eq!(Name::parse("/a/./b/../c").unwrap(), Name::parse("/a/b/c").unwrap());
    }

    #[test]
    fn plus_is_unescaped_and_tilde_is_escaped() {
        let mut name = Name::new();
        name.append(NameComponent::generic(b"a+b~c".to_vec()));
        assert_eq!(name.to_uri(), "/a+b%7Ec");
        assert_eq!(Name::parse("/a+b%7Ec").unwrap(), name);
    }

    #[test]
    fn negative_index_and_subname() {
        let name = Name::parse("/a/b/c").unwrap();
        assert_eq!(name.get(-1).unwrap().value().as_bytes(), b"c");
        assert_eq!(name.get_sub_name(1, None).to_uri(), "/b/c");
        assert_eq!(name.get_prefix(-1).to_uri(), "/a/b");
    }

    #[test]
    fn is_prefix_of() {
        let a = Name::parse("/a/b").unwrap();
        let b = Name::parse("/a/b/c").unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
    }
}
