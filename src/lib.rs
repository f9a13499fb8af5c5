// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A pure-Rust client-side runtime for the Named Data Networking (NDN)
//! protocol: NDN-TLV codec, name handling, the Interest/Data/Nack packet
//! model, an async transport abstraction, and the protocol engine tying
//! them together into `expressInterest`/`registerPrefix` against a live
//! forwarder. [`face::Face`] is the application-facing entry point.

pub mod blob;
pub mod encoding;
pub mod error;
pub mod face;
pub mod lp;
pub mod name;
pub mod node;
pub mod packet;
pub mod security;
pub mod tables;
pub mod transport;
pub mod wire;
