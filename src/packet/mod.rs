// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod control_parameters;
pub mod control_response;
pub mod data;
pub mod delegation_set;
pub mod forwarding_flags;
pub mod interest;
pub mod interest_filter;
pub mod meta_info;
pub mod network_nack;
pub mod selectors;
pub mod signature;

pub use control_parameters::ControlParameters;
pub use control_response::ControlResponse;
pub use data::Data;
pub use delegation_set::DelegationSet;
pub use forwarding_flags::ForwardingFlags;
pub use interest::Interest;
pub use interest_filter::InterestFilter;
pub use meta_info::MetaInfo;
pub use network_nack::{NackReason, NetworkNack};
pub use selectors::Selectors;
pub use signature::{KeyLocator, Signature, SignatureType};
