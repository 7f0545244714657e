// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger integration module.
//!
//! This module provides:
//! - Types for the relay's inbound/outbound ledger traffic
//! - The query/submit seam consumed from an existing ledger client
//! - The session signing identity recovered during bootstrap

pub mod client;
pub mod signing;
pub mod types;

pub use client::{ChainClient, ChainError};
pub use signing::SessionKeypair;
pub use types::*;
