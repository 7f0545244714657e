// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing Relay - Remote Signing over an On-Chain Message Bus
//!
//! This crate lets an unattended deployment script, which has no direct
//! network channel to a human's wallet, obtain cryptographic signatures
//! from that wallet. A public ledger serves as a store-and-forward,
//! encrypted, asynchronous message bus: the script sends requests as
//! transactions from an ephemeral address, and a [`session::RelaySession`]
//! watching that address decrypts them, drives the wallet, and publishes
//! encrypted replies back on-chain.
//!
//! ## Modules
//!
//! - `chain` - Ledger types, query/submit seam, session keypair
//! - `chunk` - Chunked pure-value wire codec
//! - `config` - Session tunables
//! - `crypto` - PIN-keyed envelope encryption
//! - `error` - Relay error taxonomy
//! - `models` - Wire payloads
//! - `pin` - PIN prompt bridge and cache
//! - `session` - Bootstrap + monitor state machine
//! - `wallet` - Wallet signing seam

pub mod chain;
pub mod chunk;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod pin;
pub mod session;
pub mod wallet;

pub use config::RelayConfig;
pub use error::RelayError;
pub use session::{RelaySession, SessionOutcome, SessionState};
