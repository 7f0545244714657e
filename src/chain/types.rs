// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger-facing types for relay traffic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ledger identifier of one executed transaction.
///
/// Doubles as the relay's idempotency key and, given the ledger's
/// per-account ordering, as a total order over requests and replies for the
/// watched address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub String);

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Digest(value.to_string())
    }
}

/// Ordering for transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrder {
    /// Earliest first.
    Ascending,
    /// Latest first.
    Descending,
}

/// One executed transaction with its decoded pure-value inputs.
///
/// Each entry in `inputs` is the raw encoding of a single typed value, in
/// the order the transaction carried them.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub digest: Digest,
    pub inputs: Vec<Vec<u8>>,
}

/// Outbound reply transaction, self-funded from the ephemeral address.
///
/// The gas object pays for the reply and is transferred straight back to
/// the ephemeral address, so replies need no funding beyond what the
/// deploying script already parked there.
#[derive(Debug, Clone)]
pub struct ReplyTransaction {
    /// Sending account (the ephemeral rendezvous address).
    pub sender: String,
    /// Gas budget attached to the transaction.
    pub gas_budget: u64,
    /// Encoded pure-value inputs, discriminant first.
    pub inputs: Vec<Vec<u8>>,
    /// Recipient of the transaction's own gas object.
    pub transfer_gas_to: String,
}
