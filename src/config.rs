// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Relay Tunables
//!
//! Runtime settings for a relay session. The ledger is the only signal
//! source, so everything is fixed-interval polling; there are no push
//! notifications to configure.
//!
//! | Setting | Description | Default |
//! |---------|-------------|---------|
//! | `poll_interval` | Fixed backoff between chain polls | 2.5 s |
//! | `gas_budget` | Gas budget for self-funded reply transactions | 10,000,000 |

use std::time::Duration;

/// Default fixed backoff between chain polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

/// Default gas budget attached to reply transactions.
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

/// Runtime tunables for a relay session.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Fixed backoff between chain polls. Every sleep is cancellable.
    pub poll_interval: Duration,
    /// Gas budget attached to each reply transaction.
    pub gas_budget: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            gas_budget: DEFAULT_GAS_BUDGET,
        }
    }
}
