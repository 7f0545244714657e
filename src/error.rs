// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relay error taxonomy.
//!
//! Nothing in the monitor loop is fatal except the explicit termination
//! notice and external teardown; every variant here is either dropped with
//! the message that caused it or retried after the fixed backoff. The only
//! in-memory state surviving a failed iteration is the cached PIN and the
//! last-processed digest.

use thiserror::Error;

use crate::chain::ChainError;
use crate::crypto::{DecryptionError, EncryptionError};
use crate::wallet::WalletError;

/// Top-level error for relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed chunk layout on an inbound transaction. Drops that message
    /// only; the loop continues.
    #[error("invalid transaction shape: {0}")]
    InvalidTransactionShape(String),

    /// Wrong PIN or corrupted envelope. Recoverable by re-prompting; never
    /// auto-retried with the same PIN.
    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    /// The operator dismissed the PIN prompt without a valid submission.
    #[error("PIN prompt dismissed")]
    PromptDismissed,

    /// The operator declined the signing request in the wallet. Logged, no
    /// reply is published, the loop continues.
    #[error("wallet rejected the signing request")]
    WalletRejected,

    /// The wallet capability failed for a reason other than an explicit
    /// decline.
    #[error("wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// Chain query or submission failure; retried after the fixed backoff.
    #[error("chain unavailable: {0}")]
    ChainUnavailable(#[from] ChainError),

    /// Decrypted plaintext did not parse as a relay payload.
    #[error("malformed relay payload: {0}")]
    MalformedPayload(String),
}

impl From<WalletError> for RelayError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Rejected => RelayError::WalletRejected,
            WalletError::Backend(msg) => RelayError::WalletUnavailable(msg),
        }
    }
}
