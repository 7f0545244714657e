// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signing seam.
//!
//! The relay consumes an existing wallet-signing capability; it never holds
//! the operator's keys. Both operations are interactive and may be declined
//! by the human operator.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Network;

/// Errors from the wallet capability.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The operator declined the request.
    #[error("signing request declined by the operator")]
    Rejected,

    /// The wallet backend failed.
    #[error("wallet backend error: {0}")]
    Backend(String),
}

/// Signing capability consumed from a connected wallet.
///
/// This trait is the mockability seam for session tests; implementing a real
/// wallet is outside this crate.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Sign serialized transaction data for `network`.
    async fn sign_transaction_data(
        &self,
        bytes: &[u8],
        network: Network,
    ) -> Result<String, WalletError>;

    /// Sign a personal message for `network`.
    async fn sign_personal_message(
        &self,
        bytes: &[u8],
        network: Network,
    ) -> Result<String, WalletError>;
}
