// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain query/submit seam.

use async_trait::async_trait;
use thiserror::Error;

use super::signing::SessionKeypair;
use super::types::{Digest, QueryOrder, ReplyTransaction, TransactionRecord};

/// Errors from the chain capability.
///
/// The session treats every variant as transient and retries after the
/// fixed backoff.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("transaction not found: {0}")]
    NotFound(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

/// Query and submission capability consumed from an existing ledger client.
///
/// This trait abstracts the ledger to enable testing with mock
/// implementations; implementing a real client is outside this crate.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// List executed transactions sent *from* `sender`, with decoded
    /// inputs, in the requested order.
    async fn list_transactions(
        &self,
        sender: &str,
        order: QueryOrder,
    ) -> Result<Vec<TransactionRecord>, ChainError>;

    /// Fetch one transaction by digest, with decoded inputs.
    async fn get_transaction(&self, digest: &Digest) -> Result<TransactionRecord, ChainError>;

    /// Submit a reply signed by the session keypair and await finality.
    async fn execute_transaction(
        &self,
        reply: &ReplyTransaction,
        signer: &SessionKeypair,
    ) -> Result<Digest, ChainError>;
}
