// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Relay Session
//!
//! The bootstrap + monitor state machine that turns one account's
//! transaction history into a store-and-forward signing channel.
//!
//! ## Strategy
//!
//! A deploying script with no channel to the operator's wallet parks
//! signing requests on the ledger as transactions sent *from* an ephemeral
//! address. The session:
//!
//! 1. **Bootstrap** (once): waits for the first transaction from the
//!    ephemeral address, recovers the session keypair from its decrypted
//!    payload, and, unless a reply already exists from a previous page
//!    load, acknowledges with a wallet-signed hash of the request so the
//!    script can detect a live relay.
//! 2. **Monitor** (loop): polls the latest transaction, decrypts new
//!    requests, dispatches them to the wallet, publishes encrypted reply
//!    transactions, and advances a strictly monotonic digest cursor so no
//!    request is ever processed twice.
//!
//! Both phases run on one task; monitoring only starts once bootstrap has
//! produced a keypair, so they never overlap.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful teardown. The
//! token is checked at the top of each iteration and raced against every
//! backoff sleep. An already-in-flight wallet or chain await cannot be
//! preempted, so one request/reply round-trip may complete after teardown
//! is requested.

use std::sync::Arc;

use base64ct::{Base64, Encoding};
use sha2::{Digest as _, Sha256};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chain::{
    ChainClient, Digest, QueryOrder, ReplyTransaction, SessionKeypair, TransactionRecord,
};
use crate::chunk;
use crate::config::RelayConfig;
use crate::crypto;
use crate::error::RelayError;
use crate::models::{BootstrapPayload, Intent, RelayMessage, RelayReply, TerminationNotice};
use crate::pin::PinVault;
use crate::wallet::WalletSigner;

/// Lifecycle states, published through [`RelaySession::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Bootstrapping,
    Monitoring,
    Completed,
}

/// How a session run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A termination notice arrived; carries the deployed URL it surfaced.
    Completed { url: String },
    /// Torn down via the cancellation token.
    Cancelled,
}

/// One remote-signing relay session over a single ephemeral address.
///
/// Owns the idempotency cursor and the PIN vault for its whole lifetime;
/// the session keypair is recovered during bootstrap and passed by
/// reference into the monitor loop. No global state is involved.
pub struct RelaySession {
    chain: Arc<dyn ChainClient>,
    wallet: Arc<dyn WalletSigner>,
    vault: PinVault,
    config: RelayConfig,
    ephemeral_address: String,
    /// Digest of the last processed request or published reply.
    cursor: Option<Digest>,
    state_tx: watch::Sender<SessionState>,
}

impl RelaySession {
    /// Create a session watching `ephemeral_address`.
    pub fn new(
        chain: Arc<dyn ChainClient>,
        wallet: Arc<dyn WalletSigner>,
        vault: PinVault,
        ephemeral_address: impl Into<String>,
        config: RelayConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            chain,
            wallet,
            vault,
            config,
            ephemeral_address: ephemeral_address.into(),
            cursor: None,
            state_tx,
        }
    }

    /// Subscribe to lifecycle state changes (the status surface).
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Drive the session until a termination notice or teardown.
    pub async fn run(mut self, shutdown: CancellationToken) -> SessionOutcome {
        info!(address = %self.ephemeral_address, "Relay session starting");
        self.set_state(SessionState::Bootstrapping);

        let Some(keypair) = self.bootstrap(&shutdown).await else {
            info!("Relay session cancelled during bootstrap");
            return SessionOutcome::Cancelled;
        };

        info!("Bootstrap complete, monitoring for signing requests");
        self.set_state(SessionState::Monitoring);
        let outcome = self.monitor(&keypair, &shutdown).await;
        if matches!(outcome, SessionOutcome::Completed { .. }) {
            self.set_state(SessionState::Completed);
        }
        outcome
    }

    /// Retry bootstrap attempts until a keypair is recovered or teardown.
    async fn bootstrap(&mut self, shutdown: &CancellationToken) -> Option<SessionKeypair> {
        loop {
            if shutdown.is_cancelled() {
                return None;
            }
            match self.bootstrap_attempt().await {
                Ok(Some(keypair)) => return Some(keypair),
                // nothing from the ephemeral address yet
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Bootstrap attempt failed, will retry"),
            }
            if !self.sleep_or_cancel(shutdown).await {
                return None;
            }
        }
    }

    /// One bootstrap attempt. `Ok(None)` means no inbound traffic yet.
    async fn bootstrap_attempt(&mut self) -> Result<Option<SessionKeypair>, RelayError> {
        let records = self
            .chain
            .list_transactions(&self.ephemeral_address, QueryOrder::Ascending)
            .await?;
        let Some(first) = records.first() else {
            return Ok(None);
        };

        let (message, content) = self.read_message(first).await?;
        let payload: BootstrapPayload = serde_json::from_slice(&content)
            .map_err(|e| RelayError::MalformedPayload(format!("bootstrap payload: {e}")))?;
        let keypair = SessionKeypair::from_base64_secret(&payload.secret_key)?;

        if records.len() == 1 {
            // Prove the relay is live: sign the hash of the request with the
            // connected wallet and publish it as the first reply.
            let ack = Base64::encode_string(Sha256::digest(&content).as_slice());
            let signature = self
                .wallet
                .sign_personal_message(ack.as_bytes(), message.network)
                .await?;
            let digest = self.publish_reply(&keypair, message.intent, signature).await?;
            info!(%digest, "Bootstrap acknowledgment published");
            self.cursor = Some(digest);
        } else {
            // A reply already exists (page reload): acknowledging again
            // would replay the side effect. Resume behind the second
            // transaction instead.
            self.cursor = Some(records[1].digest.clone());
            debug!(cursor = %records[1].digest, "Prior acknowledgment found, skipping");
        }

        Ok(Some(keypair))
    }

    /// Poll for requests until a termination notice or teardown.
    async fn monitor(
        &mut self,
        keypair: &SessionKeypair,
        shutdown: &CancellationToken,
    ) -> SessionOutcome {
        loop {
            if shutdown.is_cancelled() {
                break;
            }
            match self.monitor_step(keypair).await {
                Ok(Some(url)) => {
                    info!(%url, "Termination notice received, deployment complete");
                    return SessionOutcome::Completed { url };
                }
                Ok(None) => {}
                Err(RelayError::WalletRejected) => {
                    warn!("Operator declined the signing request, no reply published");
                }
                Err(e) => warn!(error = %e, "Monitor iteration failed, will retry"),
            }
            if !self.sleep_or_cancel(shutdown).await {
                break;
            }
        }
        info!("Relay session shutting down");
        SessionOutcome::Cancelled
    }

    /// One monitor iteration. Returns the deployed URL when the termination
    /// notice arrives.
    async fn monitor_step(
        &mut self,
        keypair: &SessionKeypair,
    ) -> Result<Option<String>, RelayError> {
        let Some(latest) = self.poll_latest().await? else {
            return Ok(None);
        };

        let record = self.chain.get_transaction(&latest).await?;
        let (message, content) = self.read_message(&record).await?;
        // The request is decrypted; whatever happens next, never read this
        // digest again.
        self.cursor = Some(record.digest.clone());

        match message.intent {
            Intent::TransactionData => {
                let signature = self
                    .wallet
                    .sign_transaction_data(&content, message.network)
                    .await?;
                let digest = self.publish_reply(keypair, message.intent, signature).await?;
                self.cursor = Some(digest);
            }
            Intent::PersonalMessage => {
                if let Ok(notice) = serde_json::from_slice::<TerminationNotice>(&content) {
                    return Ok(Some(notice.url));
                }
                let signature = self
                    .wallet
                    .sign_personal_message(&content, message.network)
                    .await?;
                let digest = self.publish_reply(keypair, message.intent, signature).await?;
                self.cursor = Some(digest);
            }
            Intent::Unknown => {
                debug!(digest = %record.digest, "Ignoring relay message with unknown intent");
            }
        }
        Ok(None)
    }

    /// Latest unseen digest from the ephemeral address, if any.
    async fn poll_latest(&self) -> Result<Option<Digest>, RelayError> {
        let records = self
            .chain
            .list_transactions(&self.ephemeral_address, QueryOrder::Descending)
            .await?;
        let Some(latest) = records.first() else {
            return Ok(None);
        };
        if self.cursor.as_ref() == Some(&latest.digest) {
            return Ok(None);
        }
        Ok(Some(latest.digest.clone()))
    }

    /// Unpack and decrypt one inbound transaction into a relay message plus
    /// the decoded content bytes it carries.
    async fn read_message(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<(RelayMessage, Vec<u8>), RelayError> {
        let envelope = chunk::unpack(&record.inputs)?;
        let pin = self.vault.request_decryption(&envelope).await?;
        let plaintext = crypto::decrypt(&envelope, &pin)?;
        let message: RelayMessage = serde_json::from_slice(&plaintext)
            .map_err(|e| RelayError::MalformedPayload(format!("relay message: {e}")))?;
        let content = message.decoded_bytes()?;
        Ok((message, content))
    }

    /// Encrypt `{intent, signature}` with the session PIN and publish it as
    /// a self-funded reply transaction; resolves once the ledger reports
    /// finality.
    async fn publish_reply(
        &self,
        keypair: &SessionKeypair,
        intent: Intent,
        signature: String,
    ) -> Result<Digest, RelayError> {
        // The PIN was resolved when the triggering request was decrypted.
        let Some(pin) = self.vault.cached_pin() else {
            return Err(RelayError::PromptDismissed);
        };

        let payload = serde_json::to_vec(&RelayReply { intent, signature })
            .map_err(|e| RelayError::MalformedPayload(format!("reply payload: {e}")))?;
        let envelope = crypto::decode_envelope(&crypto::encrypt(&payload, pin)?)?;

        let reply = ReplyTransaction {
            sender: self.ephemeral_address.clone(),
            gas_budget: self.config.gas_budget,
            inputs: chunk::pack(&envelope),
            transfer_gas_to: self.ephemeral_address.clone(),
        };
        let digest = self.chain.execute_transaction(&reply, keypair).await?;
        debug!(%digest, "Reply transaction finalized");
        Ok(digest)
    }

    /// Fixed backoff racing the cancellation token. Returns `false` on
    /// teardown.
    async fn sleep_or_cancel(&self, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.config.poll_interval) => true,
            _ = shutdown.cancelled() => false,
        }
    }

    fn set_state(&self, state: SessionState) {
        self.state_tx.send_replace(state);
    }
}
