// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PIN vault.
//!
//! Bridges an asynchronous decryption need to an interactive prompt and
//! caches the validated PIN for the rest of the session. The session side
//! holds a [`PinVault`]; whatever renders the password prompt drains the
//! paired receiver and answers each [`PinRequest`] exactly once. The channel
//! is bounded to one in-flight request, so at most one prompt is ever
//! outstanding.
//!
//! A candidate PIN is validated *before* the request resolves, by opening
//! the envelope that triggered the prompt. A tag mismatch re-opens the
//! prompt with an inline error; the PIN itself never leaves process memory
//! and is never logged.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::crypto;
use crate::error::RelayError;

/// Inline error text shown after a failed attempt.
pub const INVALID_PIN_MESSAGE: &str = "Invalid PIN. Please try again.";

/// One prompt round sent to the interactive task.
#[derive(Debug)]
pub struct PinRequest {
    /// Inline error from the previous attempt, if any.
    pub error: Option<String>,
    reply: oneshot::Sender<PinResponse>,
}

impl PinRequest {
    /// Answer with the candidate PIN the operator typed.
    pub fn submit(self, pin: impl Into<String>) {
        let _ = self.reply.send(PinResponse::Submit(pin.into()));
    }

    /// Answer with an explicit dismissal.
    pub fn cancel(self) {
        let _ = self.reply.send(PinResponse::Cancel);
    }
}

#[derive(Debug)]
enum PinResponse {
    Submit(String),
    Cancel,
}

/// Session-side handle to the prompt bridge and the PIN cache.
pub struct PinVault {
    cached: Option<String>,
    prompt_tx: mpsc::Sender<PinRequest>,
}

impl PinVault {
    /// Create a vault and the receiver the prompt surface drains.
    pub fn new() -> (Self, mpsc::Receiver<PinRequest>) {
        let (prompt_tx, prompt_rx) = mpsc::channel(1);
        (
            Self {
                cached: None,
                prompt_tx,
            },
            prompt_rx,
        )
    }

    /// PIN validated earlier in this session, if any.
    pub fn cached_pin(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    /// Resolve the PIN able to open `envelope`.
    ///
    /// Returns the cached PIN without prompting once one has been validated.
    /// Otherwise prompts in a loop: each submitted candidate is tried
    /// against the envelope first; success caches and resolves, a tag
    /// mismatch re-prompts with [`INVALID_PIN_MESSAGE`], and a dismissal (or
    /// a dropped prompt surface) fails with [`RelayError::PromptDismissed`].
    pub async fn request_decryption(&mut self, envelope: &[u8]) -> Result<String, RelayError> {
        if let Some(pin) = &self.cached {
            return Ok(pin.clone());
        }

        let mut error: Option<String> = None;
        loop {
            let (reply, response) = oneshot::channel();
            self.prompt_tx
                .send(PinRequest {
                    error: error.take(),
                    reply,
                })
                .await
                .map_err(|_| RelayError::PromptDismissed)?;

            match response.await {
                Ok(PinResponse::Submit(candidate)) => {
                    match crypto::decrypt(envelope, &candidate) {
                        Ok(_) => {
                            debug!("PIN validated and cached for the session");
                            self.cached = Some(candidate.clone());
                            return Ok(candidate);
                        }
                        Err(_) => {
                            error = Some(INVALID_PIN_MESSAGE.to_string());
                        }
                    }
                }
                Ok(PinResponse::Cancel) | Err(_) => return Err(RelayError::PromptDismissed),
            }
        }
    }
}
