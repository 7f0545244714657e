// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relay wire payloads.
//!
//! Everything that travels inside an envelope is UTF-8 JSON; field names
//! and discriminant strings are part of the wire contract and must not
//! change.

use std::fmt;

use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Discriminant of a relay message.
///
/// Unknown wire strings deserialize to [`Intent::Unknown`]; dispatch treats
/// that as a no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    TransactionData,
    PersonalMessage,
    #[serde(other)]
    Unknown,
}

/// Ledger network a signature is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Decrypted inbound signing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayMessage {
    pub intent: Intent,
    pub network: Network,
    /// Address of the account the counterpart expects to sign.
    pub address: String,
    /// Base64 of the request content: serialized transaction bytes, message
    /// bytes, or the bootstrap payload.
    pub bytes: String,
}

impl RelayMessage {
    /// Decode the `bytes` field.
    pub fn decoded_bytes(&self) -> Result<Vec<u8>, RelayError> {
        Base64::decode_vec(&self.bytes)
            .map_err(|_| RelayError::MalformedPayload("bytes field is not valid base64".into()))
    }
}

/// Encrypted outbound reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayReply {
    pub intent: Intent,
    pub signature: String,
}

/// Contents of the very first relay message: the serialized session signing
/// identity.
#[derive(Deserialize)]
pub struct BootstrapPayload {
    /// Base64 of the 32-byte secret key controlling the ephemeral address.
    #[serde(rename = "secretKey")]
    pub secret_key: String,
}

impl fmt::Debug for BootstrapPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key material stays out of logs
        f.debug_struct("BootstrapPayload")
            .field("secret_key", &"[redacted]")
            .finish()
    }
}

/// Termination notice.
///
/// A `PersonalMessage` whose bytes parse as exactly this shape ends the
/// session and surfaces the deployed URL; any other content is an ordinary
/// message-signing request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminationNotice {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_json_shape_is_stable() {
        let json = r#"{
            "intent": "TransactionData",
            "network": "testnet",
            "address": "0xoperator",
            "bytes": "aGVsbG8="
        }"#;
        let message: RelayMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.intent, Intent::TransactionData);
        assert_eq!(message.network, Network::Testnet);
        assert_eq!(message.decoded_bytes().unwrap(), b"hello");
    }

    #[test]
    fn reply_serializes_with_wire_field_names() {
        let reply = RelayReply {
            intent: Intent::PersonalMessage,
            signature: "sig".into(),
        };
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"intent":"PersonalMessage","signature":"sig"}"#
        );
    }

    #[test]
    fn unknown_intent_deserializes_to_catch_all() {
        let json = r#"{
            "intent": "SomethingElse",
            "network": "mainnet",
            "address": "0xoperator",
            "bytes": ""
        }"#;
        let message: RelayMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.intent, Intent::Unknown);
    }

    #[test]
    fn bootstrap_payload_uses_camel_case_key() {
        let payload: BootstrapPayload =
            serde_json::from_str(r#"{"secretKey":"c2VjcmV0"}"#).unwrap();
        assert_eq!(payload.secret_key, "c2VjcmV0");
        assert!(!format!("{payload:?}").contains("c2VjcmV0"));
    }

    #[test]
    fn termination_notice_requires_exact_shape() {
        let exact: Result<TerminationNotice, _> =
            serde_json::from_str(r#"{"url":"https://example.wal.app"}"#);
        assert_eq!(exact.unwrap().url, "https://example.wal.app");

        let extra: Result<TerminationNotice, _> =
            serde_json::from_str(r#"{"url":"https://example.wal.app","x":1}"#);
        assert!(extra.is_err());

        let missing: Result<TerminationNotice, _> = serde_json::from_str(r#"{}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn invalid_base64_bytes_are_malformed_payload() {
        let message = RelayMessage {
            intent: Intent::PersonalMessage,
            network: Network::Testnet,
            address: "0xoperator".into(),
            bytes: "not*base64".into(),
        };
        assert!(matches!(
            message.decoded_bytes(),
            Err(RelayError::MalformedPayload(_))
        ));
    }
}
