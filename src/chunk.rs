// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chunked pure-value wire codec.
//!
//! A relay payload rides a ledger transaction as an ordered list of encoded
//! pure inputs: one boolean discriminant followed by one or more byte
//! vectors whose contents concatenate to the encrypted envelope. Inbound
//! requests may arrive split across many chunks, since a single pure input
//! is size-bounded by the ledger; replies always fit in one.
//!
//! Only the two value shapes that appear on the wire are implemented:
//! booleans (a single byte) and byte vectors (ULEB128 length prefix
//! followed by the bytes). Length prefixes must be minimal and fit in
//! 32 bits.

use crate::error::RelayError;

/// Discriminant carried as input #0. `true` is reserved and rejected.
const RELAY_DISCRIMINANT: bool = false;

fn invalid(msg: impl Into<String>) -> RelayError {
    RelayError::InvalidTransactionShape(msg.into())
}

/// Encode a boolean pure value.
pub fn encode_bool(value: bool) -> Vec<u8> {
    vec![u8::from(value)]
}

/// Decode a boolean pure value. The input must be exactly one byte, `0x00`
/// or `0x01`.
pub fn decode_bool(input: &[u8]) -> Result<bool, RelayError> {
    match input {
        [0x00] => Ok(false),
        [0x01] => Ok(true),
        _ => Err(invalid("input does not decode as a boolean")),
    }
}

/// Encode a byte vector pure value.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 5);
    let mut remaining = bytes.len() as u32;
    loop {
        let byte = (remaining & 0x7f) as u8;
        remaining >>= 7;
        if remaining == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    out.extend_from_slice(bytes);
    out
}

/// Decode a byte vector pure value; the input must be fully consumed.
pub fn decode_bytes(input: &[u8]) -> Result<Vec<u8>, RelayError> {
    let (length, consumed) = decode_uleb128(input)?;
    let body = &input[consumed..];
    if body.len() != length as usize {
        return Err(invalid(format!(
            "byte vector length prefix {} does not match {} payload bytes",
            length,
            body.len()
        )));
    }
    Ok(body.to_vec())
}

/// Decode a minimal ULEB128-encoded u32, returning the value and the number
/// of prefix bytes consumed.
fn decode_uleb128(input: &[u8]) -> Result<(u32, usize), RelayError> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    for (i, &byte) in input.iter().enumerate() {
        let low = u32::from(byte & 0x7f);
        if shift == 28 && low > 0x0f {
            return Err(invalid("length prefix overflows 32 bits"));
        }
        value |= low << shift;
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(invalid("non-minimal length prefix"));
            }
            return Ok((value, i + 1));
        }
        shift += 7;
        if shift > 28 {
            return Err(invalid("length prefix overflows 32 bits"));
        }
    }
    Err(invalid("truncated length prefix"))
}

/// Reassemble the encrypted envelope from a transaction's ordered inputs.
///
/// Input #0 must decode as the boolean discriminant `false`; every remaining
/// input must decode as a byte vector. The vectors are concatenated in input
/// order, never reordered. Zero envelope chunks is an error.
pub fn unpack(inputs: &[Vec<u8>]) -> Result<Vec<u8>, RelayError> {
    let (first, chunks) = inputs
        .split_first()
        .ok_or_else(|| invalid("transaction carries no inputs"))?;

    if decode_bool(first)? != RELAY_DISCRIMINANT {
        return Err(invalid("reserved discriminant"));
    }
    if chunks.is_empty() {
        return Err(invalid("no envelope chunks after the discriminant"));
    }

    let mut envelope = Vec::new();
    for chunk in chunks {
        envelope.extend_from_slice(&decode_bytes(chunk)?);
    }
    Ok(envelope)
}

/// Encode an outbound envelope as transaction inputs.
///
/// Replies are small enough that the envelope always travels as a single
/// byte vector after the discriminant.
pub fn pack(envelope: &[u8]) -> Vec<Vec<u8>> {
    vec![encode_bool(RELAY_DISCRIMINANT), encode_bytes(envelope)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        let envelope: Vec<u8> = (0u8..=255).collect();
        let inputs = pack(&envelope);
        assert_eq!(inputs.len(), 2);
        assert_eq!(unpack(&inputs).unwrap(), envelope);
    }

    #[test]
    fn any_chunk_split_reconstructs_the_envelope() {
        let envelope: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let splits: &[&[usize]] = &[
            &[1000],
            &[1, 999],
            &[500, 500],
            &[100, 400, 500],
            &[999, 1],
            &[250, 250, 250, 250],
        ];
        for split in splits {
            let mut inputs = vec![encode_bool(false)];
            let mut offset = 0;
            for &len in *split {
                inputs.push(encode_bytes(&envelope[offset..offset + len]));
                offset += len;
            }
            assert_eq!(unpack(&inputs).unwrap(), envelope, "split {split:?}");
        }
    }

    #[test]
    fn empty_chunks_are_tolerated_inside_a_split() {
        let inputs = vec![
            encode_bool(false),
            encode_bytes(b""),
            encode_bytes(b"abc"),
            encode_bytes(b""),
        ];
        assert_eq!(unpack(&inputs).unwrap(), b"abc");
    }

    #[test]
    fn true_discriminant_is_rejected() {
        let inputs = vec![encode_bool(true), encode_bytes(b"abc")];
        assert!(matches!(
            unpack(&inputs),
            Err(RelayError::InvalidTransactionShape(_))
        ));
    }

    #[test]
    fn non_boolean_first_input_is_rejected() {
        for first in [vec![], vec![0x02], vec![0x00, 0x00]] {
            let inputs = vec![first, encode_bytes(b"abc")];
            assert!(matches!(
                unpack(&inputs),
                Err(RelayError::InvalidTransactionShape(_))
            ));
        }
    }

    #[test]
    fn missing_envelope_chunks_are_rejected() {
        assert!(matches!(
            unpack(&[encode_bool(false)]),
            Err(RelayError::InvalidTransactionShape(_))
        ));
        assert!(matches!(
            unpack(&[]),
            Err(RelayError::InvalidTransactionShape(_))
        ));
    }

    #[test]
    fn trailing_bytes_after_a_vector_are_rejected() {
        let mut chunk = encode_bytes(b"abc");
        chunk.push(0xff);
        let inputs = vec![encode_bool(false), chunk];
        assert!(matches!(
            unpack(&inputs),
            Err(RelayError::InvalidTransactionShape(_))
        ));
    }

    #[test]
    fn short_vector_body_is_rejected() {
        // prefix claims 5 bytes, body has 3
        let inputs = vec![encode_bool(false), vec![0x05, b'a', b'b', b'c']];
        assert!(matches!(
            unpack(&inputs),
            Err(RelayError::InvalidTransactionShape(_))
        ));
    }

    #[test]
    fn multi_byte_length_prefix_round_trips() {
        let envelope = vec![0xabu8; 300];
        let encoded = encode_bytes(&envelope);
        // 300 = 0xAC 0x02 in ULEB128
        assert_eq!(&encoded[..2], &[0xac, 0x02]);
        assert_eq!(decode_bytes(&encoded).unwrap(), envelope);
    }

    #[test]
    fn non_minimal_length_prefix_is_rejected() {
        // 3 encoded as 0x83 0x00 instead of 0x03
        let chunk = vec![0x83, 0x00, b'a', b'b', b'c'];
        assert!(matches!(
            decode_bytes(&chunk),
            Err(RelayError::InvalidTransactionShape(_))
        ));
    }

    #[test]
    fn oversized_length_prefix_is_rejected() {
        let chunk = vec![0xff, 0xff, 0xff, 0xff, 0x7f];
        assert!(matches!(
            decode_bytes(&chunk),
            Err(RelayError::InvalidTransactionShape(_))
        ));
    }
}
