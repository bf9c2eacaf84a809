// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HMAC signing/verification for sensitive inbound/outbound frames, and
//! key rotation (§4.11, §6 `key_rotation`).

use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Sign `payload` with `key`, returning a lowercase-hex digest.
pub fn sign(key: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(payload);
    encode_hex(&mac.finalize().into_bytes())
}

/// Verify `signature` (lowercase hex) against `payload` signed with `key`.
pub fn verify(key: &[u8], payload: &[u8], signature: &str) -> bool {
    let Some(expected) = decode_hex(signature) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

fn encode_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(out, "{b:02x}").expect("writing to a String never fails");
    }
    out
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Rotating holder for the current signing key. The server can push a new
/// key (`key_rotation`); verification against a just-rotated-out key would
/// otherwise reject messages still in flight, so callers should rotate
/// promptly rather than hold two keys — the server is expected to stop
/// using the old key before announcing rotation.
#[derive(Clone)]
pub struct SigningKey {
    inner: Arc<RwLock<Vec<u8>>>,
}

impl SigningKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(key)),
        }
    }

    pub fn current(&self) -> Vec<u8> {
        self.inner.read().clone()
    }

    pub fn rotate(&self, new_key: Vec<u8>) {
        *self.inner.write() = new_key;
    }

    pub fn sign(&self, payload: &[u8]) -> String {
        sign(&self.current(), payload)
    }

    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        verify(&self.current(), payload, signature)
    }
}

#[cfg(test)]
#[path = "signing_tests.rs"]
mod tests;
