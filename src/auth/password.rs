// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification.
//!
//! Hashes use PBKDF2-HMAC-SHA256 in modular crypt format:
//!
//! ```text
//! $pbkdf2-sha256$<rounds>$<salt>$<checksum>
//! ```
//!
//! `salt` and `checksum` are "adapted base64": the standard alphabet with
//! `.` in place of `+` and no padding. This is the format already stored for
//! existing accounts, so those hashes verify unchanged.

use std::num::NonZeroU32;

use base64ct::{Base64Unpadded, Encoding};
use ring::{
    pbkdf2,
    rand::{SecureRandom, SystemRandom},
};

const SCHEME: &str = "pbkdf2-sha256";

/// Rounds used for newly generated hashes.
pub const DEFAULT_ROUNDS: u32 = 29_000;

const SALT_LEN: usize = 16;
const CHECKSUM_LEN: usize = 32;

/// Hash verified when the username does not exist, so both failure paths
/// pay the same key-derivation cost. Its checksum matches no password.
pub const DUMMY_HASH: &str = "$pbkdf2-sha256$29000$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, thiserror::Error)]
pub enum PasswordHashError {
    #[error("system random source failed")]
    Random,
}

/// Check `plaintext` against a stored hash.
///
/// Returns `false` for any hash that cannot be parsed, after running the
/// derivation against [`DUMMY_HASH`] so the cost matches a real check. The
/// checksum comparison is constant-time (done by `ring`).
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    let Some((parsed, well_formed)) = verification_target(hashed) else {
        return false;
    };
    let matched = pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        parsed.rounds,
        &parsed.salt,
        plaintext.as_bytes(),
        &parsed.checksum,
    )
    .is_ok();
    matched && well_formed
}

/// Hash to derive against, and whether it is the stored one.
fn verification_target(hashed: &str) -> Option<(ParsedHash, bool)> {
    match ParsedHash::parse(hashed) {
        Some(parsed) => Some((parsed, true)),
        None => ParsedHash::parse(DUMMY_HASH).map(|dummy| (dummy, false)),
    }
}

/// Hash `plaintext` with a fresh random salt and [`DEFAULT_ROUNDS`].
pub fn hash_password(plaintext: &str) -> Result<String, PasswordHashError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordHashError::Random)?;
    Ok(hash_with_salt(plaintext, &salt, default_rounds()))
}

fn default_rounds() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_ROUNDS).unwrap_or(NonZeroU32::MIN)
}

fn hash_with_salt(plaintext: &str, salt: &[u8], rounds: NonZeroU32) -> String {
    let mut checksum = [0u8; CHECKSUM_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        salt,
        plaintext.as_bytes(),
        &mut checksum,
    );
    format!(
        "${SCHEME}${rounds}${}${}",
        ab64_encode(salt),
        ab64_encode(&checksum)
    )
}

struct ParsedHash {
    rounds: NonZeroU32,
    salt: Vec<u8>,
    checksum: Vec<u8>,
}

impl ParsedHash {
    fn parse(hashed: &str) -> Option<Self> {
        let mut parts = hashed.strip_prefix('$')?.split('$');
        if parts.next()? != SCHEME {
            return None;
        }
        let rounds = parts.next()?.parse::<u32>().ok().and_then(NonZeroU32::new)?;
        let salt = ab64_decode(parts.next()?)?;
        let checksum = ab64_decode(parts.next()?)?;
        if parts.next().is_some() || checksum.is_empty() {
            return None;
        }
        Some(Self {
            rounds,
            salt,
            checksum,
        })
    }
}

fn ab64_encode(bytes: &[u8]) -> String {
    Base64Unpadded::encode_string(bytes).replace('+', ".")
}

fn ab64_decode(text: &str) -> Option<Vec<u8>> {
    Base64Unpadded::decode_vec(&text.replace('.', "+")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Generated outside this crate with PBKDF2-HMAC-SHA256, salt 0x00..0x0f
    const ADMIN_HASH: &str =
        "$pbkdf2-sha256$29000$AAECAwQFBgcICQoLDA0ODw$dNJHUz02KYDUB2jKWhPInHoBvE9iGXjGz0MrSDk2WbA";
    const USER_HASH_1000: &str =
        "$pbkdf2-sha256$1000$AAECAwQFBgcICQoLDA0ODw$ukPd0nY72RhLvZEZNxa.yTipu5jx3FWkRwJH51M3tR4";

    #[test]
    fn verifies_externally_generated_hashes() {
        assert!(verify_password("Admin123!", ADMIN_HASH));
        assert!(!verify_password("admin123!", ADMIN_HASH));
        assert!(verify_password("User123!", USER_HASH_1000));
    }

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("s3cret").unwrap();
        assert!(hashed.starts_with("$pbkdf2-sha256$29000$"));
        assert!(verify_password("s3cret", &hashed));
        assert!(!verify_password("s3cret ", &hashed));
    }

    #[test]
    fn salts_are_random() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn reproduces_known_checksum() {
        let salt: Vec<u8> = (0u8..16).collect();
        let rounds = NonZeroU32::new(29_000).unwrap();
        assert_eq!(hash_with_salt("Admin123!", &salt, rounds), ADMIN_HASH);
    }

    #[test]
    fn malformed_hashes_never_verify() {
        for hashed in [
            "",
            "plaintext",
            "$pbkdf2-sha256$",
            "$pbkdf2-sha256$0$AAECAwQFBgcICQoLDA0ODw$dNJHUz02KYDUB2jKWhPInHoBvE9iGXjGz0MrSDk2WbA",
            "$pbkdf2-sha256$abc$AAECAwQFBgcICQoLDA0ODw$dNJHUz02KYDUB2jKWhPInHoBvE9iGXjGz0MrSDk2WbA",
            "$pbkdf2-sha512$29000$AAECAwQFBgcICQoLDA0ODw$dNJHUz02KYDUB2jKWhPInHoBvE9iGXjGz0MrSDk2WbA",
            "$pbkdf2-sha256$29000$!!!$dNJHUz02KYDUB2jKWhPInHoBvE9iGXjGz0MrSDk2WbA",
            "$pbkdf2-sha256$29000$AAECAwQFBgcICQoLDA0ODw$",
            "$pbkdf2-sha256$29000$AAECAwQFBgcICQoLDA0ODw$dNJHUz02KYDUB2jKWhPInHoBvE9iGXjGz0MrSDk2WbA$x",
        ] {
            assert!(!verify_password("Admin123!", hashed), "accepted {hashed:?}");
        }
    }

    #[test]
    fn dummy_hash_parses_and_rejects() {
        assert!(ParsedHash::parse(DUMMY_HASH).is_some());
        assert!(!verify_password("", DUMMY_HASH));
        assert!(!verify_password("Admin123!", DUMMY_HASH));
    }

    #[test]
    fn malformed_hash_still_pays_full_derivation() {
        let (target, well_formed) = verification_target("not-a-hash").unwrap();
        assert!(!well_formed);
        assert_eq!(target.rounds.get(), DEFAULT_ROUNDS);
        assert_eq!(target.checksum.len(), CHECKSUM_LEN);

        let (target, well_formed) = verification_target(USER_HASH_1000).unwrap();
        assert!(well_formed);
        assert_eq!(target.rounds.get(), 1000);
    }
}
