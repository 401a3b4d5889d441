//! Order number generation
//!
//! Format: `ORD-<YYYYMMDD>-<6 chars of [A-Z0-9]>`. Uniqueness is enforced by
//! the database; the ledger retries with a fresh number on a clash.

use rand::Rng;
use rand::rngs::OsRng;
use shared::util::today_compact;
use std::fmt::Debug;

const PREFIX: &str = "ORD";
const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of candidate order numbers
pub trait OrderNumberGenerator: Send + Sync + Debug {
    fn generate(&self) -> String;
}

/// Date prefix plus an OS-random suffix
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOrderNumber;

impl OrderNumberGenerator for RandomOrderNumber {
    fn generate(&self) -> String {
        format!("{PREFIX}-{}-{}", today_compact(), random_suffix())
    }
}

fn random_suffix() -> String {
    let mut rng = OsRng;
    (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Check the `ORD-YYYYMMDD-XXXXXX` shape
pub fn is_well_formed(number: &str) -> bool {
    let mut parts = number.split('-');
    let (Some(prefix), Some(date), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == PREFIX
        && date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix.bytes().all(|b| ALPHABET.contains(&b))
}
