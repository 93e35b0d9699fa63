//! Estimate and submission identifiers.
//!
//! - `estimate_id`: deterministic, derived from pricing-relevant input fields.
//!   This is the idempotency / lookup key.
//! - `submission_id`: time + random, unique per call. Bookkeeping only.

pub mod hash;

use chrono::Utc;
use rand::Rng;

pub use hash::{HASH_LEN, NormalizedInput, estimate_id, hash_key, rolling_hash, to_base36};

pub const SUBMISSION_ID_PREFIX: &str = "sub-";

/// Length of the random suffix of a submission id.
pub const SUBMISSION_SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `sub-{unix millis}-{random base-36 suffix}`.
pub fn submission_id() -> String {
    submission_id_with(&mut rand::thread_rng(), Utc::now().timestamp_millis())
}

pub fn submission_id_with<R: Rng + ?Sized>(rng: &mut R, millis: i64) -> String {
    format!(
        "{SUBMISSION_ID_PREFIX}{millis}-{}",
        random_base36(rng, SUBMISSION_SUFFIX_LEN)
    )
}

/// Time + random alphanumeric key used when a deterministic key cannot be built.
pub(crate) fn fallback_key(len: usize) -> String {
    let time_part = to_base36(Utc::now().timestamp_millis().unsigned_abs());
    let random_part = random_base36(&mut rand::thread_rng(), len);
    format!("{time_part}{random_part}")
        .chars()
        .rev()
        .take(len)
        .collect()
}

fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}
