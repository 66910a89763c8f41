//! Question identity hashing.

use std::fmt;

use quizlens_config::IdentityAlgorithm;
use sha2::{Digest, Sha256};

/// Deterministic digest of a question and its answers; the cache and
/// deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityHash(String);

impl IdentityHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The hashed text: question, newline, answers joined by `|`.
pub fn identity_input(question_text: &str, answers: &[String]) -> String {
    format!("{}\n{}", question_text, answers.join("|"))
}

/// Compute the identity of a question. Answer order matters.
pub fn compute_identity(
    algorithm: IdentityAlgorithm,
    question_text: &str,
    answers: &[String],
) -> IdentityHash {
    let input = identity_input(question_text, answers);
    let digest = match algorithm {
        IdentityAlgorithm::Sha256 => sha256_hex(&input),
        IdentityAlgorithm::Rolling => rolling_checksum(&input),
    };
    IdentityHash(digest)
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// `h = h * 31 + unit` over UTF-16 code units with 32-bit wraparound,
/// rendered as `f` followed by the unsigned hex value.
fn rolling_checksum(input: &str) -> String {
    let hash = input.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    format!("f{:x}", hash as u32)
}
