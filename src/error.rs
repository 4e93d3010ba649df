//! Error taxonomy.
//!
//! Only two conditions ever escape the core as a `Result::Err`:
//! `invalid-mode` and `allocation-failure`. Malformed markdown, malformed
//! tags, and unsafe links are silent local degradations — they never
//! produce an `Error` value, they just render as if the offending
//! construct were absent.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid renderer mode index: {0}")]
    InvalidMode(i32),
    #[error("failed to allocate output buffer")]
    Allocation,
}
