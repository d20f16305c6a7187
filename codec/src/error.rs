//! Error types for codec operations

use std::collections::TryReserveError;
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("text too long: {0} > {max}", max = u16::MAX)]
    TextTooLong(usize),
    #[error("formatter error")]
    Format,
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },
    #[error("invalid size length: {0}")]
    InvalidSizeLen(u8),
    #[error("length exceeded: {0}")]
    LengthExceeded(u64),
    #[error("invalid data in {0}: {1}")]
    InvalidData(&'static str, &'static str), // context, message
}
