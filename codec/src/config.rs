//! Construction-time options for [crate::SerialWriter].

/// Configuration for a [crate::SerialWriter].
///
/// # Examples
///
/// ```
/// use smithy_codec::{Config, SerialWriter};
///
/// let writer = SerialWriter::from_config(Config {
///     capacity: 4096,
///     ..Default::default()
/// });
/// assert!(writer.is_empty());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of bytes to reserve up front.
    pub capacity: usize,

    /// Whether [crate::SerialWriter::invalidate] overwrites regions with
    /// [crate::layout::UNDEFINED].
    ///
    /// Defaults to on in debug builds and off otherwise.
    pub poison: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 0,
            poison: cfg!(debug_assertions),
        }
    }
}
