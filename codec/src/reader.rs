//! Sequential decoding of a packed value buffer.

use crate::{
    layout::{self, MAX_SIZE_LEN},
    Error, Read, Scalar,
};
use std::any::type_name;

/// A cursor over a buffer produced by [crate::SerialWriter].
///
/// Values must be read back in the order and with the types they were written with: the buffer
/// carries no type information of its own.
///
/// # Example
///
/// ```
/// use smithy_codec::{SerialReader, SerialWriter};
///
/// let mut writer = SerialWriter::new();
/// writer.append(&[0x6Cu8, 0x6D][..]).unwrap();
/// writer.append("tail").unwrap();
///
/// let mut reader = SerialReader::new(writer.as_slice());
/// assert_eq!(reader.next::<&[u8]>(), &[0x6C, 0x6D]);
/// assert_eq!(reader.next::<String>(), "tail");
/// ```
#[derive(Clone, Debug)]
pub struct SerialReader<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> SerialReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, cursor: 0 }
    }

    /// Returns the offset of the next unread byte.
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// Decodes the next value.
    ///
    /// Panics if the buffer does not hold a valid `T` at the current position. Use
    /// [SerialReader::try_next] for untrusted input.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: Read<'a>>(&mut self) -> T {
        let position = self.cursor;
        match self.try_next() {
            Ok(value) => value,
            Err(err) => panic!(
                "failed to decode {} at offset {position}: {err}",
                type_name::<T>()
            ),
        }
    }

    /// Decodes the next value, leaving the cursor untouched on failure.
    pub fn try_next<T: Read<'a>>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        let result = T::read(self);
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Skips padding up to a multiple of `align`.
    pub(crate) fn align(&mut self, align: usize) -> Result<(), Error> {
        let n = layout::padding(self.cursor, align);
        self.take(n).map(|_| ())
    }

    /// Consumes the next `n` bytes.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::EndOfBuffer {
                needed: n,
                remaining,
            });
        }
        let bytes = &self.buf[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(bytes)
    }

    /// Decodes one aligned scalar image.
    #[doc(hidden)]
    pub fn get_scalar<T: Scalar>(&mut self) -> Result<T, Error> {
        self.align(T::ALIGN)?;
        T::get(self.take(T::SIZE)?)
    }

    /// Decodes a sequence header, returning the element count.
    pub(crate) fn get_count(&mut self) -> Result<usize, Error> {
        let size_len = self.take(1)?[0];
        if size_len > MAX_SIZE_LEN {
            return Err(Error::InvalidSizeLen(size_len));
        }
        let count = layout::decode_count(self.take(size_len as usize)?);
        usize::try_from(count).map_err(|_| Error::LengthExceeded(count))
    }

    /// Decodes a sequence header and returns the count and the raw payload, skipping the
    /// sentinel element if the sequence carries one.
    pub(crate) fn get_sequence<T: Scalar>(
        &mut self,
        sentinel: bool,
    ) -> Result<(usize, &'a [u8]), Error> {
        let count = self.get_count()?;
        if T::SIZE == 0 && count > layout::MAX_ZERO_SIZED_COUNT {
            return Err(Error::LengthExceeded(count as u64));
        }
        self.align(T::ALIGN)?;
        let len = count
            .checked_mul(T::SIZE)
            .ok_or(Error::LengthExceeded(count as u64))?;
        let payload = self.take(len)?;
        if sentinel {
            self.take(T::SIZE)?;
        }
        Ok((count, payload))
    }
}

/// Decodes `count` element images laid out back to back in `payload`.
pub(crate) fn get_elems<T: Scalar>(count: usize, payload: &[u8]) -> Result<Vec<T>, Error> {
    let mut elems = Vec::new();
    elems.try_reserve_exact(count)?;
    if T::SIZE == 0 {
        for _ in 0..count {
            elems.push(T::get(&[])?);
        }
        return Ok(elems);
    }
    for chunk in payload.chunks_exact(T::SIZE) {
        elems.push(T::get(chunk)?);
    }
    Ok(elems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SerialWriter;

    #[test]
    fn test_end_of_buffer() {
        let mut reader = SerialReader::new(&[1, 2, 3]);
        assert_eq!(
            reader.try_next::<u32>(),
            Err(Error::EndOfBuffer {
                needed: 4,
                remaining: 3
            })
        );
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.next::<u8>(), 1);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_invalid_size_len() {
        let mut reader = SerialReader::new(&[9, 0, 0]);
        assert_eq!(reader.try_next::<Vec<u8>>(), Err(Error::InvalidSizeLen(9)));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_truncated_payload() {
        let mut reader = SerialReader::new(&[1, 4, 1, 0, 2, 0]);
        assert_eq!(
            reader.try_next::<Vec<u16>>(),
            Err(Error::EndOfBuffer {
                needed: 8,
                remaining: 4
            })
        );
    }

    #[test]
    fn test_padding_skipped() {
        let mut writer = SerialWriter::new();
        writer.append(&3u8).unwrap();
        writer.append(&0x0102_0304u32).unwrap();
        let mut reader = writer.reader();
        assert_eq!(reader.next::<u8>(), 3);
        assert_eq!(reader.next::<u32>(), 0x0102_0304);
        assert_eq!(reader.position(), 8);
    }

    #[test]
    #[should_panic(expected = "failed to decode bool at offset 0")]
    fn test_next_panics_on_invalid_image() {
        let mut reader = SerialReader::new(&[2]);
        let _ = reader.next::<bool>();
    }
}
