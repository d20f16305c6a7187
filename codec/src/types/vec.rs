//! Sequence codecs for slices, vectors and strings.
//!
//! A sequence is a one-byte `size_len`, the element count in `size_len` native-order bytes,
//! padding up to the element alignment, and the element images back to back. Text is a sequence
//! of `u8` holding UTF-8.

use crate::{
    reader::get_elems,
    writer::sequence_size,
    Error, Handle, Read, Scalar, SerialReader, SerialWriter, Shape, Write,
};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

impl<T: Scalar> Write for [T] {
    const SHAPE: Shape = Shape::Sequence { sentinel: false };

    #[inline]
    fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error> {
        writer.put_sequence(self, None)
    }

    #[inline]
    fn encode_size(&self, offset: usize) -> usize {
        sequence_size::<T>(offset, self.len(), false)
    }

    #[inline]
    fn can_overwrite(&self, writer: &SerialWriter, handle: Handle) -> bool {
        writer.can_overwrite_sequence::<T>(handle, self.len(), false)
    }

    #[inline]
    fn overwrite(&self, writer: &mut SerialWriter, handle: Handle) {
        writer.overwrite_sequence(handle, self, None)
    }
}

impl Write for str {
    const SHAPE: Shape = Shape::Sequence { sentinel: false };

    #[inline]
    fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error> {
        <[u8]>::write(self.as_bytes(), writer)
    }

    #[inline]
    fn encode_size(&self, offset: usize) -> usize {
        <[u8]>::encode_size(self.as_bytes(), offset)
    }

    #[inline]
    fn can_overwrite(&self, writer: &SerialWriter, handle: Handle) -> bool {
        <[u8]>::can_overwrite(self.as_bytes(), writer, handle)
    }

    #[inline]
    fn overwrite(&self, writer: &mut SerialWriter, handle: Handle) {
        <[u8]>::overwrite(self.as_bytes(), writer, handle)
    }
}

forward_write!([T: Scalar] &[T] => [T]);
forward_write!([T: Scalar] Vec<T> => [T]);
forward_write!([] &str => str);
forward_write!([] String => str);

impl<'a, T: Scalar> Read<'a> for Vec<T> {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        let (count, payload) = reader.get_sequence::<T>(false)?;
        get_elems(count, payload)
    }
}

/// Borrows the elements straight out of the buffer.
///
/// Only available for element types without alignment requirements, since the buffer itself
/// carries no alignment guarantee.
impl<'a, T> Read<'a> for &'a [T]
where
    T: Scalar + FromBytes + Unaligned + Immutable + KnownLayout,
{
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        let (_, payload) = reader.get_sequence::<T>(false)?;
        <[T]>::ref_from_bytes(payload).map_err(|_| Error::InvalidData("slice", "invalid layout"))
    }
}

impl<'a> Read<'a> for &'a str {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        let (_, payload) = reader.get_sequence::<u8>(false)?;
        std::str::from_utf8(payload).map_err(|_| Error::InvalidData("str", "invalid UTF-8"))
    }
}

impl<'a> Read<'a> for String {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        <&str>::read(reader).map(str::to_owned)
    }
}
