//! Single-item references, encoded as their pointee.
//!
//! Only references to scalars are encodable: a reference to anything else would have to be
//! followed into memory the buffer does not own.

use crate::{Error, Handle, Read, Scalar, SerialReader, SerialWriter, Shape, Write};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

macro_rules! impl_pointer {
    ([$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*> Write for $ty {
            const SHAPE: Shape = Shape::Pointer;

            #[inline]
            fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error> {
                writer.put_scalar::<T>(self)
            }

            #[inline]
            fn encode_size(&self, offset: usize) -> usize {
                T::size_at(offset)
            }

            #[inline]
            fn can_overwrite(&self, _: &SerialWriter, handle: Handle) -> bool {
                handle.length == T::SIZE
            }

            #[inline]
            fn overwrite(&self, writer: &mut SerialWriter, handle: Handle) {
                writer.overwrite_scalar::<T>(handle, self)
            }
        }
    };
}

impl_pointer!([T: Scalar] &T);
impl_pointer!([T: Scalar] &mut T);
impl_pointer!([T: Scalar] Box<T>);

impl<'a, T: Scalar> Read<'a> for Box<T> {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        reader.get_scalar().map(Box::new)
    }
}

/// Borrows the pointee straight out of the buffer.
impl<'a, T> Read<'a> for &'a T
where
    T: Scalar + FromBytes + Unaligned + Immutable + KnownLayout,
{
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        let bytes = reader.take(T::SIZE)?;
        T::ref_from_bytes(bytes).map_err(|_| Error::InvalidData("reference", "invalid layout"))
    }
}
