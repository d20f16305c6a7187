//! Scalar codecs for primitives, `Option<T>` and fixed-size arrays.
//!
//! A scalar is written as one verbatim copy of its in-memory image, preceded by padding up to its
//! natural alignment. Decoding validates the image (a `bool` must be 0 or 1, a `char` must be a
//! valid code point) before producing a value.

use crate::{layout::UNDEFINED, Error, Scalar, Sentinel};

/// Implements [crate::Write] and [crate::Read] for a [Scalar].
#[doc(hidden)]
#[macro_export]
macro_rules! __scalar_codec {
    ([$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*> $crate::Write for $ty {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar;

            #[inline]
            fn write(
                &self,
                writer: &mut $crate::SerialWriter,
            ) -> Result<$crate::Handle, $crate::Error> {
                writer.put_scalar(self)
            }

            #[inline]
            fn encode_size(&self, offset: usize) -> usize {
                <Self as $crate::Scalar>::size_at(offset)
            }

            #[inline]
            fn can_overwrite(&self, _: &$crate::SerialWriter, handle: $crate::Handle) -> bool {
                handle.length == <Self as $crate::Scalar>::SIZE
            }

            #[inline]
            fn overwrite(&self, writer: &mut $crate::SerialWriter, handle: $crate::Handle) {
                writer.overwrite_scalar(handle, self)
            }
        }

        impl<'__de, $($generics)*> $crate::Read<'__de> for $ty {
            #[inline]
            fn read(reader: &mut $crate::SerialReader<'__de>) -> Result<Self, $crate::Error> {
                reader.get_scalar()
            }
        }
    };
}

/// Declares types as scalars: encoded as one aligned copy of their in-memory image.
///
/// Each type must implement zerocopy's `IntoBytes`, `TryFromBytes` and `Immutable`, which
/// guarantee that the image has no padding bytes and that decoding rejects invalid bit
/// patterns.
///
/// # Example
///
/// ```
/// use smithy_codec::{scalar, SerialWriter};
/// use zerocopy::{Immutable, IntoBytes, KnownLayout, TryFromBytes};
///
/// #[derive(Clone, Copy, Debug, PartialEq, IntoBytes, TryFromBytes, Immutable, KnownLayout)]
/// #[repr(C)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// scalar!(Point);
///
/// let mut writer = SerialWriter::new();
/// writer.append(&Point { x: 1, y: -1 }).unwrap();
/// assert_eq!(writer.reader().next::<Point>(), Point { x: 1, y: -1 });
/// ```
#[macro_export]
macro_rules! scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Scalar for $ty {
                const SIZE: usize = ::core::mem::size_of::<$ty>();
                const ALIGN: usize = ::core::mem::align_of::<$ty>();

                #[inline]
                fn put(&self, dst: &mut [u8]) {
                    dst.copy_from_slice($crate::__private::zerocopy::IntoBytes::as_bytes(self));
                }

                #[inline]
                fn get(src: &[u8]) -> Result<Self, $crate::Error> {
                    <$ty as $crate::__private::zerocopy::TryFromBytes>::try_read_from_bytes(src)
                        .map_err(|_| $crate::Error::InvalidData(stringify!($ty), "invalid image"))
                }
            }

            $crate::__scalar_codec!([] $ty);
        )+
    };
}

scalar!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64
);

macro_rules! impl_sentinel {
    ($($ty:ty),+) => {
        $(
            impl Sentinel for $ty {
                const SENTINEL: Self = 0;
            }
        )+
    };
}

impl_sentinel!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Sentinel for char {
    const SENTINEL: Self = '\0';
}

/// The payload image, then a presence flag, then padding to the payload's alignment.
///
/// An absent payload is filled with [UNDEFINED].
impl<T: Scalar> Scalar for Option<T> {
    const SIZE: usize = (T::SIZE + 1).next_multiple_of(T::ALIGN);
    const ALIGN: usize = T::ALIGN;

    fn put(&self, dst: &mut [u8]) {
        let (payload, rest) = dst.split_at_mut(T::SIZE);
        match self {
            Some(value) => {
                value.put(payload);
                rest[0] = 1;
            }
            None => {
                payload.fill(UNDEFINED);
                rest[0] = 0;
            }
        }
        rest[1..].fill(UNDEFINED);
    }

    fn get(src: &[u8]) -> Result<Self, Error> {
        let (payload, rest) = src.split_at(T::SIZE);
        match rest[0] {
            0 => Ok(None),
            1 => T::get(payload).map(Some),
            _ => Err(Error::InvalidData("Option", "invalid presence flag")),
        }
    }
}

crate::__scalar_codec!([T: Scalar] Option<T>);

/// Elements back to back. Element sizes are multiples of their alignment, so no padding is
/// needed between them.
impl<T: Scalar, const N: usize> Scalar for [T; N] {
    const SIZE: usize = T::SIZE * N;
    const ALIGN: usize = T::ALIGN;

    fn put(&self, dst: &mut [u8]) {
        if T::SIZE == 0 {
            return;
        }
        for (elem, chunk) in self.iter().zip(dst.chunks_exact_mut(T::SIZE)) {
            elem.put(chunk);
        }
    }

    fn get(src: &[u8]) -> Result<Self, Error> {
        let elems = crate::reader::get_elems::<T>(N, src)?;
        elems
            .try_into()
            .map_err(|_| Error::InvalidData("array", "length mismatch"))
    }
}

crate::__scalar_codec!([T: Scalar, const N: usize] [T; N]);
