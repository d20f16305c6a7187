//! Codec implementations for common types.

// Implements `Write` for a type by dereferencing to another that already does.
macro_rules! forward_write {
    ([$($generics:tt)*] $ty:ty => $target:ty) => {
        impl<$($generics)*> $crate::Write for $ty {
            const SHAPE: $crate::Shape = <$target as $crate::Write>::SHAPE;

            #[inline]
            fn write(
                &self,
                writer: &mut $crate::SerialWriter,
            ) -> Result<$crate::Handle, $crate::Error> {
                <$target as $crate::Write>::write(self, writer)
            }

            #[inline]
            fn encode_size(&self, offset: usize) -> usize {
                <$target as $crate::Write>::encode_size(self, offset)
            }

            #[inline]
            fn can_overwrite(&self, writer: &$crate::SerialWriter, handle: $crate::Handle) -> bool {
                <$target as $crate::Write>::can_overwrite(self, writer, handle)
            }

            #[inline]
            fn overwrite(&self, writer: &mut $crate::SerialWriter, handle: $crate::Handle) {
                <$target as $crate::Write>::overwrite(self, writer, handle)
            }
        }
    };
}

pub mod bytes;
pub mod pointer;
pub mod primitives;
pub mod terminated;
pub mod tuple;
pub mod vec;
