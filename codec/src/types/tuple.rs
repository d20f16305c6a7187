//! Tuples, encoded as structs whose fields are the tuple elements.

use crate::{Error, Handle, Read, SerialReader, SerialWriter, Shape, Write};
use paste::paste;

macro_rules! impl_codec_for_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<$( [<T $index>]: Write ),*> Write for ( $( [<T $index>], )* ) {
                const SHAPE: Shape = Shape::Struct;

                #[inline]
                fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error> {
                    let span = Handle::EMPTY;
                    $( let span = span.join(Write::write(&self.$index, writer)?); )*
                    Ok(span)
                }

                #[inline]
                fn encode_size(&self, offset: usize) -> usize {
                    let end = offset;
                    $( let end = end + Write::encode_size(&self.$index, end); )*
                    end - offset
                }
            }

            impl<'a, $( [<T $index>]: Read<'a> ),*> Read<'a> for ( $( [<T $index>], )* ) {
                #[inline]
                fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
                    Ok(( $( <[<T $index>] as Read<'a>>::read(reader)?, )* ))
                }
            }
        }
    };
}

// Generate implementations for tuple sizes 1 through 8
impl_codec_for_tuple!(0);
impl_codec_for_tuple!(0, 1);
impl_codec_for_tuple!(0, 1, 2);
impl_codec_for_tuple!(0, 1, 2, 3);
impl_codec_for_tuple!(0, 1, 2, 3, 4);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
