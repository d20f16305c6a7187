//! Core codec traits.
//!
//! Every encodable type resolves, at compile time, to one [Shape]. The writer and reader
//! never inspect values at runtime to decide how to lay them out: the trait implementation a
//! type picks up _is_ its layout.

use crate::{Error, Handle, SerialReader, SerialWriter};

/// Byte layout class of an encodable type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// One aligned, verbatim copy of a fixed-size image.
    Scalar,
    /// The pointee of a single-item reference, laid out as a [Shape::Scalar].
    Pointer,
    /// A size-prefixed run of scalar elements, optionally followed by a sentinel element.
    Sequence { sentinel: bool },
    /// Fields encoded back to back, in declaration order.
    Struct,
}

/// Types encoded as one aligned copy of a fixed-size image.
///
/// Implemented for primitives, `Option<T>` and `[T; N]` over scalars, and for user types
/// declared with [crate::scalar!] or `#[serial(scalar)]`. References, boxes, sequences and
/// structs never implement it, which is what keeps out-of-buffer references out of aggregates.
///
/// An optional reference does not compile:
///
/// ```compile_fail
/// let mut writer = smithy_codec::SerialWriter::new();
/// writer.append(&Some(&1u32)).unwrap();
/// ```
///
/// Nor does an array of references:
///
/// ```compile_fail
/// let mut writer = smithy_codec::SerialWriter::new();
/// writer.append(&[&1u32, &2u32]).unwrap();
/// ```
///
/// Nor a reference to a reference:
///
/// ```compile_fail
/// let mut writer = smithy_codec::SerialWriter::new();
/// let value = 1u32;
/// let inner = &value;
/// writer.append(&&inner).unwrap();
/// ```
///
/// Nor a reference to a struct:
///
/// ```compile_fail
/// use smithy_codec::{Serial, SerialWriter};
///
/// #[derive(Serial)]
/// struct Entry {
///     id: u32,
/// }
///
/// let entry = Entry { id: 7 };
/// let mut writer = SerialWriter::new();
/// writer.append(&&entry).unwrap();
/// ```
///
/// Nor a sequence of sequences:
///
/// ```compile_fail
/// let mut writer = smithy_codec::SerialWriter::new();
/// writer.append(&vec![String::from("a")]).unwrap();
/// ```
pub trait Scalar: Sized {
    /// Length of the image in bytes.
    const SIZE: usize;

    /// Alignment of the image. Always a power of two.
    const ALIGN: usize;

    /// Copies the image into `dst`, which is exactly [Scalar::SIZE] bytes long.
    fn put(&self, dst: &mut [u8]);

    /// Reconstructs a value from exactly [Scalar::SIZE] bytes.
    ///
    /// Returns an error if the bytes are not a valid image (e.g. a `bool` that is neither 0
    /// nor 1).
    fn get(src: &[u8]) -> Result<Self, Error>;

    /// Returns the number of bytes the image occupies when written at `offset`, leading
    /// padding included.
    #[inline]
    fn size_at(offset: usize) -> usize {
        crate::layout::padding(offset, Self::ALIGN) + Self::SIZE
    }
}

/// Scalars with a declared terminator value.
pub trait Sentinel: Scalar + PartialEq {
    /// The element that follows the logical end of a terminated run.
    const SENTINEL: Self;
}

/// Types that can be appended to a [SerialWriter].
pub trait Write {
    /// Layout class of the encoding.
    const SHAPE: Shape;

    /// Appends the encoding of this value, returning the region it occupies.
    ///
    /// Leading alignment padding is not part of the returned [Handle]. Implementations do not
    /// need to clean up on failure: [SerialWriter::append] rolls the buffer back.
    fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error>;

    /// Returns the number of bytes [Write::write] appends when the writer holds `offset` bytes,
    /// padding included.
    ///
    /// This method MUST agree exactly with [Write::write].
    fn encode_size(&self, offset: usize) -> usize;

    /// Returns true if `handle`, produced by writing a value of this type to `writer`, can be
    /// rewritten in place with this value without changing its length.
    fn can_overwrite(&self, writer: &SerialWriter, handle: Handle) -> bool {
        let _ = (writer, handle);
        false
    }

    /// Rewrites the region identified by `handle` with this value.
    ///
    /// Callers MUST have checked [Write::can_overwrite] first.
    fn overwrite(&self, writer: &mut SerialWriter, handle: Handle) {
        let _ = writer;
        panic!(
            "{} regions cannot be overwritten (handle {handle})",
            std::any::type_name::<Self>()
        );
    }
}

/// Types that can be decoded from a [SerialReader] whose backing slice lives for `'a`.
pub trait Read<'a>: Sized {
    /// Decodes a value, advancing the reader past it.
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error>;
}
