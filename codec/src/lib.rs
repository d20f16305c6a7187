//! Pack values into a compact, alignment-aware binary buffer.
//!
//! # Overview
//!
//! Values are appended to a [SerialWriter] and decoded, in the same order, by a [SerialReader].
//! Every append returns a [Handle], the exact byte range the value occupies, which can later be
//! used to read the region back, rewrite it in place, or poison it.
//!
//! The layout of a value is decided entirely by its type, which resolves to one [Shape]:
//!
//! - **Scalar**: one verbatim copy of the in-memory image, after padding up to the type's natural
//!   alignment. Primitives, `Option<T>`, `[T; N]` and user types declared with [scalar!] or
//!   `#[serial(scalar)]`.
//! - **Pointer**: a `&T`, `&mut T` or `Box<T>` to a scalar, laid out exactly like its pointee.
//! - **Sequence**: a one-byte count width, the element count in that many bytes, padding up to the
//!   element alignment, then the elements. Slices, vectors, strings, [Bytes](bytes::Bytes), and
//!   sentinel-terminated runs ([Terminated], C strings), which append one terminator element.
//! - **Struct**: fields encoded back to back in declaration order, each aligned on its own.
//!   Tuples and structs deriving [Serial].
//!
//! Multi-byte values use the byte order of the host. Padding and unused bytes are filled with
//! [layout::UNDEFINED] (`0xAA`).
//!
//! # Example
//!
//! ```
//! use smithy_codec::{Handle, Serial, SerialWriter};
//!
//! #[derive(Serial, Debug, PartialEq)]
//! struct Entry<'a> {
//!     id: u32,
//!     name: &'a str,
//!     scores: Vec<u16>,
//! }
//!
//! let entry = Entry { id: 7, name: "smithy", scores: vec![3, 1, 4] };
//! let mut writer = SerialWriter::new();
//! assert_eq!(writer.append(&entry).unwrap(), Handle::new(0, 20));
//!
//! // Rewrite a sequence in place: same count, so the region keeps its length.
//! let scores = writer.append(&[3u16, 1, 4][..]).unwrap();
//! assert!(writer.can_overwrite(scores, &[2u16, 7, 1][..]));
//! writer.overwrite(scores, &[2u16, 7, 1][..]);
//!
//! let mut reader = writer.reader();
//! assert_eq!(reader.next::<Entry>(), entry);
//! assert_eq!(reader.next::<Vec<u16>>(), vec![2, 7, 1]);
//! ```
//!
//! # Trust
//!
//! [SerialReader::try_next] validates everything it decodes (count widths, lengths against the
//! remaining input, `bool`/`char`/enum images, UTF-8) and never panics on malformed input.
//! Sequences of zero-sized elements carry no payload, so their count is capped at
//! [layout::MAX_ZERO_SIZED_COUNT] instead.
//! [SerialReader::next] is the convenience form for buffers produced by the same build, and panics
//! instead.

// Lets the derive macro refer to this crate as `::smithy_codec` from within its own tests.
extern crate self as smithy_codec;

mod codec;
mod config;
mod error;
mod handle;
pub mod layout;
mod reader;
pub mod types;
mod writer;

pub use codec::{Read, Scalar, Sentinel, Shape, Write};
pub use config::Config;
pub use error::Error;
pub use handle::Handle;
pub use reader::SerialReader;
pub use smithy_codec_derive::Serial;
pub use types::terminated::Terminated;
pub use writer::{RawAlign, SerialWriter};

#[doc(hidden)]
pub mod __private {
    pub use zerocopy;
}
