//! Append-only construction of a packed value buffer.
//!
//! # Rollback
//!
//! Every public append is all-or-nothing: if any nested write fails (allocation failure,
//! text overflow), the buffer is truncated back to the length it had before the call. The buffer
//! therefore only ever holds whole, well-formed encodings.
//!
//! # Overwrites
//!
//! A region returned by an append can later be rewritten in place with [SerialWriter::overwrite],
//! provided [SerialWriter::can_overwrite] holds. The region keeps its length, so no byte outside
//! of it ever moves and every other [Handle] stays valid.

use crate::{
    layout::{self, TEXT_SIZE_LEN, UNDEFINED},
    Config, Error, Handle, Scalar, SerialReader, Write,
};
use bytes::Bytes;
use std::{collections::TryReserveError, fmt, iter};
use tracing::{debug, trace};

/// Destination alignment for [SerialWriter::append_raw].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RawAlign {
    /// Copy at the current end of the buffer.
    #[default]
    None,
    /// Pad to the natural alignment (8, 4 or 2) of the source slice's address.
    ///
    /// Only meaningful within one process: the resulting layout depends on where the allocator
    /// placed the source.
    Source,
    /// Pad to the given power-of-two alignment.
    To(usize),
}

/// A growable buffer of packed values.
///
/// # Example
///
/// ```
/// use smithy_codec::SerialWriter;
///
/// let mut writer = SerialWriter::new();
/// let flag = writer.append(&true).unwrap();
/// let count = writer.append(&801u16).unwrap();
/// assert_eq!((flag.offset, count.offset), (0, 2));
///
/// let mut reader = writer.reader();
/// assert!(reader.next::<bool>());
/// assert_eq!(reader.next::<u16>(), 801);
/// ```
#[derive(Clone, Debug)]
pub struct SerialWriter {
    buf: Vec<u8>,
    poison: bool,
}

impl Default for SerialWriter {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

impl SerialWriter {
    /// Creates an empty writer with the default [Config].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_config(Config {
            capacity,
            ..Default::default()
        })
    }

    /// Creates an empty writer from `cfg`.
    pub fn from_config(cfg: Config) -> Self {
        Self {
            buf: Vec::with_capacity(cfg.capacity),
            poison: cfg.poison,
        }
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the bytes of a region.
    ///
    /// Panics if the handle is stale.
    pub fn get(&self, handle: Handle) -> &[u8] {
        &self.buf[handle.range()]
    }

    /// Appends the encoding of `value`.
    pub fn append<T: Write + ?Sized>(&mut self, value: &T) -> Result<Handle, Error> {
        let start = self.buf.len();
        let handle = self.transact(|writer| value.write(writer))?;
        debug_assert_eq!(
            self.buf.len() - start,
            value.encode_size(start),
            "encode_size() disagrees with write()"
        );
        trace!(shape = ?T::SHAPE, offset = handle.offset, length = handle.length, "appended");
        Ok(handle)
    }

    /// Appends formatted text as a `u8` sequence with a two-byte length.
    ///
    /// Fails with [Error::TextTooLong] if the rendered text exceeds 65535 bytes. The text can be
    /// read back as a `&str` or `String`.
    ///
    /// ```
    /// use smithy_codec::SerialWriter;
    ///
    /// let mut writer = SerialWriter::new();
    /// writer.append_formatted(format_args!("foo {}", 108)).unwrap();
    /// assert_eq!(writer.reader().next::<&str>(), "foo 108");
    /// ```
    pub fn append_formatted(&mut self, args: fmt::Arguments<'_>) -> Result<Handle, Error> {
        self.transact(|writer| writer.put_formatted(args))
    }

    /// Appends `bytes` verbatim, without any length prefix.
    pub fn append_raw(&mut self, bytes: &[u8], align: RawAlign) -> Result<Handle, Error> {
        let align = match align {
            RawAlign::None => 1,
            RawAlign::Source => layout::address_alignment(bytes.as_ptr() as usize),
            RawAlign::To(align) => {
                assert!(align.is_power_of_two(), "alignment {align} is not a power of two");
                align
            }
        };
        self.transact(|writer| {
            writer.pad(align)?;
            let handle = writer.reserve(bytes.len())?;
            writer.buf[handle.range()].copy_from_slice(bytes);
            Ok(handle)
        })
    }

    /// Removes the last `n` bytes.
    ///
    /// Panics if fewer than `n` bytes have been written.
    pub fn drop(&mut self, n: usize) {
        let len = self.buf.len();
        assert!(n <= len, "cannot drop {n} bytes from a buffer of {len}");
        self.buf.truncate(len - n);
        trace!(n, len = len - n, "dropped");
    }

    /// Overwrites a region with [UNDEFINED] so that later use of it stands out.
    ///
    /// Does nothing unless [Config::poison] is set (the default in debug builds).
    pub fn invalidate(&mut self, handle: Handle) {
        if !self.poison {
            return;
        }
        self.buf[handle.range()].fill(UNDEFINED);
        debug!(%handle, "invalidated");
    }

    /// Returns true if the region identified by `handle` can be rewritten with `value` without
    /// changing its length.
    ///
    /// Scalars and references must have the same size as the region. Sequences must encode to
    /// exactly the region's length when placed at its offset (header, count, padding, payload and
    /// sentinel included), which permits a different element count only when the header width
    /// compensates, and the region must start with a sequence header that fits inside it.
    /// Structs are never overwritable: overwrite their fields instead.
    pub fn can_overwrite<T: Write + ?Sized>(&self, handle: Handle, value: &T) -> bool {
        handle.end() <= self.buf.len() && value.can_overwrite(self, handle)
    }

    /// Rewrites the region identified by `handle` with `value`.
    ///
    /// The caller must have checked [SerialWriter::can_overwrite]; this is only re-checked in
    /// debug builds. Returns the handle of the rewritten region, which always equals `handle`.
    pub fn overwrite<T: Write + ?Sized>(&mut self, handle: Handle, value: &T) -> Handle {
        debug_assert!(
            self.can_overwrite(handle, value),
            "overwrite of {handle} without a matching can_overwrite"
        );
        let len = self.buf.len();
        value.overwrite(self, handle);
        debug_assert_eq!(self.buf.len(), len, "overwrite moved bytes outside {handle}");
        trace!(shape = ?T::SHAPE, %handle, "overwrote");
        handle
    }

    /// Returns a reader over the written bytes.
    pub fn reader(&self) -> SerialReader<'_> {
        SerialReader::new(&self.buf)
    }

    /// Consumes the writer, returning its buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Consumes the writer, returning its buffer as [Bytes].
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }

    /// Appends one aligned scalar image.
    #[doc(hidden)]
    pub fn put_scalar<T: Scalar>(&mut self, value: &T) -> Result<Handle, Error> {
        self.pad(T::ALIGN)?;
        let handle = self.reserve(T::SIZE)?;
        value.put(&mut self.buf[handle.range()]);
        Ok(handle)
    }

    /// Rewrites a scalar image in place.
    #[doc(hidden)]
    pub fn overwrite_scalar<T: Scalar>(&mut self, handle: Handle, value: &T) {
        assert_eq!(handle.length, T::SIZE, "scalar size mismatch for {handle}");
        value.put(&mut self.buf[handle.range()]);
    }

    /// Appends a size-prefixed run of elements, followed by `sentinel` if provided.
    #[doc(hidden)]
    pub fn put_sequence<T: Scalar>(
        &mut self,
        elems: &[T],
        sentinel: Option<&T>,
    ) -> Result<Handle, Error> {
        let start = self.buf.len();
        let count = elems.len() as u64;
        if T::SIZE == 0 && elems.len() > layout::MAX_ZERO_SIZED_COUNT {
            return Err(Error::LengthExceeded(count));
        }
        let (bytes, n) = layout::encode_count(count, layout::size_len(count));
        self.buf.try_reserve(1 + n)?;
        self.buf.push(n as u8);
        self.buf.extend_from_slice(&bytes[..n]);
        self.pad(T::ALIGN)?;

        let payload_len = elems
            .len()
            .checked_mul(T::SIZE)
            .ok_or(Error::LengthExceeded(count))?;
        let payload = self.reserve(payload_len)?;
        put_elems(&mut self.buf[payload.range()], elems);
        if let Some(sentinel) = sentinel {
            let tail = self.reserve(T::SIZE)?;
            sentinel.put(&mut self.buf[tail.range()]);
        }
        Ok(Handle::new(start, self.buf.len() - start))
    }

    /// Returns true if the region identified by `handle` holds a sequence header that can be
    /// replaced by one for `count` elements without changing the region's length.
    #[doc(hidden)]
    pub fn can_overwrite_sequence<T: Scalar>(
        &self,
        handle: Handle,
        count: usize,
        sentinel: bool,
    ) -> bool {
        if T::SIZE == 0 && count > layout::MAX_ZERO_SIZED_COUNT {
            return false;
        }
        if sequence_size::<T>(handle.offset, count, sentinel) != handle.length {
            return false;
        }
        let Some(&size_len) = self.buf.get(handle.offset) else {
            return false;
        };
        if size_len > layout::MAX_SIZE_LEN {
            return false;
        }
        let header = sequence_header::<T>(handle.offset, size_len as usize);
        header + usize::from(sentinel) * T::SIZE <= handle.length
    }

    /// Rewrites a sequence region in place.
    ///
    /// The header (size byte, count bytes and alignment padding) is spliced first, since its
    /// width may change with the new count; the payload is then resized by the opposite amount
    /// and rewritten, leaving the region's total length unchanged.
    #[doc(hidden)]
    pub fn overwrite_sequence<T: Scalar>(
        &mut self,
        handle: Handle,
        elems: &[T],
        sentinel: Option<&T>,
    ) {
        let offset = handle.offset;
        let old_size_len = self.buf[offset];
        assert!(
            old_size_len <= layout::MAX_SIZE_LEN,
            "{handle} does not hold a sequence header"
        );
        let old_header = sequence_header::<T>(offset, old_size_len as usize);
        assert!(old_header <= handle.length, "{handle} does not hold a sequence header");

        let count = elems.len() as u64;
        let (bytes, n) = layout::encode_count(count, layout::size_len(count));
        let new_header = sequence_header::<T>(offset, n);
        let header = iter::once(n as u8)
            .chain(bytes[..n].iter().copied())
            .chain(iter::repeat(UNDEFINED).take(new_header - 1 - n));
        if old_header == new_header {
            for (dst, byte) in self.buf[offset..offset + new_header].iter_mut().zip(header) {
                *dst = byte;
            }
        } else {
            drop(self.buf.splice(offset..offset + old_header, header));
            let start = offset + new_header;
            let old_payload = handle.length - old_header;
            let new_payload = handle.length - new_header;
            drop(self.buf.splice(
                start..start + old_payload,
                iter::repeat(UNDEFINED).take(new_payload),
            ));
        }

        let region = &mut self.buf[offset + new_header..handle.end()];
        let (body, tail) = region.split_at_mut(elems.len() * T::SIZE);
        put_elems(body, elems);
        if let Some(sentinel) = sentinel {
            sentinel.put(tail);
        }
    }

    /// Runs `f`, truncating the buffer back to its current length if it fails.
    fn transact<F>(&mut self, f: F) -> Result<Handle, Error>
    where
        F: FnOnce(&mut Self) -> Result<Handle, Error>,
    {
        let start = self.buf.len();
        let result = f(self);
        if let Err(err) = &result {
            debug!(len = start, written = self.buf.len() - start, ?err, "rolled back append");
            self.buf.truncate(start);
        }
        result
    }

    /// Pads with [UNDEFINED] up to a multiple of `align`.
    fn pad(&mut self, align: usize) -> Result<(), Error> {
        let n = layout::padding(self.buf.len(), align);
        if n > 0 {
            self.buf.try_reserve(n)?;
            self.buf.resize(self.buf.len() + n, UNDEFINED);
        }
        Ok(())
    }

    /// Grows the buffer by `n` bytes of [UNDEFINED], returning the new region.
    fn reserve(&mut self, n: usize) -> Result<Handle, Error> {
        self.buf.try_reserve(n)?;
        let offset = self.buf.len();
        self.buf.resize(offset + n, UNDEFINED);
        Ok(Handle::new(offset, n))
    }

    fn put_formatted(&mut self, args: fmt::Arguments<'_>) -> Result<Handle, Error> {
        let start = self.buf.len();
        self.buf.try_reserve(1 + TEXT_SIZE_LEN as usize)?;
        self.buf.push(TEXT_SIZE_LEN);
        self.buf.extend_from_slice(&[0; TEXT_SIZE_LEN as usize]);

        let mut sink = TextSink {
            buf: &mut self.buf,
            written: 0,
            alloc: None,
        };
        if fmt::Write::write_fmt(&mut sink, args).is_err() {
            return Err(sink.alloc.map_or(Error::Format, Error::Alloc));
        }
        let written = sink.written;
        let Ok(len) = u16::try_from(written) else {
            debug!(written, "formatted text exceeds length prefix");
            return Err(Error::TextTooLong(written));
        };

        let (bytes, n) = layout::encode_count(u64::from(len), TEXT_SIZE_LEN);
        self.buf[start + 1..start + 1 + n].copy_from_slice(&bytes[..n]);
        Ok(Handle::new(start, self.buf.len() - start))
    }
}

/// Copies element images back to back into `dst`.
fn put_elems<T: Scalar>(dst: &mut [u8], elems: &[T]) {
    if T::SIZE == 0 {
        return;
    }
    for (elem, chunk) in elems.iter().zip(dst.chunks_exact_mut(T::SIZE)) {
        elem.put(chunk);
    }
}

/// Returns the length of a sequence header (size byte, count bytes and padding) with `size_len`
/// count bytes, starting at `offset`.
fn sequence_header<T: Scalar>(offset: usize, size_len: usize) -> usize {
    1 + size_len + layout::padding(offset + 1 + size_len, T::ALIGN)
}

/// Returns the number of bytes a sequence of `count` elements occupies when its header starts
/// at `offset`.
pub(crate) fn sequence_size<T: Scalar>(offset: usize, count: usize, sentinel: bool) -> usize {
    let header = layout::header_len(count as u64);
    let padding = layout::padding(offset + header, T::ALIGN);
    header + padding + (count + usize::from(sentinel)) * T::SIZE
}

/// Streams formatted text into the buffer, counting (but no longer storing) anything past the
/// length limit.
struct TextSink<'a> {
    buf: &'a mut Vec<u8>,
    written: usize,
    alloc: Option<TryReserveError>,
}

impl fmt::Write for TextSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.written += s.len();
        if self.written > usize::from(u16::MAX) {
            return Ok(());
        }
        if let Err(err) = self.buf.try_reserve(s.len()) {
            self.alloc = Some(err);
            return Err(fmt::Error);
        }
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
