//! Sentinel-terminated runs.
//!
//! A terminated run is written as a sequence of its logical elements (the count excludes the
//! sentinel) followed by one sentinel element, so the encoded payload can be handed to code that
//! scans for the terminator instead of reading the count.

use crate::{
    reader::get_elems, writer::sequence_size, Error, Handle, Read, Scalar, Sentinel,
    SerialReader, SerialWriter, Shape, Write,
};
use std::{
    borrow::Cow,
    ffi::{CStr, CString},
};

/// Elements up to (and excluding) their terminating [Sentinel::SENTINEL].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terminated<'a, T: Clone> {
    elems: Cow<'a, [T]>,
}

impl<'a, T: Sentinel + Clone> Terminated<'a, T> {
    /// Borrows the logical elements of `run`, which must contain a sentinel.
    ///
    /// Returns `None` if no sentinel is found.
    ///
    /// ```
    /// use smithy_codec::Terminated;
    ///
    /// let name = Terminated::scan(&[0x68u16, 0x69, 0, 0x21][..]).unwrap();
    /// assert_eq!(name.as_slice(), &[0x68, 0x69]);
    /// ```
    pub fn scan(run: &'a [T]) -> Option<Self> {
        let end = run.iter().position(|elem| *elem == T::SENTINEL)?;
        Some(Self {
            elems: Cow::Borrowed(&run[..end]),
        })
    }

    /// Takes ownership of `elems`, which must not contain the sentinel.
    ///
    /// Returns `None` if a sentinel is found.
    pub fn from_vec(elems: Vec<T>) -> Option<Self> {
        if elems.contains(&T::SENTINEL) {
            return None;
        }
        Some(Self {
            elems: Cow::Owned(elems),
        })
    }

    /// Returns the logical elements.
    pub fn as_slice(&self) -> &[T] {
        &self.elems
    }

    /// Returns the number of logical elements.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns true if the run holds only its sentinel.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Detaches the run from the slice it was scanned from.
    pub fn into_owned(self) -> Terminated<'static, T> {
        Terminated {
            elems: Cow::Owned(self.elems.into_owned()),
        }
    }
}

impl<T: Sentinel + Clone> Write for Terminated<'_, T> {
    const SHAPE: Shape = Shape::Sequence { sentinel: true };

    fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error> {
        writer.put_sequence(self.as_slice(), Some(&T::SENTINEL))
    }

    fn encode_size(&self, offset: usize) -> usize {
        sequence_size::<T>(offset, self.elems.len(), true)
    }

    fn can_overwrite(&self, writer: &SerialWriter, handle: Handle) -> bool {
        writer.can_overwrite_sequence::<T>(handle, self.elems.len(), true)
    }

    fn overwrite(&self, writer: &mut SerialWriter, handle: Handle) {
        writer.overwrite_sequence(handle, self.as_slice(), Some(&T::SENTINEL))
    }
}

impl<'a, T: Sentinel + Clone> Read<'a> for Terminated<'a, T> {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        let (count, payload) = reader.get_sequence::<T>(true)?;
        let elems = get_elems(count, payload)?;
        if elems.contains(&T::SENTINEL) {
            return Err(Error::InvalidData("Terminated", "sentinel before end"));
        }
        Ok(Self {
            elems: Cow::Owned(elems),
        })
    }
}

impl Write for CStr {
    const SHAPE: Shape = Shape::Sequence { sentinel: true };

    fn write(&self, writer: &mut SerialWriter) -> Result<Handle, Error> {
        writer.put_sequence(self.to_bytes(), Some(&0u8))
    }

    fn encode_size(&self, offset: usize) -> usize {
        sequence_size::<u8>(offset, self.to_bytes().len(), true)
    }

    fn can_overwrite(&self, writer: &SerialWriter, handle: Handle) -> bool {
        writer.can_overwrite_sequence::<u8>(handle, self.to_bytes().len(), true)
    }

    fn overwrite(&self, writer: &mut SerialWriter, handle: Handle) {
        writer.overwrite_sequence(handle, self.to_bytes(), Some(&0u8))
    }
}

forward_write!([] &CStr => CStr);
forward_write!([] CString => CStr);

/// Borrows the string, terminator included, straight out of the buffer.
impl<'a> Read<'a> for &'a CStr {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        let count = reader.get_count()?;
        let len = count
            .checked_add(1)
            .ok_or(Error::LengthExceeded(count as u64))?;
        let bytes = reader.take(len)?;
        CStr::from_bytes_with_nul(bytes).map_err(|_| Error::InvalidData("CStr", "misplaced nul"))
    }
}

impl<'a> Read<'a> for CString {
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        <&CStr>::read(reader).map(CStr::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan() {
        let run = [3u32, 4, 0, 5];
        let terminated = Terminated::scan(&run).unwrap();
        assert_eq!(terminated.as_slice(), &[3, 4]);
        assert_eq!(terminated.len(), 2);
        assert!(Terminated::scan(&[1u32, 2][..]).is_none());
        assert!(Terminated::from_vec(vec![1u8, 0]).is_none());
    }

    #[test]
    fn test_round_trip() {
        let mut writer = SerialWriter::new();
        writer.append(&1u8).unwrap();
        let run = Terminated::from_vec(vec!['a', 'b', 'ç']).unwrap();
        let handle = writer.append(&run).unwrap();
        // Header at 1 and 2, padded to 4, three chars and a nul char.
        assert_eq!(handle, Handle::new(1, 3 + 4 * 4));
        assert_eq!(&writer.as_slice()[16..20], &0u32.to_ne_bytes());

        let mut reader = writer.reader();
        reader.next::<u8>();
        assert_eq!(reader.next::<Terminated<char>>(), run);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_empty_run() {
        let mut writer = SerialWriter::new();
        let handle = writer.append(&Terminated::<u8>::scan(&[0]).unwrap()).unwrap();
        assert_eq!(writer.get(handle), &[0, 0]);
        assert!(writer.reader().next::<Terminated<u8>>().is_empty());
    }

    #[test]
    fn test_embedded_sentinel_rejected() {
        // Count 2, elements [7, 0], sentinel 0.
        let mut reader = SerialReader::new(&[1, 2, 7, 0, 0]);
        assert_eq!(
            reader.try_next::<Terminated<u8>>(),
            Err(Error::InvalidData("Terminated", "sentinel before end"))
        );
    }

    #[test]
    fn test_c_strings() {
        let owned = CString::new("smithy").unwrap();
        let mut writer = SerialWriter::new();
        let handle = writer.append(&owned).unwrap();
        assert_eq!(writer.get(handle), b"\x01\x06smithy\0");
        writer.append(c"").unwrap();

        let mut reader = writer.reader();
        assert_eq!(reader.next::<&CStr>(), owned.as_c_str());
        assert_eq!(reader.next::<CString>(), CString::default());
    }

    #[test]
    fn test_c_string_missing_nul() {
        let mut reader = SerialReader::new(b"\x01\x02hi!");
        assert_eq!(
            reader.try_next::<&CStr>(),
            Err(Error::InvalidData("CStr", "misplaced nul"))
        );
    }

    #[test]
    fn test_terminated_overwrite() {
        let mut writer = SerialWriter::new();
        let handle = writer
            .append(&Terminated::from_vec(vec![1u16, 2]).unwrap())
            .unwrap();
        let replacement = Terminated::from_vec(vec![3u16, 4]).unwrap();
        assert!(writer.can_overwrite(handle, &replacement));
        assert!(!writer.can_overwrite(handle, &Terminated::from_vec(vec![3u16]).unwrap()));
        writer.overwrite(handle, &replacement);
        assert_eq!(writer.reader().next::<Terminated<u16>>(), replacement);
    }
}
