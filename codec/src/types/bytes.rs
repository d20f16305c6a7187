//! [Bytes], encoded as a `u8` sequence.

use crate::{Error, Read, SerialReader};
use bytes::Bytes;

forward_write!([] Bytes => [u8]);

impl<'a> Read<'a> for Bytes {
    #[inline]
    fn read(reader: &mut SerialReader<'a>) -> Result<Self, Error> {
        <&[u8]>::read(reader).map(Bytes::copy_from_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SerialWriter;

    #[test]
    fn test_bytes() {
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0; 300]),
        ];
        let mut writer = SerialWriter::new();
        for value in &values {
            writer.append(value).unwrap();
        }
        let mut reader = writer.reader();
        for value in values {
            assert_eq!(reader.next::<Bytes>(), value);
        }
    }

    #[test]
    fn test_matches_slice_encoding() {
        let mut a = SerialWriter::new();
        a.append(&Bytes::from_static(b"abc")).unwrap();
        let mut b = SerialWriter::new();
        b.append(&b"abc"[..]).unwrap();
        assert_eq!(a.into_bytes(), b.into_vec());
    }
}
