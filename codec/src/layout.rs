//! Alignment and length-prefix arithmetic shared by the writer and the reader.
//!
//! A sequence starts with a one-byte header holding `size_len`, the number of bytes that follow
//! to represent the element count. Counts are stored in native byte order using only as many
//! bytes as needed:
//!
//! | count | size_len |
//! |---|---|
//! | 0 | 0 |
//! | 1..=255 | 1 |
//! | 256..=65535 | 2 |
//! | 65536..=2^24-1 | 3 |
//!
//! and so on, up to 8 bytes for a full `u64`.

/// Fill byte for padding, unused payloads and invalidated regions.
pub const UNDEFINED: u8 = 0xAA;

/// Largest valid `size_len`.
pub const MAX_SIZE_LEN: u8 = 8;

/// `size_len` used by formatted text, whose length is always stored in two bytes.
pub const TEXT_SIZE_LEN: u8 = 2;

/// Largest element count accepted for a sequence of zero-sized elements.
///
/// Such a sequence has no payload, so its count is not bounded by the length of the buffer.
pub const MAX_ZERO_SIZED_COUNT: usize = 1 << 16;

/// Returns the number of padding bytes needed to move `offset` to a multiple of `align`.
#[inline]
pub const fn padding(offset: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    offset.next_multiple_of(align) - offset
}

/// Returns the number of bytes used to represent `count`.
#[inline]
pub const fn size_len(count: u64) -> u8 {
    let bits = u64::BITS - count.leading_zeros();
    bits.div_ceil(8) as u8
}

/// Returns the length of a sequence header (size byte plus count bytes) for `count` elements.
#[inline]
pub const fn header_len(count: u64) -> usize {
    1 + size_len(count) as usize
}

/// Encodes the low `size_len` bytes of `count` in native byte order.
///
/// Returns the backing array and the number of meaningful bytes at its front.
pub fn encode_count(count: u64, size_len: u8) -> ([u8; 8], usize) {
    let len = size_len as usize;
    debug_assert!(len <= MAX_SIZE_LEN as usize);
    debug_assert!(len == 8 || count >> (len * 8) == 0, "count does not fit in size_len");
    let mut out = [0u8; 8];
    if cfg!(target_endian = "little") {
        out[..len].copy_from_slice(&count.to_le_bytes()[..len]);
    } else {
        out[..len].copy_from_slice(&count.to_be_bytes()[8 - len..]);
    }
    (out, len)
}

/// Decodes a count stored in `bytes.len()` (at most 8) native-order bytes, zero-extending it.
pub fn decode_count(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    debug_assert!(len <= MAX_SIZE_LEN as usize);
    let mut full = [0u8; 8];
    if cfg!(target_endian = "little") {
        full[..len].copy_from_slice(bytes);
        u64::from_le_bytes(full)
    } else {
        full[8 - len..].copy_from_slice(bytes);
        u64::from_be_bytes(full)
    }
}

/// Returns the natural alignment (8, 4, 2 or 1) of a memory address.
#[inline]
pub const fn address_alignment(address: usize) -> usize {
    if address % 8 == 0 {
        8
    } else if address % 4 == 0 {
        4
    } else if address % 2 == 0 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(padding(0, 8), 0);
        assert_eq!(padding(3, 2), 1);
        assert_eq!(padding(6, 4), 2);
        assert_eq!(padding(9, 8), 7);
        assert_eq!(padding(17, 1), 0);
    }

    #[test]
    fn test_size_len_boundaries() {
        // bits(0) = 0, bits(1) = 1, bits(255) = 8, bits(256) = 9, bits(65535) = 16,
        // bits(65536) = 17; size_len = ceil(bits / 8).
        let cases = [
            (0u64, 0u8),
            (1, 1),
            (255, 1),
            (256, 2),
            (65535, 2),
            (65536, 3),
            ((1 << 24) - 1, 3),
            (1 << 24, 4),
            (u32::MAX as u64, 4),
            (u32::MAX as u64 + 1, 5),
            (u64::MAX, 8),
        ];
        for (count, expected) in cases {
            assert_eq!(size_len(count), expected, "count {count}");
            assert_eq!(header_len(count), 1 + expected as usize);
        }
    }

    #[test]
    fn test_count_round_trip() {
        for count in [0u64, 1, 2, 255, 256, 801, 65535, 65536, 1 << 40, u64::MAX] {
            let (bytes, len) = encode_count(count, size_len(count));
            assert_eq!(len, size_len(count) as usize);
            assert_eq!(decode_count(&bytes[..len]), count);
        }
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_count_low_bytes_first() {
        let (bytes, len) = encode_count(801, 2);
        assert_eq!(&bytes[..len], &[0x21, 0x03]);
        let (bytes, len) = encode_count(7, TEXT_SIZE_LEN);
        assert_eq!(&bytes[..len], &[0x07, 0x00]);
    }

    #[test]
    fn test_wider_than_needed() {
        // A count may be stored with more bytes than it needs (formatted text always uses two).
        let (bytes, len) = encode_count(7, 2);
        assert_eq!(decode_count(&bytes[..len]), 7);
    }

    #[test]
    fn test_address_alignment() {
        assert_eq!(address_alignment(0x1000), 8);
        assert_eq!(address_alignment(0x1004), 4);
        assert_eq!(address_alignment(0x1002), 2);
        assert_eq!(address_alignment(0x1001), 1);
    }
}
