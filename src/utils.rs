/// Return the bits of `x` in the half-open range `[end, start)`, shifted down so that bit `end`
/// becomes bit 0. `getbits(x, 6, 0)` is the low 6 bits; `getbits(x, 13, 8)` is bits 8 through 12.
#[inline]
pub(crate) fn getbits(x: u64, start: u32, end: u32) -> u64 {
    debug_assert!(end <= start && start <= 64);
    let mask = 1u64.checked_shl(start).map_or(u64::MAX, |bit| bit - 1);
    (x & mask) >> end
}

/// Strip leading copies of `redundant` from a big-endian byte string, always keeping at least
/// one byte.
///
/// With `0xFF` this removes two's-complement sign extension; with `0x00` it removes leading zeros.
#[inline]
pub(crate) fn strip_leading(bytes: &[u8], redundant: u8) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != redundant)
        .unwrap_or_else(|| bytes.len().saturating_sub(1));
    &bytes[start..]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn getbits_low() {
        assert_eq!(getbits(0xFF, 6, 0), 0x3F);
        assert_eq!(getbits(0xFF, 4, 0), 0x0F);
        assert_eq!(getbits(0x1234, 8, 0), 0x34);
        assert_eq!(getbits(0, 8, 0), 0);
    }

    #[test]
    fn getbits_field() {
        // Bits 8..13 of a 13-bit offset
        assert_eq!(getbits(0x1FFF, 13, 8), 0x1F);
        assert_eq!(getbits(0x1234, 13, 8), 0x12);
        // Bits above `start` are dropped
        assert_eq!(getbits(0xFFFF, 13, 8), 0x1F);
        assert_eq!(getbits(0x0100, 13, 8), 0x01);
    }

    #[test]
    fn getbits_full_width() {
        assert_eq!(getbits(u64::MAX, 64, 0), u64::MAX);
        assert_eq!(getbits(u64::MAX, 64, 56), 0xFF);
        assert_eq!(getbits(u64::MAX, 0, 0), 0);
    }

    #[test]
    fn strip_sign_extension() {
        let raw = (-1_000_000i64).to_be_bytes();
        assert_eq!(strip_leading(&raw, 0xFF), &[0xF0, 0xBD, 0xC0]);
        let raw = (-1i64).to_be_bytes();
        assert_eq!(strip_leading(&raw, 0xFF), &[0xFF]);
        let raw = i64::MIN.to_be_bytes();
        assert_eq!(strip_leading(&raw, 0xFF), &raw[..]);
    }

    #[test]
    fn strip_zeros() {
        let raw = 0x0102u64.to_be_bytes();
        assert_eq!(strip_leading(&raw, 0x00), &[0x01, 0x02]);
        let raw = 0u64.to_be_bytes();
        assert_eq!(strip_leading(&raw, 0x00), &[0x00]);
        let raw = u64::MAX.to_be_bytes();
        assert_eq!(strip_leading(&raw, 0x00), &raw[..]);
        assert_eq!(strip_leading(&[], 0x00), &[] as &[u8]);
    }
}
