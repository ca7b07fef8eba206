use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};
use crate::marker::*;
use crate::utils::{getbits, strip_leading};

/// Encode an integer, appending it to a byte vector.
pub fn encode_vec(buf: &mut Vec<u8>, v: i64) {
    let mut raw = [0u8; 8];
    if v < NEG_2BYTE_MIN {
        BigEndian::write_i64(&mut raw, v);
        let tail = strip_leading(&raw, 0xff);
        buf.push(Marker::NegMulti(tail.len() as u8).into());
        buf.extend_from_slice(tail);
    } else if v < NEG_1BYTE_MIN {
        let off = (v - NEG_2BYTE_MIN) as u64;
        buf.push(Marker::Neg2Byte(getbits(off, 13, 8) as u8).into());
        buf.push(getbits(off, 8, 0) as u8);
    } else if v < 0 {
        let off = (v - NEG_1BYTE_MIN) as u64;
        buf.push(Marker::Neg1Byte(getbits(off, 6, 0) as u8).into());
    } else if v <= POS_1BYTE_MAX {
        buf.push(Marker::Pos1Byte(getbits(v as u64, 6, 0) as u8).into());
    } else if v <= POS_2BYTE_MAX {
        let off = (v - (POS_1BYTE_MAX + 1)) as u64;
        buf.push(Marker::Pos2Byte(getbits(off, 13, 8) as u8).into());
        buf.push(getbits(off, 8, 0) as u8);
    } else {
        // Cannot overflow: v > POS_2BYTE_MAX, so the offset is non-negative.
        BigEndian::write_u64(&mut raw, (v - (POS_2BYTE_MAX + 1)) as u64);
        let tail = strip_leading(&raw, 0x00);
        buf.push(Marker::PosMulti(tail.len() as u8).into());
        buf.extend_from_slice(tail);
    }
}

/// Encode an integer into a new byte vector.
pub fn encode(v: i64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(v));
    encode_vec(&mut buf, v);
    buf
}

/// The number of bytes [`encode`] produces for a value, without encoding it.
pub fn encoded_len(v: i64) -> usize {
    if v < NEG_2BYTE_MIN {
        // Each fully-set leading byte is sign extension
        let redundant = ((!v) as u64).leading_zeros() as usize / 8;
        1 + MAX_TAIL_LEN - redundant.min(MAX_TAIL_LEN - 1)
    } else if v < NEG_1BYTE_MIN {
        2
    } else if v <= POS_1BYTE_MAX {
        1
    } else if v <= POS_2BYTE_MAX {
        2
    } else {
        let off = (v - (POS_2BYTE_MAX + 1)) as u64;
        let redundant = off.leading_zeros() as usize / 8;
        1 + MAX_TAIL_LEN - redundant.min(MAX_TAIL_LEN - 1)
    }
}

/// Decode one integer from the front of a buffer.
///
/// Returns the value and the number of bytes consumed. Bytes past the encoded integer are left
/// untouched, so a buffer of concatenated integers can be walked by advancing past each one.
///
/// Fails if the buffer ends before the marker's declared tail, if the marker byte is reserved,
/// or if the bytes are not exactly what [`encode`] would have produced for the value.
pub fn decode(buf: &[u8]) -> Result<(i64, usize)> {
    let (&first, rest) = buf.split_first().ok_or(Error::LengthTooShort {
        step: "decode marker",
        actual: 0,
        expected: 1,
    })?;
    let marker = Marker::from_u8(first);
    let len = marker.tail_len();
    if rest.len() < len {
        return Err(Error::LengthTooShort {
            step: tail_step(&marker),
            actual: rest.len(),
            expected: len,
        });
    }
    let tail = &rest[..len];

    let v = match marker {
        Marker::Reserved => return Err(Error::ReservedMarker(first)),
        Marker::NegMulti(_) => decode_neg_multi(tail)?,
        Marker::Neg2Byte(hi) => NEG_2BYTE_MIN + (((hi as i64) << 8) | tail[0] as i64),
        Marker::Neg1Byte(off) => NEG_1BYTE_MIN + off as i64,
        Marker::Pos1Byte(val) => val as i64,
        Marker::Pos2Byte(hi) => (POS_1BYTE_MAX + 1) + (((hi as i64) << 8) | tail[0] as i64),
        Marker::PosMulti(_) => decode_pos_multi(tail)?,
    };
    Ok((v, 1 + len))
}

/// Decode one integer starting at `offset` within a buffer.
///
/// Equivalent to `decode(&buf[offset..])`, except that an offset at or past the end of the
/// buffer is reported as truncated input instead of panicking.
pub fn decode_at(buf: &[u8], offset: usize) -> Result<(i64, usize)> {
    match buf.get(offset..) {
        Some(rest) => decode(rest),
        None => Err(Error::LengthTooShort {
            step: "decode marker",
            actual: 0,
            expected: 1,
        }),
    }
}

fn tail_step(marker: &Marker) -> &'static str {
    match marker {
        Marker::NegMulti(_) => "decode NegMulti tail",
        Marker::Neg2Byte(_) => "decode Neg2Byte tail",
        Marker::Pos2Byte(_) => "decode Pos2Byte tail",
        Marker::PosMulti(_) => "decode PosMulti tail",
        _ => "decode tail",
    }
}

fn decode_neg_multi(tail: &[u8]) -> Result<i64> {
    let len = tail.len();
    if tail[0] == 0xff {
        return Err(Error::BadEncode(format!(
            "Got NegMulti with {} tail bytes and a leading 0xff. This is not the shortest encoding.",
            len
        )));
    }
    let raw = BigEndian::read_uint(tail, len);
    if len == MAX_TAIL_LEN && getbits(raw, 64, 63) == 0 {
        return Err(Error::OutOfRange(format!(
            "NegMulti tail 0x{:016x} is below i64::MIN",
            raw
        )));
    }
    // Sign-extend. A full 8-byte tail already carries its own sign bit.
    let v = (raw | u64::MAX.checked_shl(8 * len as u32).unwrap_or(0)) as i64;
    if v >= NEG_2BYTE_MIN {
        return Err(Error::BadEncode(format!(
            "Got NegMulti with value = {}. This is not the shortest encoding.",
            v
        )));
    }
    Ok(v)
}

fn decode_pos_multi(tail: &[u8]) -> Result<i64> {
    let len = tail.len();
    if len > 1 && tail[0] == 0x00 {
        return Err(Error::BadEncode(format!(
            "Got PosMulti with {} tail bytes and a leading 0x00. This is not the shortest encoding.",
            len
        )));
    }
    // An empty tail is the legacy form of the smallest multi-byte value.
    let raw = if len == 0 { 0 } else { BigEndian::read_uint(tail, len) };
    i64::try_from(raw)
        .ok()
        .and_then(|off| off.checked_add(POS_2BYTE_MAX + 1))
        .ok_or_else(|| Error::OutOfRange(format!("PosMulti offset {} is above i64::MAX", raw)))
}

/// Integer types that can be carried by the codec.
///
/// Every value passes through `i64`; conversions that would lose information fail with
/// [`Error::OutOfRange`] rather than wrapping.
pub trait PackInt: Copy {
    /// Convert into the codec's value domain.
    fn to_packed(self) -> Result<i64>;
    /// Convert a decoded value back into this type.
    fn from_packed(v: i64) -> Result<Self>;
}

macro_rules! impl_pack_int {
    ($t: ty) => {
        impl PackInt for $t {
            #[inline]
            fn to_packed(self) -> Result<i64> {
                i64::try_from(self).map_err(|_| {
                    Error::OutOfRange(format!(
                        "{} ({}) does not fit in a signed 64-bit integer",
                        self,
                        stringify!($t)
                    ))
                })
            }

            #[inline]
            fn from_packed(v: i64) -> Result<Self> {
                <$t>::try_from(v).map_err(|_| {
                    Error::OutOfRange(format!("{} does not fit in {}", v, stringify!($t)))
                })
            }
        }
    };
}

impl_pack_int!(u8);
impl_pack_int!(u16);
impl_pack_int!(u32);
impl_pack_int!(u64);
impl_pack_int!(usize);
impl_pack_int!(u128);
impl_pack_int!(i8);
impl_pack_int!(i16);
impl_pack_int!(i32);
impl_pack_int!(i64);
impl_pack_int!(isize);
impl_pack_int!(i128);
