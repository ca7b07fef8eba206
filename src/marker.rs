//! Marker byte classification.
//!
//! ```text
//!  Marker       | Tail | Min Value              | Max Value
//! --------------+------+------------------------+------------------------
//!  [0000 xxxx]  | -    | reserved               |
//!  [0001 0lll]  | 8-l  | i64::MIN               | -2^13 - 2^6 - 1
//!  [0001 1xxx]  | -    | reserved               |
//!  [001x xxxx]  | 1    | -2^13 - 2^6            | -2^6 - 1
//!  [01xx xxxx]  | 0    | -2^6                   | -1
//!  [10xx xxxx]  | 0    | 0                      | 2^6 - 1
//!  [110x xxxx]  | 1    | 2^6                    | 2^13 + 2^6 - 1
//!  [1110 llll]  | l    | 2^13 + 2^6             | i64::MAX
//!  [1111 xxxx]  | -    | reserved (also l > 8)  |
//! ```

use crate::utils::getbits;

pub const NEG_MULTI_MARKER: u8 = 0x10;
pub const NEG_2BYTE_MARKER: u8 = 0x20;
pub const NEG_1BYTE_MARKER: u8 = 0x40;
pub const POS_1BYTE_MARKER: u8 = 0x80;
pub const POS_2BYTE_MARKER: u8 = 0xc0;
pub const POS_MULTI_MARKER: u8 = 0xe0;

/// Smallest value with a single-byte encoding.
pub const NEG_1BYTE_MIN: i64 = -(1 << 6);
/// Smallest value with a two-byte encoding.
pub const NEG_2BYTE_MIN: i64 = -(1 << 13) + NEG_1BYTE_MIN;
/// Largest value with a single-byte encoding.
pub const POS_1BYTE_MAX: i64 = (1 << 6) - 1;
/// Largest value with a two-byte encoding.
pub const POS_2BYTE_MAX: i64 = (1 << 13) + POS_1BYTE_MAX;

/// Longest possible tail of a multi-byte encoding.
pub const MAX_TAIL_LEN: usize = 8;
/// Longest possible encoding of any value.
pub const MAX_ENCODED_LEN: usize = 1 + MAX_TAIL_LEN;

/// Integer encoding categories, as selected by the marker byte.
///
/// Variants are declared in marker-byte order, which is also the order of the values they
/// cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Any byte the encoder never produces.
    Reserved,
    /// Negative value with a tail of the given length (1-8).
    NegMulti(u8),
    /// Negative value with one tail byte. Holds the upper 5 bits of the 13-bit offset.
    Neg2Byte(u8),
    /// Negative value held entirely in the marker. Holds the 6-bit offset from `NEG_1BYTE_MIN`.
    Neg1Byte(u8),
    /// Non-negative value held entirely in the marker.
    Pos1Byte(u8),
    /// Positive value with one tail byte. Holds the upper 5 bits of the 13-bit offset.
    Pos2Byte(u8),
    /// Positive value with a tail of the given length (0-8).
    PosMulti(u8),
}

impl Marker {
    /// Construct a marker from a single byte.
    pub fn from_u8(n: u8) -> Marker {
        let bits = n as u64;
        match n {
            0x00..=0x0f => Marker::Reserved,
            0x10..=0x17 => Marker::NegMulti(8 - getbits(bits, 4, 0) as u8),
            0x18..=0x1f => Marker::Reserved,
            0x20..=0x3f => Marker::Neg2Byte(getbits(bits, 5, 0) as u8),
            0x40..=0x7f => Marker::Neg1Byte(getbits(bits, 6, 0) as u8),
            0x80..=0xbf => Marker::Pos1Byte(getbits(bits, 6, 0) as u8),
            0xc0..=0xdf => Marker::Pos2Byte(getbits(bits, 5, 0) as u8),
            0xe0..=0xe8 => Marker::PosMulti(getbits(bits, 4, 0) as u8),
            0xe9..=0xff => Marker::Reserved,
        }
    }

    /// Converts a marker object into a single-byte representation.
    /// Assumes the content of the marker is already masked approprately, and that multi-byte
    /// tail lengths are in range.
    pub fn into_u8(self) -> u8 {
        match self {
            Marker::Reserved => 0x00,
            Marker::NegMulti(len) => NEG_MULTI_MARKER | (8 - len),
            Marker::Neg2Byte(hi) => NEG_2BYTE_MARKER | hi,
            Marker::Neg1Byte(off) => NEG_1BYTE_MARKER | off,
            Marker::Pos1Byte(val) => POS_1BYTE_MARKER | val,
            Marker::Pos2Byte(hi) => POS_2BYTE_MARKER | hi,
            Marker::PosMulti(len) => POS_MULTI_MARKER | len,
        }
    }

    /// Number of tail bytes following this marker.
    pub fn tail_len(&self) -> usize {
        match *self {
            Marker::Reserved => 0,
            Marker::NegMulti(len) | Marker::PosMulti(len) => len as usize,
            Marker::Neg2Byte(_) | Marker::Pos2Byte(_) => 1,
            Marker::Neg1Byte(_) | Marker::Pos1Byte(_) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Marker::Reserved => "Reserved",
            Marker::NegMulti(_) => "NegMulti",
            Marker::Neg2Byte(_) => "Neg2Byte",
            Marker::Neg1Byte(_) => "Neg1Byte",
            Marker::Pos1Byte(_) => "Pos1Byte",
            Marker::Pos2Byte(_) => "Pos2Byte",
            Marker::PosMulti(_) => "PosMulti",
        }
    }
}

impl From<u8> for Marker {
    fn from(val: u8) -> Marker {
        Marker::from_u8(val)
    }
}

impl From<Marker> for u8 {
    fn from(val: Marker) -> u8 {
        val.into_u8()
    }
}
