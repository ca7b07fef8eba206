//! Composite keys built from concatenated integer encodings.
//!
//! Because no encoding is a prefix of another, two packed buffers compare byte-wise exactly like
//! the integer tuples they hold compare field by field.

use log::debug;

use crate::error::{Error, Result};
use crate::integer::{decode, encode_vec, PackInt};
use crate::marker::Marker;

/// Builds a buffer of concatenated integer encodings.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Packer {
    buf: Vec<u8>,
}

impl Packer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create a packer whose buffer can hold `capacity` bytes without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append a signed 64-bit integer.
    pub fn push_i64(&mut self, v: i64) -> &mut Self {
        encode_vec(&mut self.buf, v);
        self
    }

    /// Append any supported integer, failing if it cannot be represented as an `i64`.
    pub fn push<T: PackInt>(&mut self, v: T) -> Result<&mut Self> {
        let v = v.to_packed()?;
        Ok(self.push_i64(v))
    }

    /// Append every field of another packer, as if each had been pushed here in turn.
    pub fn append(&mut self, other: &Packer) -> &mut Self {
        self.buf.extend_from_slice(&other.buf);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Drop all packed fields, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Extend<i64> for Packer {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for v in iter {
            self.push_i64(v);
        }
    }
}

impl From<Packer> for Vec<u8> {
    fn from(val: Packer) -> Vec<u8> {
        val.buf
    }
}

impl AsRef<[u8]> for Packer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

/// Reads integers back out of a buffer of concatenated encodings.
///
/// As an iterator, yields each decoded integer in turn. The first malformed field is yielded as
/// an error, after which the iterator returns `None`.
#[derive(Clone, Debug)]
pub struct Unpacker<'a> {
    data: &'a [u8],
    position: usize,
    errored: bool,
}

impl<'a> Unpacker<'a> {
    pub fn new(data: &'a [u8]) -> Unpacker<'a> {
        Self {
            data,
            position: 0,
            errored: false,
        }
    }

    /// Look at the marker of the next field without consuming it.
    pub fn peek_marker(&self) -> Option<Marker> {
        self.remaining().first().map(|n| Marker::from_u8(*n))
    }

    /// Decode the next field. On failure the cursor does not move.
    pub fn next_i64(&mut self) -> Result<i64> {
        match decode(self.remaining()) {
            Ok((v, used)) => {
                self.position += used;
                Ok(v)
            }
            Err(e) => {
                let kind = self.peek_marker().map_or("missing", |m| m.name());
                debug!(
                    "{} field at byte {} failed to decode: {}",
                    kind, self.position, e
                );
                Err(e)
            }
        }
    }

    /// Decode the next field and convert it into `T`. The cursor only moves if both steps
    /// succeed.
    pub fn next_as<T: PackInt>(&mut self) -> Result<T> {
        let (v, used) = decode(self.remaining())?;
        let v = T::from_packed(v)?;
        self.position += used;
        Ok(v)
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Verify every byte was consumed.
    pub fn finish(self) -> Result<()> {
        let left = self.data.len() - self.position;
        if left == 0 {
            Ok(())
        } else {
            Err(Error::BadEncode(format!(
                "{} trailing bytes after the last packed field",
                left
            )))
        }
    }
}

impl<'a> Iterator for Unpacker<'a> {
    type Item = Result<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.errored || self.is_empty() {
            return None;
        }
        let result = self.next_i64();
        if result.is_err() {
            self.errored = true;
        }
        Some(result)
    }
}

impl<'a> std::iter::FusedIterator for Unpacker<'a> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::integer::encode;
    use rand::Rng;

    #[test]
    fn pack_unpack() {
        let mut packer = Packer::new();
        packer.push_i64(5).push_i64(-5).push_i64(i64::MAX);
        packer.push(200u8).unwrap().push(-3i16).unwrap();
        let bytes = packer.into_vec();

        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(unpacker.next_i64().unwrap(), 5);
        assert_eq!(unpacker.position(), 1);
        assert_eq!(unpacker.next_i64().unwrap(), -5);
        assert_eq!(unpacker.next_i64().unwrap(), i64::MAX);
        assert_eq!(unpacker.next_as::<u8>().unwrap(), 200);
        assert_eq!(unpacker.next_as::<i16>().unwrap(), -3);
        assert!(unpacker.is_empty());
        unpacker.finish().unwrap();
    }

    #[test]
    fn matches_plain_concatenation() {
        let values = [0i64, -1, 64, -8257, 1 << 40];
        let mut packer = Packer::with_capacity(32);
        packer.extend(values.iter().copied());
        let expected: Vec<u8> = values.iter().flat_map(|v| encode(*v)).collect();
        assert_eq!(packer.as_bytes(), &expected[..]);
        assert_eq!(packer.len(), expected.len());
        packer.clear();
        assert!(packer.is_empty());

        let mut prefix = Packer::new();
        prefix.push_i64(values[0]).push_i64(values[1]);
        let mut suffix = Packer::new();
        suffix.extend(values[2..].iter().copied());
        prefix.append(&suffix);
        assert_eq!(prefix.into_vec(), expected);
    }

    #[test]
    fn iterate() {
        let mut packer = Packer::new();
        packer.extend(-3..3);
        let values: Result<Vec<i64>> = Unpacker::new(packer.as_ref()).collect();
        assert_eq!(values.unwrap(), vec![-3, -2, -1, 0, 1, 2]);
    }

    #[test]
    fn iterator_stops_on_error() {
        let mut bytes = encode(7);
        bytes.push(0x05); // reserved
        bytes.extend(encode(8));
        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(unpacker.next().unwrap().unwrap(), 7);
        assert_eq!(unpacker.next().unwrap(), Err(Error::ReservedMarker(0x05)));
        assert!(unpacker.next().is_none());
        assert_eq!(unpacker.position(), 1);
    }

    #[test]
    fn truncated_field() {
        let bytes = encode(1 << 30);
        let mut unpacker = Unpacker::new(&bytes[..3]);
        assert!(matches!(
            unpacker.next_i64(),
            Err(Error::LengthTooShort { .. })
        ));
        assert_eq!(unpacker.position(), 0);
        assert_eq!(unpacker.remaining(), &bytes[..3]);
    }

    #[test]
    fn next_as_out_of_range_does_not_advance() {
        let bytes = encode(300);
        let mut unpacker = Unpacker::new(&bytes);
        assert!(matches!(unpacker.next_as::<u8>(), Err(Error::OutOfRange(_))));
        assert_eq!(unpacker.position(), 0);
        assert_eq!(unpacker.next_as::<u16>().unwrap(), 300);
    }

    #[test]
    fn push_out_of_range() {
        let mut packer = Packer::new();
        assert!(matches!(packer.push(u64::MAX), Err(Error::OutOfRange(_))));
        assert!(packer.is_empty());
    }

    #[test]
    fn peek_and_finish() {
        let bytes = encode(-1000);
        let unpacker = Unpacker::new(&bytes);
        assert_eq!(unpacker.peek_marker(), Some(Marker::Neg2Byte(0x1c)));
        assert!(matches!(unpacker.finish(), Err(Error::BadEncode(_))));
        assert_eq!(Unpacker::new(&[]).peek_marker(), None);
    }

    #[test]
    fn tuple_order() {
        let mut rng = rand::thread_rng();
        let mut sample = || -> (i64, i64) {
            let shift = rng.gen_range(0u32..63);
            (rng.gen_range(-3..3), rng.gen::<i64>() >> shift)
        };
        for _ in 0..1000 {
            let (a, b) = (sample(), sample());
            let mut pa = Packer::new();
            pa.push_i64(a.0).push_i64(a.1);
            let mut pb = Packer::new();
            pb.push_i64(b.0).push_i64(b.1);
            assert_eq!(
                a.cmp(&b),
                pa.as_bytes().cmp(pb.as_bytes()),
                "{:?} vs {:?}",
                a,
                b
            );
        }
    }
}
