//! Serialization into order-preserving keys.
//!
//! Every leaf becomes one packed integer, so a derived `Serialize` type turns into a composite key
//! whose byte order follows the type's field order:
//! - Integers are packed directly. `u64`, `u128`, and `i128` must fit in an `i64`.
//! - `bool` is 0 or 1, `char` is its scalar value.
//! - Unit and unit structs write nothing. Newtype structs write their content.
//! - `None` is 0; `Some(v)` is 1 followed by `v`.
//! - Tuples, tuple structs, and structs write their fields in order, with no framing.
//! - Sequences write their element count, then the elements.
//! - Enum variants write the variant index, then the variant's content.
//!
//! Floats, strings, byte strings, and maps have no integer form and fail to serialize.

use serde::ser::*;

use crate::error::{Error, Result};
use crate::packer::Packer;
use crate::PackInt;

/// Serialize a value into an order-preserving key.
pub fn to_key<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut ser = KeySerializer::default();
    value.serialize(&mut ser)?;
    Ok(ser.packer.into_vec())
}

#[derive(Default)]
struct KeySerializer {
    packer: Packer,
}

impl KeySerializer {
    fn encode_int<T: PackInt>(&mut self, v: T) -> Result<()> {
        self.packer.push(v)?;
        Ok(())
    }

    fn unsupported(kind: &str) -> Error {
        Error::SerdeFail(format!("{} cannot be encoded in an integer key", kind))
    }
}

impl<'a> Serializer for &'a mut KeySerializer {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.encode_int(v as u8)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.encode_int(v)
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(KeySerializer::unsupported("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(KeySerializer::unsupported("f64"))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.encode_int(v as u32)
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(KeySerializer::unsupported("A string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(KeySerializer::unsupported("A byte string"))
    }

    fn serialize_none(self) -> Result<()> {
        self.encode_int(0u8)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, v: &T) -> Result<()> {
        self.encode_int(1u8)?;
        v.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.encode_int(variant_index)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        v: &T,
    ) -> Result<()> {
        v.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.encode_int(variant_index)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer::new(self, len))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        self.encode_int(variant_index)?;
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(KeySerializer::unsupported("A map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        self.encode_int(variant_index)?;
        Ok(self)
    }
}

impl<'a> SerializeTuple for &'a mut KeySerializer {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeTupleStruct for &'a mut KeySerializer {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeTupleVariant for &'a mut KeySerializer {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeStruct for &'a mut KeySerializer {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeStructVariant for &'a mut KeySerializer {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Sequences are length-prefixed. When the length isn't known up front, the elements are
/// packed into a side buffer and copied in behind the count once it is.
struct SeqSerializer<'a> {
    se: &'a mut KeySerializer,
    len: Option<usize>,
    count: usize,
    deferred: KeySerializer,
}

impl<'a> SeqSerializer<'a> {
    fn new(se: &'a mut KeySerializer, len: Option<usize>) -> Self {
        Self {
            se,
            len,
            count: 0,
            deferred: KeySerializer::default(),
        }
    }
}

impl<'a> SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        if let Some(len) = self.len {
            if self.count == 0 {
                self.se.encode_int(len)?;
            }
            if self.count >= len {
                return Err(Error::SerdeFail(format!(
                    "sequence declared {} elements but had more",
                    len
                )));
            }
            value.serialize(&mut *self.se)?;
        } else {
            value.serialize(&mut self.deferred)?;
        }
        self.count += 1;
        Ok(())
    }

    fn end(self) -> Result<()> {
        match self.len {
            Some(len) if len != self.count => Err(Error::SerdeFail(format!(
                "sequence declared {} elements but had {}",
                len, self.count
            ))),
            // The count hasn't been written yet if there were no elements
            Some(_) if self.count == 0 => self.se.encode_int(0usize),
            Some(_) => Ok(()),
            None => {
                self.se.encode_int(self.count)?;
                self.se.packer.append(&self.deferred.packer);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::integer::encode;
    use serde::Serialize;

    fn concat(values: &[i64]) -> Vec<u8> {
        values.iter().flat_map(|v| encode(*v)).collect()
    }

    #[derive(Serialize)]
    struct IndexKey {
        table: u32,
        column: i16,
        row: i64,
    }

    #[derive(Serialize)]
    struct Wrapper(i32);

    #[derive(Serialize)]
    struct Unit;

    #[derive(Serialize)]
    enum Event {
        Start,
        Move(i64, i64),
        Stop { at: u8 },
        Tag(i8),
    }

    #[test]
    fn integers() {
        assert_eq!(to_key(&5u8).unwrap(), encode(5));
        assert_eq!(to_key(&-5i64).unwrap(), encode(-5));
        assert_eq!(to_key(&(i64::MAX as u64)).unwrap(), encode(i64::MAX));
        assert_eq!(to_key(&-1i128).unwrap(), encode(-1));
    }

    #[test]
    fn integers_out_of_range() {
        assert!(matches!(to_key(&u64::MAX), Err(Error::OutOfRange(_))));
        assert!(matches!(to_key(&i128::MIN), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn bool_and_char() {
        assert_eq!(to_key(&false).unwrap(), encode(0));
        assert_eq!(to_key(&true).unwrap(), encode(1));
        assert_eq!(to_key(&'a').unwrap(), encode(97));
    }

    #[test]
    fn structs_and_tuples() {
        let key = IndexKey {
            table: 3,
            column: -2,
            row: 1 << 33,
        };
        assert_eq!(to_key(&key).unwrap(), concat(&[3, -2, 1 << 33]));
        assert_eq!(to_key(&(1u8, -1i32, 100i64)).unwrap(), concat(&[1, -1, 100]));
        assert_eq!(to_key(&Wrapper(-9000)).unwrap(), encode(-9000));
        assert!(to_key(&Unit).unwrap().is_empty());
        assert!(to_key(&()).unwrap().is_empty());
    }

    #[test]
    fn options() {
        assert_eq!(to_key(&None::<i64>).unwrap(), concat(&[0]));
        assert_eq!(to_key(&Some(-70i64)).unwrap(), concat(&[1, -70]));
        assert!(to_key(&None::<i64>).unwrap() < to_key(&Some(i64::MIN)).unwrap());
    }

    #[test]
    fn enums() {
        assert_eq!(to_key(&Event::Start).unwrap(), concat(&[0]));
        assert_eq!(to_key(&Event::Move(4, -4)).unwrap(), concat(&[1, 4, -4]));
        assert_eq!(to_key(&Event::Stop { at: 9 }).unwrap(), concat(&[2, 9]));
        assert_eq!(to_key(&Event::Tag(-1)).unwrap(), concat(&[3, -1]));
    }

    #[test]
    fn sequences() {
        assert_eq!(to_key(&vec![7i64, 8, 9]).unwrap(), concat(&[3, 7, 8, 9]));
        assert_eq!(to_key(&Vec::<i64>::new()).unwrap(), concat(&[0]));
        assert_eq!(to_key(&[1u8, 2]).unwrap(), concat(&[1, 2]));
    }

    #[test]
    fn unknown_length_sequence() {
        struct Odd(Vec<i64>);
        impl Serialize for Odd {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq(self.0.iter().filter(|v| *v % 2 != 0))
            }
        }
        assert_eq!(to_key(&Odd(vec![1, 2, 3, 4, 5])).unwrap(), concat(&[3, 1, 3, 5]));
        assert_eq!(to_key(&Odd(vec![2, 4])).unwrap(), concat(&[0]));
    }

    #[test]
    fn unsupported() {
        assert!(matches!(to_key(&1.5f64), Err(Error::SerdeFail(_))));
        assert!(matches!(to_key("text"), Err(Error::SerdeFail(_))));
        let mut map = std::collections::BTreeMap::new();
        map.insert(1i64, 2i64);
        assert!(matches!(to_key(&map), Err(Error::SerdeFail(_))));
    }

    #[test]
    fn key_order_follows_fields() {
        let keys = [
            (-5i64, 3u8),
            (-5, 200),
            (0, 0),
            (0, 1),
            (64, 0),
            (1 << 40, 0),
        ];
        for pair in keys.windows(2) {
            assert!(to_key(&pair[0]).unwrap() < to_key(&pair[1]).unwrap());
        }
    }
}
