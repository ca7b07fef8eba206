//! Deserialization from order-preserving keys.
//!
//! The inverse of the key serializer. Keys carry no type information, so the target type drives
//! decoding and `deserialize_any` is unsupported.

use log::trace;
use serde::de::Error as DeError;
use serde::de::*;

use crate::error::{Error, Result};
use crate::packer::Unpacker;
use crate::PackInt;

/// Deserialize a value from an order-preserving key. The entire key must be consumed.
pub fn from_key<'de, T: Deserialize<'de>>(buf: &'de [u8]) -> Result<T> {
    let mut de = KeyDeserializer::new(buf);
    let value = T::deserialize(&mut de)?;
    if !de.unpacker.is_empty() {
        trace!(
            "key has {} bytes left after deserializing {}",
            de.unpacker.remaining().len(),
            std::any::type_name::<T>()
        );
    }
    de.unpacker.finish()?;
    Ok(value)
}

struct KeyDeserializer<'de> {
    unpacker: Unpacker<'de>,
}

impl<'de> KeyDeserializer<'de> {
    fn new(buf: &'de [u8]) -> Self {
        Self {
            unpacker: Unpacker::new(buf),
        }
    }

    fn next_int<T: PackInt>(&mut self) -> Result<T> {
        self.unpacker.next_as()
    }

    fn next_tag(&mut self, what: &str) -> Result<bool> {
        match self.next_int::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::SerdeFail(format!("invalid {} tag {}", what, v))),
        }
    }
}

impl<'de, 'a> serde::Deserializer<'de> for &'a mut KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::SerdeFail(
            "integer keys are not self-describing; the type must be known".to_string(),
        ))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.next_tag("bool")?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.next_int()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.next_int()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.next_int()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.next_int()?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i128(self.next_int()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.next_int()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.next_int()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.next_int()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.next_int()?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u128(self.next_int()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v: u32 = self.next_int()?;
        let c = char::from_u32(v)
            .ok_or_else(|| Error::invalid_value(Unexpected::Unsigned(v as u64), &"a char"))?;
        visitor.visit_char(c)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.next_tag("option")? {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len: usize = self.next_int()?;
        visitor.visit_seq(SeqAccess::new(self, len))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqAccess::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqAccess::new(self, len))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqAccess::new(self, fields.len()))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(EnumAccess::new(self))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.next_int()?)
    }

    fn is_human_readable(&self) -> bool {
        false
    }

    serde::forward_to_deserialize_any! {
        f32 f64 str string bytes byte_buf map ignored_any
    }
}

struct EnumAccess<'a, 'de> {
    de: &'a mut KeyDeserializer<'de>,
}

impl<'a, 'de> EnumAccess<'a, 'de> {
    fn new(de: &'a mut KeyDeserializer<'de>) -> Self {
        Self { de }
    }
}

impl<'a, 'de> serde::de::EnumAccess<'de> for EnumAccess<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let index: u32 = self.de.next_int()?;
        let val = seed.deserialize(IntoDeserializer::<'de, Error>::into_deserializer(index))?;
        Ok((val, self))
    }
}

impl<'a, 'de> serde::de::VariantAccess<'de> for EnumAccess<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SeqAccess::new(self.de, fields.len()))
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SeqAccess::new(self.de, len))
    }
}

struct SeqAccess<'a, 'de> {
    de: &'a mut KeyDeserializer<'de>,
    size_left: usize,
}

impl<'a, 'de> SeqAccess<'a, 'de> {
    fn new(de: &'a mut KeyDeserializer<'de>, len: usize) -> Self {
        Self { de, size_left: len }
    }
}

impl<'a, 'de> serde::de::SeqAccess<'de> for SeqAccess<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if self.size_left > 0 {
            self.size_left -= 1;
            let val = seed.deserialize(&mut *self.de)?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }

    fn size_hint(&self) -> Option<usize> {
        // Each element takes at least one byte, so never promise more than could be present
        Some(self.size_left.min(self.de.unpacker.remaining().len()))
    }
}
