//! Bounded pre-pass over a `Serialize` payload.
//!
//! Converting a payload into a `serde_json::Value` recurses once per level
//! of nesting. This pass walks the same `Serialize` calls but stops at a
//! fixed depth, so a pathologically deep payload is rejected before the
//! unbounded conversion ever starts.

use std::fmt::Display;

use serde::{Serialize, ser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NestingError {
    #[error("more than {0} nested containers")]
    TooDeep(usize),
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for NestingError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Fails with [`NestingError::TooDeep`] once `data` holds more than `limit`
/// sequences, maps or structs inside one another.
pub fn check<T: Serialize + ?Sized>(data: &T, limit: usize) -> Result<(), NestingError> {
    data.serialize(&mut Nesting { limit, depth: 0 })
}

struct Nesting {
    limit: usize,
    depth: usize,
}

impl Nesting {
    fn enter(&mut self) -> Result<&mut Self, NestingError> {
        self.depth += 1;
        if self.depth > self.limit {
            return Err(NestingError::TooDeep(self.limit));
        }
        Ok(self)
    }

    fn leave(&mut self) -> Result<(), NestingError> {
        self.depth -= 1;
        Ok(())
    }
}

impl<'a> ser::Serializer for &'a mut Nesting {
    type Ok = ();
    type Error = NestingError;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_f32(self, _: f32) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_f64(self, _: f64) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_char(self, _: char) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), NestingError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), NestingError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), NestingError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), NestingError> {
        let this = self.enter()?;
        value.serialize(&mut *this)?;
        this.leave()
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, NestingError> {
        self.enter()
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, NestingError> {
        self.enter()
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, NestingError> {
        self.enter()
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, NestingError> {
        self.enter()
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, NestingError> {
        self.enter()
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, NestingError> {
        self.enter()
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, NestingError> {
        self.enter()
    }
}

impl ser::SerializeSeq for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

impl ser::SerializeTuple for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

impl ser::SerializeTupleStruct for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

impl ser::SerializeTupleVariant for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

impl ser::SerializeMap for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), NestingError> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

impl ser::SerializeStruct for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

impl ser::SerializeStructVariant for &mut Nesting {
    type Ok = ();
    type Error = NestingError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), NestingError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NestingError> {
        self.leave()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn counts_containers() {
        let value = json!({"a": [{"b": [1]}]});
        assert!(check(&value, 4).is_ok());
        assert!(matches!(check(&value, 3), Err(NestingError::TooDeep(3))));
        assert!(check(&"scalar", 0).is_ok());
    }

    #[test]
    fn siblings_do_not_add_up() {
        let value = json!([[1], [2], [3], {"x": [4]}]);
        assert!(check(&value, 3).is_ok());
    }
}
