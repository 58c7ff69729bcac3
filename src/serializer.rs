use std::fmt;
use std::str;

use serde::ser::{Error as SerdeError, Impossible, Serialize, Serializer};

use crate::error::{new_invalid_field, Error};

/// Render a single value as the text of one CSV field, appending it to
/// `out`.
///
/// Only scalars have a field representation. Sequences, tuples, maps,
/// structs and enum variants carrying more than one value are rejected with
/// `ErrorKind::InvalidField`, and `out` may have been partially written.
pub fn serialize_field<T: ?Sized + Serialize>(
    value: &T,
    out: &mut String,
) -> Result<(), Error> {
    value.serialize(&mut SeField { out })
}

struct SeField<'w> {
    out: &'w mut String,
}

impl<'w> SeField<'w> {
    fn write(&mut self, text: &str) -> Result<(), Error> {
        self.out.push_str(text);
        Ok(())
    }

    fn reject<T>(&self, what: &str) -> Result<T, Error> {
        Err(Error::custom(format_args!(
            "cannot serialize {} as a single field",
            what
        )))
    }
}

macro_rules! serialize_int {
    ($($method:ident: $ty:ty),*) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                self.write(itoa::Buffer::new().format(v))
            }
        )*
    };
}

impl<'a, 'w> Serializer for &'a mut SeField<'w> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        if v {
            self.write("true")
        } else {
            self.write("false")
        }
    }

    serialize_int!(
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128
    );

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        self.write(ryu::Buffer::new().format(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        self.write(ryu::Buffer::new().format(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        self.write(v.encode_utf8(&mut [0; 4]))
    }

    fn serialize_str(self, value: &str) -> Result<Self::Ok, Self::Error> {
        self.write(value)
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok, Self::Error> {
        match str::from_utf8(value) {
            Ok(text) => self.write(text),
            Err(err) => Err(Error::custom(format_args!(
                "field bytes are not valid UTF-8: {}",
                err
            ))),
        }
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(
        self,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_unit_struct(
        self,
        name: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.write(name)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.write(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_seq(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeSeq, Self::Error> {
        self.reject("a sequence")
    }

    fn serialize_tuple(
        self,
        _len: usize,
    ) -> Result<Self::SerializeTuple, Self::Error> {
        self.reject("a tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.reject(&format!("tuple struct {}", name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.reject(&format!("enum tuple variant {}::{}", name, variant))
    }

    fn serialize_map(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeMap, Self::Error> {
        self.reject("a map")
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.reject(&format!("struct {}", name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.reject(&format!("enum struct variant {}::{}", name, variant))
    }
}

impl SerdeError for Error {
    fn custom<T: fmt::Display>(msg: T) -> Error {
        new_invalid_field(msg)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use crate::error::{Error, ErrorKind};

    use super::serialize_field;

    fn serialize<S: Serialize>(s: S) -> String {
        let mut out = String::new();
        serialize_field(&s, &mut out).unwrap();
        out
    }

    fn serialize_err<S: Serialize>(s: S) -> Error {
        let mut out = String::new();
        serialize_field(&s, &mut out).unwrap_err()
    }

    fn assert_invalid(err: Error, contains: &str) {
        match *err.kind() {
            ErrorKind::InvalidField { pos: None, ref msg } => {
                assert!(msg.contains(contains), "{:?}", msg);
            }
            ref x => panic!("expected InvalidField but got '{:?}'", x),
        }
    }

    #[test]
    fn bool() {
        assert_eq!(serialize(true), "true");
        assert_eq!(serialize(false), "false");
    }

    #[test]
    fn integer() {
        assert_eq!(serialize(12345), "12345");
        assert_eq!(serialize(-7i8), "-7");
        assert_eq!(serialize(u64::max_value()), "18446744073709551615");
        assert_eq!(serialize(i128::min_value()).len(), 40);
    }

    #[test]
    fn float() {
        assert_eq!(serialize(1.23), "1.23");
        assert_eq!(serialize(2.0f32), "2.0");
    }

    #[test]
    fn char() {
        assert_eq!(serialize('☃'), "☃");
    }

    #[test]
    fn str_is_not_escaped_here() {
        assert_eq!(serialize("how\nare \"you\"?"), "how\nare \"you\"?");
    }

    #[test]
    fn bytes() {
        struct Raw(&'static [u8]);

        impl Serialize for Raw {
            fn serialize<S: serde::Serializer>(
                &self,
                s: S,
            ) -> Result<S::Ok, S::Error> {
                s.serialize_bytes(self.0)
            }
        }

        assert_eq!(serialize(Raw(b"abc")), "abc");
        assert_invalid(serialize_err(Raw(b"\xFF")), "UTF-8");
    }

    #[test]
    fn option() {
        assert_eq!(serialize(None::<i32>), "");
        assert_eq!(serialize(Some(5)), "5");
    }

    #[test]
    fn unit() {
        assert_eq!(serialize(()), "");
    }

    #[test]
    fn struct_unit() {
        #[derive(Serialize)]
        struct Foo;

        assert_eq!(serialize(Foo), "Foo");
    }

    #[test]
    fn struct_newtype() {
        #[derive(Serialize)]
        struct Foo(f64);

        assert_eq!(serialize(Foo(1.5)), "1.5");
    }

    #[test]
    fn enum_units() {
        #[derive(Serialize)]
        enum Wat {
            Foo,
            Bar,
        }

        assert_eq!(serialize(Wat::Foo), "Foo");
        assert_eq!(serialize(Wat::Bar), "Bar");
    }

    #[test]
    fn enum_newtypes() {
        #[derive(Serialize)]
        enum Wat {
            Foo(i32),
            Baz(bool),
        }

        assert_eq!(serialize(Wat::Foo(5)), "5");
        assert_eq!(serialize(Wat::Baz(true)), "true");
    }

    #[test]
    fn seq() {
        assert_invalid(serialize_err(vec![1, 2, 3]), "sequence");
    }

    #[test]
    fn tuple() {
        assert_invalid(serialize_err((true, 1.5)), "tuple");
    }

    #[test]
    fn map() {
        let mut map = BTreeMap::new();
        map.insert("k", "v");
        assert_invalid(serialize_err(map), "map");
    }

    #[test]
    fn struct_fields() {
        #[derive(Serialize)]
        struct Foo {
            x: bool,
        }

        assert_invalid(serialize_err(Foo { x: true }), "struct Foo");
    }

    #[test]
    fn enum_struct_variant() {
        #[derive(Serialize)]
        enum Foo {
            X { a: bool },
        }

        assert_invalid(serialize_err(Foo::X { a: false }), "Foo::X");
    }
}
