//! Hand-written codecs exercising every evolution step described in `AdtMetadata`: there is no
//! derive macro in this crate, so each version below drives `AdtSerializer`/`AdtDeserializer`
//! directly, the way a generated impl would.

use evobin::adt::{AdtDeserializer, AdtMetadata, AdtSerializer};
use evobin::{
    BinaryDeserializer, BinaryOutput, BinarySerializer, DeserializationContext, Evolution, Result,
    SerializationContext,
};
use lazy_static::lazy_static;
use test_r::test;

test_r::enable!();

#[allow(dead_code)]
mod serialization_properties;

lazy_static! {
    static ref V1: AdtMetadata = AdtMetadata::new(vec![Evolution::InitialVersion]);
    static ref V2: AdtMetadata = AdtMetadata::new(vec![
        Evolution::InitialVersion,
        Evolution::FieldAdded { name: "new_field_1".to_string() },
    ]);
    static ref V3: AdtMetadata = AdtMetadata::new(vec![
        Evolution::InitialVersion,
        Evolution::FieldAdded { name: "new_field_1".to_string() },
        Evolution::FieldMadeOptional { name: "field_b".to_string() },
    ]);
    static ref V4: AdtMetadata = AdtMetadata::new(vec![
        Evolution::InitialVersion,
        Evolution::FieldAdded { name: "new_field_1".to_string() },
        Evolution::FieldMadeOptional { name: "field_b".to_string() },
        Evolution::FieldRemoved { name: "field_b".to_string() },
    ]);
}

#[derive(Debug, Clone, PartialEq)]
struct ProdV1 {
    field_a: String,
    field_b: i32,
}

impl BinarySerializer for ProdV1 {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        let mut s = AdtSerializer::new_v0(&V1, context);
        s.write_field("field_a", &self.field_a)?;
        s.write_field("field_b", &self.field_b)?;
        s.finish()
    }
}

impl BinaryDeserializer for ProdV1 {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let stored_version = context.read_u8()?;
        let mut d = if stored_version == 0 {
            AdtDeserializer::new_v0(&V1, context)?
        } else {
            AdtDeserializer::new(&V1, context, stored_version)?
        };
        Ok(ProdV1 {
            field_a: d.read_field("field_a", None)?,
            field_b: d.read_field("field_b", None)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProdV2 {
    field_a: String,
    new_field_1: bool,
    field_b: i32,
}

impl BinarySerializer for ProdV2 {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        let mut s = AdtSerializer::new(&V2, context);
        s.write_field("field_a", &self.field_a)?;
        s.write_field("new_field_1", &self.new_field_1)?;
        s.write_field("field_b", &self.field_b)?;
        s.finish()
    }
}

impl BinaryDeserializer for ProdV2 {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let stored_version = context.read_u8()?;
        let mut d = if stored_version == 0 {
            AdtDeserializer::new_v0(&V2, context)?
        } else {
            AdtDeserializer::new(&V2, context, stored_version)?
        };
        Ok(ProdV2 {
            field_a: d.read_field("field_a", None)?,
            new_field_1: d.read_field("new_field_1", Some(true))?,
            field_b: d.read_field("field_b", None)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProdV3 {
    field_a: String,
    new_field_1: bool,
    field_b: Option<i32>,
}

impl BinarySerializer for ProdV3 {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        let mut s = AdtSerializer::new(&V3, context);
        s.write_field("field_a", &self.field_a)?;
        s.write_field("new_field_1", &self.new_field_1)?;
        s.write_field("field_b", &self.field_b)?;
        s.finish()
    }
}

impl BinaryDeserializer for ProdV3 {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let stored_version = context.read_u8()?;
        let mut d = if stored_version == 0 {
            AdtDeserializer::new_v0(&V3, context)?
        } else {
            AdtDeserializer::new(&V3, context, stored_version)?
        };
        Ok(ProdV3 {
            field_a: d.read_field("field_a", None)?,
            new_field_1: d.read_field("new_field_1", Some(true))?,
            field_b: d.read_optional_field("field_b", Some(None))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProdV4 {
    field_a: String,
    new_field_1: bool,
}

impl BinarySerializer for ProdV4 {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        let mut s = AdtSerializer::new(&V4, context);
        s.write_field("field_a", &self.field_a)?;
        s.write_field("new_field_1", &self.new_field_1)?;
        s.finish()
    }
}

impl BinaryDeserializer for ProdV4 {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let stored_version = context.read_u8()?;
        let mut d = if stored_version == 0 {
            AdtDeserializer::new_v0(&V4, context)?
        } else {
            AdtDeserializer::new(&V4, context, stored_version)?
        };
        Ok(ProdV4 {
            field_a: d.read_field("field_a", None)?,
            new_field_1: d.read_field("new_field_1", Some(true))?,
        })
    }
}

mod tuples_vs_products {
    use super::ProdV1;
    use crate::serialization_properties::compatibility_test;
    use test_r::test;

    #[test]
    fn tuple_can_be_read_as_struct() {
        compatibility_test(
            ("hello".to_string(), 42),
            ProdV1 { field_a: "hello".to_string(), field_b: 42 },
        );
    }

    #[test]
    fn simple_struct_can_be_read_as_tuple() {
        compatibility_test(
            ProdV1 { field_a: "hello".to_string(), field_b: 42 },
            ("hello".to_string(), 42),
        );
    }
}

mod adding_new_field {
    use super::{ProdV1, ProdV2};
    use crate::serialization_properties::compatibility_test;
    use test_r::test;

    #[test]
    fn old_version_can_read_new() {
        let serialized = ProdV2 { field_a: "hello".to_string(), new_field_1: true, field_b: 42 };
        let expected = ProdV1 { field_a: "hello".to_string(), field_b: 42 };
        compatibility_test(serialized, expected);
    }

    #[test]
    fn new_version_can_read_old() {
        let serialized = ProdV1 { field_a: "hello".to_string(), field_b: 42 };
        let expected = ProdV2 { field_a: "hello".to_string(), new_field_1: true, field_b: 42 };
        compatibility_test(serialized, expected);
    }
}

mod making_a_field_optional {
    use super::{ProdV1, ProdV2, ProdV3};
    use crate::serialization_properties::{compatibility_test, incompatibility_test};
    use test_r::test;

    #[test]
    fn v1_can_read_new_if_it_is_not_none() {
        let serialized = ProdV3 { field_a: "hello".to_string(), new_field_1: true, field_b: Some(200) };
        let expected = ProdV1 { field_a: "hello".to_string(), field_b: 200 };
        compatibility_test(serialized, expected);
    }

    #[test]
    fn old_cannot_read_new_if_it_is_none() {
        let serialized = ProdV3 { field_a: "hello".to_string(), new_field_1: false, field_b: None };
        incompatibility_test::<ProdV3, ProdV2>(serialized);
    }

    #[test]
    fn new_version_can_read_v1() {
        let serialized = ProdV1 { field_a: "hello".to_string(), field_b: 200 };
        let expected = ProdV3 { field_a: "hello".to_string(), new_field_1: true, field_b: Some(200) };
        compatibility_test(serialized, expected);
    }

    #[test]
    fn new_version_can_read_v2() {
        let serialized = ProdV2 { field_a: "hello".to_string(), new_field_1: false, field_b: 200 };
        let expected = ProdV3 { field_a: "hello".to_string(), new_field_1: false, field_b: Some(200) };
        compatibility_test(serialized, expected);
    }
}

mod removing_a_field {
    use super::{ProdV1, ProdV2, ProdV3, ProdV4};
    use crate::serialization_properties::{compatibility_test, incompatibility_test};
    use test_r::test;

    #[test]
    fn can_read_v1_by_skipping_the_field() {
        let serialized = ProdV1 { field_a: "hello".to_string(), field_b: 200 };
        let expected = ProdV4 { field_a: "hello".to_string(), new_field_1: true };
        compatibility_test(serialized, expected);
    }

    #[test]
    fn can_read_v3_by_skipping_the_field() {
        let serialized = ProdV3 { field_a: "hello".to_string(), new_field_1: false, field_b: Some(200) };
        let expected = ProdV4 { field_a: "hello".to_string(), new_field_1: false };
        compatibility_test(serialized, expected);
    }

    #[test]
    fn cannot_read_as_v1_because_of_missing_field() {
        let serialized = ProdV4 { field_a: "hello".to_string(), new_field_1: false };
        incompatibility_test::<ProdV4, ProdV1>(serialized);
    }

    #[test]
    fn can_read_as_v3_missing_field_becomes_none() {
        let serialized = ProdV4 { field_a: "hello".to_string(), new_field_1: false };
        let expected = ProdV3 { field_a: "hello".to_string(), new_field_1: false, field_b: None };
        compatibility_test(serialized, expected);
    }
}
