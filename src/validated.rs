use crate::{BinaryDeserializer, BinaryOutput, BinarySerializer, DeserializationContext, Error, Result, SerializationContext};

/// Wire-compatible with `Result<A, E>` (tag 0 = invalid, tag 1 = valid) but kept as its own type
/// because `Result` is already the mapping used for `Either`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<E, A> {
    Invalid(E),
    Valid(A),
}

impl<E, A> Validated<E, A> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn ok(self) -> std::result::Result<A, E> {
        match self {
            Validated::Valid(a) => Ok(a),
            Validated::Invalid(e) => Err(e),
        }
    }
}

impl<E: BinarySerializer, A: BinarySerializer> BinarySerializer for Validated<E, A> {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        match self {
            Validated::Invalid(error) => {
                context.write_u8(0);
                error.serialize(context)
            }
            Validated::Valid(value) => {
                context.write_u8(1);
                value.serialize(context)
            }
        }
    }
}

impl<E: BinaryDeserializer, A: BinaryDeserializer> BinaryDeserializer for Validated<E, A> {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        match context.read_u8()? {
            0 => Ok(Validated::Invalid(E::deserialize(context)?)),
            1 => Ok(Validated::Valid(A::deserialize(context)?)),
            other => Err(Error::DeserializationFailure(format!(
                "Failed to deserialize Validated: invalid tag: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;
    use crate::{deserialize, serialize_to_byte_vec};

    #[test]
    fn round_trips_valid() {
        let value: Validated<String, i32> = Validated::Valid(42);
        let bytes = serialize_to_byte_vec(&value).unwrap();
        let restored: Validated<String, i32> = deserialize(&bytes).unwrap();
        assert_eq!(restored, Validated::Valid(42));
    }

    #[test]
    fn round_trips_invalid() {
        let value: Validated<String, i32> = Validated::Invalid("bad".to_string());
        let bytes = serialize_to_byte_vec(&value).unwrap();
        let restored: Validated<String, i32> = deserialize(&bytes).unwrap();
        assert_eq!(restored, Validated::Invalid("bad".to_string()));
    }
}
