use hashbrown::{HashMap, HashSet};
use lazy_static::lazy_static;

use crate::binary_input::BinaryInput;
use crate::binary_output::BinaryOutput;
use crate::deserializer::DeserializationContext;
use crate::error::Result;
use crate::serializer::SerializationContext;
use crate::{BinaryDeserializer, BinarySerializer, Evolution};

mod deserializer;
mod serializer;

pub use deserializer::AdtDeserializer;
pub use serializer::AdtSerializer;

lazy_static! {
    pub static ref EMPTY_ADT_METADATA: AdtMetadata =
        AdtMetadata::new(vec![Evolution::InitialVersion]);
}

/// Derived lookup tables for one record or sum-type's evolution history, computed once from a
/// `Vec<Evolution>` and shared by every value of that type.
#[derive(Debug)]
pub struct AdtMetadata {
    version: u8,
    field_generations: HashMap<String, u8>,
    made_optional_at: HashMap<String, u8>,
    removed_fields: HashSet<String>,
    evolution_steps: Vec<Evolution>,
}

impl AdtMetadata {
    pub fn new(evolution_steps: Vec<Evolution>) -> Self {
        assert!(!evolution_steps.is_empty(), "evolution steps must not be empty");
        assert!(evolution_steps.len() <= 256, "too many evolution steps");

        let field_generations = evolution_steps
            .iter()
            .enumerate()
            .filter_map(|(idx, evolution)| {
                if let Evolution::FieldAdded { name, .. } = evolution {
                    Some((name.clone(), idx as u8))
                } else {
                    None
                }
            })
            .collect();

        let made_optional_at = evolution_steps
            .iter()
            .enumerate()
            .filter_map(|(idx, evolution)| {
                if let Evolution::FieldMadeOptional { name } = evolution {
                    Some((name.clone(), idx as u8))
                } else {
                    None
                }
            })
            .collect();

        let removed_fields = evolution_steps
            .iter()
            .filter_map(|evolution| match evolution {
                Evolution::FieldRemoved { name } | Evolution::FieldMadeTransient { name } => {
                    Some(name.clone())
                }
                _ => None,
            })
            .collect();

        Self {
            version: (evolution_steps.len() - 1) as u8,
            field_generations,
            made_optional_at,
            removed_fields,
            evolution_steps,
        }
    }
}

/// Supplies a value for a field that is absent from older serialized data.
pub trait DefaultValue<T> {
    fn default_value(&self) -> T;
}

pub struct ProvidedDefaultValue<T: Clone> {
    pub value: T,
}

impl<T: Clone> DefaultValue<T> for ProvidedDefaultValue<T> {
    fn default_value(&self) -> T {
        self.value.clone()
    }
}

/// Where a field lives: `chunk` is the generation it was introduced in, `position` is its
/// 1-based index within that chunk. Encoded as a single byte: chunk 0 uses `-position`, any
/// other chunk uses the chunk number itself (so a field's position within chunk 0 never
/// collides with a later chunk's number).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPosition {
    pub chunk: u8,
    pub position: u8,
}

impl FieldPosition {
    pub fn new(chunk: u8, position: u8) -> Self {
        Self { chunk, position }
    }

    /// Sentinel meaning "the referenced field was removed", encoded as the byte `0x80` (`-128`),
    /// a position no real field can ever occupy.
    pub const REMOVED: FieldPosition = FieldPosition {
        chunk: 128,
        position: 0,
    };

    pub fn to_byte(self) -> u8 {
        if self == FieldPosition::REMOVED {
            0x80
        } else if self.chunk == 0 {
            (-(self.position as i8)) as u8
        } else {
            self.chunk
        }
    }
}

impl BinarySerializer for FieldPosition {
    fn serialize<Output: BinaryOutput>(
        &self,
        context: &mut SerializationContext<Output>,
    ) -> Result<()> {
        context.write_u8(self.to_byte());
        Ok(())
    }
}

impl BinaryDeserializer for FieldPosition {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let byte = context.read_i8()?;
        if byte == -128 {
            Ok(FieldPosition::REMOVED)
        } else if byte < 0 {
            Ok(FieldPosition::new(0, (-byte) as u8))
        } else {
            Ok(FieldPosition::new(byte as u8, 0))
        }
    }
}
