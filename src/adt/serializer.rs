use hashbrown::HashMap;

use crate::adt::{AdtMetadata, FieldPosition};
use crate::evolution::SerializedEvolutionStep;
use crate::{
    BinaryOutput, BinarySerializer, Error, Evolution, Result, SerializationContext,
    DEFAULT_CAPACITY,
};

/// Writes the chunked wire layout for one record or sum-type value: a leading version byte,
/// then (for `version > 0`) an evolution header followed by the chunks themselves in order.
///
/// Fields are buffered per chunk as they're written (via `write_field`/`write_constructor`) and
/// only flushed to the real output in `finish`, because the header naming each chunk's size has
/// to precede the chunk bytes.
pub struct AdtSerializer<'ctx, 'm, Output: BinaryOutput> {
    metadata: &'m AdtMetadata,
    context: &'ctx mut SerializationContext<Output>,
    chunks: Vec<Vec<u8>>,
    last_index_per_chunk: HashMap<u8, u8>,
    field_indices: HashMap<String, FieldPosition>,
}

impl<'ctx, 'm, Output: BinaryOutput> AdtSerializer<'ctx, 'm, Output> {
    /// For the always-version-0 case: no header, fields are written straight through.
    pub fn new_v0(metadata: &'m AdtMetadata, context: &'ctx mut SerializationContext<Output>) -> Self {
        assert_eq!(metadata.version, 0);
        context.write_u8(0);
        Self {
            metadata,
            context,
            chunks: Vec::new(),
            last_index_per_chunk: HashMap::new(),
            field_indices: HashMap::new(),
        }
    }

    pub fn new(metadata: &'m AdtMetadata, context: &'ctx mut SerializationContext<Output>) -> Self {
        context.write_u8(metadata.version);
        let chunks = (0..=metadata.version)
            .map(|_| Vec::with_capacity(DEFAULT_CAPACITY))
            .collect();
        Self {
            metadata,
            context,
            chunks,
            last_index_per_chunk: HashMap::new(),
            field_indices: HashMap::new(),
        }
    }

    fn is_v0(&self) -> bool {
        self.chunks.is_empty()
    }

    fn record_field_index(&mut self, field_name: &str, chunk: u8) {
        let next = self
            .last_index_per_chunk
            .get(&chunk)
            .map(|last| last + 1)
            .unwrap_or(0);
        self.last_index_per_chunk.insert(chunk, next);
        self.field_indices
            .insert(field_name.to_string(), FieldPosition::new(chunk, next));
    }

    pub fn write_field<T: BinarySerializer>(&mut self, field_name: &str, value: &T) -> Result<()> {
        if self.is_v0() {
            return value.serialize(self.context);
        }
        let chunk = *self.metadata.field_generations.get(field_name).unwrap_or(&0);
        self.context.push_buffer(Vec::with_capacity(DEFAULT_CAPACITY));
        value.serialize(self.context)?;
        let bytes = self.context.pop_buffer();
        self.chunks[chunk as usize].extend_from_slice(&bytes);
        self.record_field_index(field_name, chunk);
        Ok(())
    }

    pub fn write_constructor(
        &mut self,
        constructor_idx: u32,
        serialize_case: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        if self.is_v0() {
            self.context.write_var_u32(constructor_idx);
        } else {
            self.context.push_buffer(Vec::with_capacity(4));
            self.context.write_var_u32(constructor_idx);
            let bytes = self.context.pop_buffer();
            self.chunks[0].extend_from_slice(&bytes);
        }
        serialize_case(self)
    }

    fn write_evolution_header(&mut self) -> Result<()> {
        for (v, evolution) in self.metadata.evolution_steps.iter().enumerate() {
            let step = match evolution {
                Evolution::InitialVersion | Evolution::FieldAdded { .. } => {
                    let size = self.chunks[v].len().try_into()?;
                    SerializedEvolutionStep::FieldAddedToNewChunk { size }
                }
                Evolution::FieldMadeOptional { name } => match self.field_indices.get(name) {
                    Some(position) => SerializedEvolutionStep::FieldMadeOptional {
                        position: *position,
                    },
                    None if self.metadata.removed_fields.contains(name) => {
                        SerializedEvolutionStep::FieldMadeOptional {
                            position: FieldPosition::REMOVED,
                        }
                    }
                    None => return Err(Error::UnknownFieldReferenceInEvolutionStep(name.clone())),
                },
                Evolution::FieldRemoved { name } | Evolution::FieldMadeTransient { name } => {
                    SerializedEvolutionStep::FieldRemoved {
                        field_name: name.clone(),
                    }
                }
            };
            step.serialize(self.context)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if self.is_v0() {
            return Ok(());
        }
        self.write_evolution_header()?;
        for chunk in &self.chunks {
            self.context.write_bytes(chunk);
        }
        Ok(())
    }
}
