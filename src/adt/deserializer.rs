use hashbrown::{HashMap, HashSet};

use crate::adt::{AdtMetadata, FieldPosition};
use crate::deserializer::InputRegion;
use crate::evolution::SerializedEvolutionStep;
use crate::{BinaryDeserializer, BinaryInput, DeserializationContext, Error, Result};

/// Reads the chunked wire layout written by [`crate::adt::AdtSerializer`]. For `stored_version ==
/// 0` fields are read straight off the context; otherwise the evolution header is read up front
/// and each chunk's byte range is remembered as an [`InputRegion`] so `read_field` can push/pop
/// into the right chunk without copying it out.
pub struct AdtDeserializer<'ctx, 'a, 'm> {
    metadata: &'m AdtMetadata,
    context: &'ctx mut DeserializationContext<'a>,
    stored_version: u8,
    chunk_regions: Option<Vec<InputRegion>>,
    made_optional_at: HashMap<FieldPosition, u8>,
    removed_fields: HashSet<String>,
    last_index_per_chunk: HashMap<u8, u8>,
    read_constructor_idx: Option<u32>,
}

impl<'ctx, 'a, 'm> AdtDeserializer<'ctx, 'a, 'm> {
    pub fn new_v0(
        metadata: &'m AdtMetadata,
        context: &'ctx mut DeserializationContext<'a>,
    ) -> Result<Self> {
        Ok(Self {
            metadata,
            context,
            stored_version: 0,
            chunk_regions: None,
            made_optional_at: HashMap::new(),
            removed_fields: HashSet::new(),
            last_index_per_chunk: HashMap::new(),
            read_constructor_idx: None,
        })
    }

    pub fn new(
        metadata: &'m AdtMetadata,
        context: &'ctx mut DeserializationContext<'a>,
        stored_version: u8,
    ) -> Result<Self> {
        let mut steps = Vec::with_capacity(stored_version as usize + 1);
        for _ in 0..=stored_version {
            steps.push(SerializedEvolutionStep::deserialize(context)?);
        }

        let mut chunk_regions = Vec::with_capacity(steps.len());
        let mut made_optional_at = HashMap::new();
        let mut removed_fields = HashSet::new();

        for (idx, step) in steps.iter().enumerate() {
            match step {
                SerializedEvolutionStep::FieldAddedToNewChunk { size } => {
                    let start = context.pos();
                    let size = *size as usize;
                    context.skip(size)?;
                    chunk_regions.push(InputRegion::new(start, size));
                }
                SerializedEvolutionStep::FieldMadeOptional { position } => {
                    made_optional_at.insert(*position, idx as u8);
                    chunk_regions.push(InputRegion::new(context.pos(), 0));
                }
                SerializedEvolutionStep::FieldRemoved { field_name } => {
                    removed_fields.insert(field_name.clone());
                    chunk_regions.push(InputRegion::new(context.pos(), 0));
                }
                SerializedEvolutionStep::Unknown => {
                    chunk_regions.push(InputRegion::new(context.pos(), 0));
                }
            }
        }

        Ok(Self {
            metadata,
            context,
            stored_version,
            chunk_regions: Some(chunk_regions),
            made_optional_at,
            removed_fields,
            last_index_per_chunk: HashMap::new(),
            read_constructor_idx: None,
        })
    }

    fn record_field_index(&mut self, chunk: u8) -> FieldPosition {
        let next = self
            .last_index_per_chunk
            .get(&chunk)
            .map(|last| last + 1)
            .unwrap_or(0);
        self.last_index_per_chunk.insert(chunk, next);
        FieldPosition::new(chunk, next)
    }

    fn with_chunk<T>(
        &mut self,
        chunk: u8,
        f: impl FnOnce(&mut DeserializationContext<'a>) -> Result<T>,
    ) -> Result<T> {
        match &self.chunk_regions {
            None => f(self.context),
            Some(regions) => {
                if chunk as usize >= regions.len() {
                    return Err(Error::DeserializingNonExistingChunk(chunk));
                }
                let region = regions[chunk as usize];
                self.context.push_region(region);
                let result = f(self.context);
                let updated = self.context.pop_region();
                self.chunk_regions.as_mut().unwrap()[chunk as usize] = updated;
                result
            }
        }
    }

    pub fn read_field<T: BinaryDeserializer>(
        &mut self,
        field_name: &str,
        field_default: Option<T>,
    ) -> Result<T> {
        if self.removed_fields.contains(field_name) {
            return Err(Error::FieldRemovedInSerializedVersion(
                field_name.to_string(),
            ));
        }

        let chunk = *self
            .metadata
            .field_generations
            .get(field_name)
            .unwrap_or(&0);
        let field_position = self.record_field_index(chunk);

        if self.stored_version < chunk {
            return match field_default {
                Some(value) => Ok(value),
                None => Err(Error::FieldWithoutDefaultValueIsMissing(
                    field_name.to_string(),
                )),
            };
        }

        if self.made_optional_at.contains_key(&field_position) {
            let is_defined = self.with_chunk(chunk, |ctx| bool::deserialize(ctx))?;
            if is_defined {
                self.with_chunk(chunk, |ctx| T::deserialize(ctx))
            } else {
                Err(Error::NonOptionalFieldSerializedAsNone(
                    field_name.to_string(),
                ))
            }
        } else {
            self.with_chunk(chunk, |ctx| T::deserialize(ctx))
        }
    }

    pub fn read_optional_field<T: BinaryDeserializer>(
        &mut self,
        field_name: &str,
        field_default: Option<Option<T>>,
    ) -> Result<Option<T>> {
        if self.removed_fields.contains(field_name) {
            return Ok(None);
        }

        let chunk = *self
            .metadata
            .field_generations
            .get(field_name)
            .unwrap_or(&0);
        let optional_since = *self.metadata.made_optional_at.get(field_name).unwrap_or(&0);
        self.record_field_index(chunk);

        if self.stored_version < chunk {
            return match field_default {
                Some(default_value) => Ok(default_value),
                None => Err(Error::DeserializationFailure(format!(
                    "field {field_name} is not in the stream and has no default value"
                ))),
            };
        }

        if self.stored_version < optional_since {
            self.with_chunk(chunk, |ctx| T::deserialize(ctx)).map(Some)
        } else {
            self.with_chunk(chunk, |ctx| Option::<T>::deserialize(ctx))
        }
    }

    pub fn read_constructor<T>(
        &mut self,
        case_idx: u32,
        deserialize_case: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        let constructor_idx = self.read_or_get_constructor_idx()?;
        if constructor_idx == case_idx {
            Ok(Some(deserialize_case(self)?))
        } else {
            Ok(None)
        }
    }

    fn read_or_get_constructor_idx(&mut self) -> Result<u32> {
        match self.read_constructor_idx {
            Some(idx) => Ok(idx),
            None => {
                let idx = self.with_chunk(0, |ctx| ctx.read_var_u32())?;
                self.read_constructor_idx = Some(idx);
                Ok(idx)
            }
        }
    }
}
