use std::any::{Any, TypeId};

use hashbrown::HashMap;

use crate::{BinaryDeserializer, BinarySerializer, DeserializationContext, Error, Result, SerializationContext};

type ErasedSerializeFn = fn(&dyn Any, &mut SerializationContext<Vec<u8>>) -> Result<()>;
type ErasedDeserializeFn = fn(&mut DeserializationContext<'_>) -> Result<Box<dyn Any>>;

struct Registration {
    type_name: &'static str,
    serialize: ErasedSerializeFn,
    deserialize: ErasedDeserializeFn,
}

/// A stable mapping between small integer type ids and (codec, runtime type) pairs, consulted by
/// `store_ref_or_object`/`read_ref_or_value` whenever the static type at the call site is a
/// polymorphic base and the concrete type has to travel on the wire alongside the value.
///
/// Registration order is caller-controlled; once built the ids are part of the wire format for
/// every polymorphic reference written through this registry and must stay stable across
/// deployments. A `TypeRegistry` is read-only after construction and may be shared freely across
/// concurrent serializations.
#[derive(Default)]
pub struct TypeRegistry {
    by_id: HashMap<u32, Registration>,
    id_by_type: HashMap<TypeId, u32>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            registry: TypeRegistry::default(),
        }
    }

    pub fn id_of<T: Any>(&self) -> Option<u32> {
        self.id_by_type.get(&TypeId::of::<T>()).copied()
    }

    pub fn type_name(&self, id: u32) -> Option<&'static str> {
        self.by_id.get(&id).map(|r| r.type_name)
    }

    pub fn serialize_dyn(
        &self,
        id: u32,
        value: &dyn Any,
        context: &mut SerializationContext<Vec<u8>>,
    ) -> Result<()> {
        let registration = self
            .by_id
            .get(&id)
            .ok_or_else(|| Error::InvalidConstructorId {
                id,
                type_name: "<registered type>".to_string(),
            })?;
        (registration.serialize)(value, context)
    }

    pub fn deserialize_dyn(&self, id: u32, context: &mut DeserializationContext<'_>) -> Result<Box<dyn Any>> {
        let registration = self
            .by_id
            .get(&id)
            .ok_or_else(|| Error::InvalidConstructorId {
                id,
                type_name: "<registered type>".to_string(),
            })?;
        (registration.deserialize)(context)
    }
}

pub struct TypeRegistryBuilder {
    registry: TypeRegistry,
}

impl TypeRegistryBuilder {
    pub fn register<T>(mut self, id: u32, type_name: &'static str) -> Self
    where
        T: BinarySerializer + BinaryDeserializer + Any + 'static,
    {
        fn serialize_erased<T: BinarySerializer + Any>(
            value: &dyn Any,
            context: &mut SerializationContext<Vec<u8>>,
        ) -> Result<()> {
            let value = value
                .downcast_ref::<T>()
                .expect("TypeRegistry dispatched to the wrong concrete type");
            value.serialize(context)
        }

        fn deserialize_erased<T: BinaryDeserializer + Any>(
            context: &mut DeserializationContext<'_>,
        ) -> Result<Box<dyn Any>> {
            Ok(Box::new(T::deserialize(context)?))
        }

        self.registry.by_id.insert(
            id,
            Registration {
                type_name,
                serialize: serialize_erased::<T>,
                deserialize: deserialize_erased::<T>,
            },
        );
        self.registry.id_by_type.insert(TypeId::of::<T>(), id);
        self
    }

    pub fn build(self) -> TypeRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;
    use crate::{deserialize, serialize_to_byte_vec};

    #[test]
    fn round_trips_registered_type_by_id() {
        let registry = TypeRegistry::builder()
            .register::<String>(1, "String")
            .register::<i32>(2, "i32")
            .build();

        let id = registry.id_of::<i32>().unwrap();
        assert_eq!(id, 2);
        assert_eq!(registry.type_name(id), Some("i32"));

        let bytes = serialize_to_byte_vec(&42i32).unwrap();
        let mut context = DeserializationContext::new(&bytes);
        let boxed = registry.deserialize_dyn(id, &mut context).unwrap();
        assert_eq!(*boxed.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = TypeRegistry::builder().register::<i32>(1, "i32").build();
        let bytes: Vec<u8> = Vec::new();
        let mut context = DeserializationContext::new(&bytes);
        assert!(registry.deserialize_dyn(7, &mut context).is_err());
    }
}
