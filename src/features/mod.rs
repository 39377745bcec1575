#[cfg(feature = "nonempty-collections")]
mod nonempty_collections;

#[cfg(feature = "uuid")]
mod uuid;
