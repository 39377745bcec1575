use crate::{RefId, StringId};
use std::array::TryFromSliceError;
use std::char::DecodeUtf16Error;
use std::fmt::{Display, Formatter};
use std::num::TryFromIntError;
use std::string::FromUtf8Error;

/// The closed error taxonomy surfaced at the call site. Every failure is terminal: once one of
/// these is produced no further bytes are read or written and any buffered chunks are discarded.
#[derive(Debug)]
pub enum Error {
    SerializationFailure(String),
    DeserializationFailure(String),
    CompressionFailure(String),
    DecompressionFailure(String),
    LengthTooLarge,
    UnsupportedCharacter(char),
    FailedToDecodeCharacter(u16),
    FailedToDecodeString(String),
    InputEndedUnexpectedly,
    InvalidStringId(StringId),
    InvalidRefId(RefId),
    FieldRemovedInSerializedVersion(String),
    FieldWithoutDefaultValueIsMissing(String),
    NonOptionalFieldSerializedAsNone(String),
    InvalidConstructorName {
        constructor_name: String,
        type_name: String,
    },
    InvalidConstructorId {
        id: u32,
        type_name: String,
    },
    UnknownFieldReferenceInEvolutionStep(String),
    UnknownSerializedEvolutionStep(i32),
    DeserializingNonExistingChunk(u8),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SerializationFailure(msg) => write!(f, "serialization failure: {msg}"),
            Error::DeserializationFailure(msg) => write!(f, "deserialization failure: {msg}"),
            Error::CompressionFailure(msg) => write!(f, "compression failure: {msg}"),
            Error::DecompressionFailure(msg) => write!(f, "decompression failure: {msg}"),
            Error::LengthTooLarge => write!(f, "length too large"),
            Error::UnsupportedCharacter(c) => write!(f, "unsupported character: {c}"),
            Error::FailedToDecodeCharacter(c) => write!(f, "failed to decode character: {c}"),
            Error::FailedToDecodeString(msg) => write!(f, "failed to decode string: {msg}"),
            Error::InputEndedUnexpectedly => write!(f, "input ended unexpectedly"),
            Error::InvalidStringId(id) => write!(f, "invalid string id: {id}"),
            Error::InvalidRefId(id) => write!(f, "invalid reference id: {id}"),
            Error::FieldRemovedInSerializedVersion(name) => {
                write!(f, "field removed in serialized version: {name}")
            }
            Error::FieldWithoutDefaultValueIsMissing(name) => {
                write!(f, "field without default value is missing: {name}")
            }
            Error::NonOptionalFieldSerializedAsNone(name) => {
                write!(f, "non-optional field serialized as None: {name}")
            }
            Error::InvalidConstructorName {
                constructor_name,
                type_name,
            } => write!(
                f,
                "invalid constructor name: {constructor_name} for type: {type_name}"
            ),
            Error::InvalidConstructorId { id, type_name } => {
                write!(f, "invalid constructor id: {id} for type: {type_name}")
            }
            Error::UnknownFieldReferenceInEvolutionStep(name) => {
                write!(f, "unknown field reference in evolution step: {name}")
            }
            Error::UnknownSerializedEvolutionStep(code) => {
                write!(f, "unknown serialized evolution step code: {code}")
            }
            Error::DeserializingNonExistingChunk(chunk) => {
                write!(f, "deserializing non existing chunk: {chunk}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<TryFromIntError> for Error {
    fn from(_: TryFromIntError) -> Self {
        Error::LengthTooLarge
    }
}

impl From<TryFromSliceError> for Error {
    fn from(_: TryFromSliceError) -> Self {
        Error::InputEndedUnexpectedly
    }
}

impl From<DecodeUtf16Error> for Error {
    fn from(err: DecodeUtf16Error) -> Self {
        Error::FailedToDecodeCharacter(err.unpaired_surrogate())
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Self {
        Error::FailedToDecodeString(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
