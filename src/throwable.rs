use crate::{
    BinaryDeserializer, BinaryOutput, BinarySerializer, DeserializationContext, Result,
    SerializationContext,
};

/// One frame of a captured stack trace. Any of the name fields may be absent -- not every
/// runtime attaches file/method information to every frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackFrame {
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub file_name: Option<String>,
    pub line_number: u32,
}

impl BinarySerializer for StackFrame {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        self.class_name.serialize(context)?;
        self.method_name.serialize(context)?;
        self.file_name.serialize(context)?;
        context.write_var_u32(self.line_number);
        Ok(())
    }
}

impl BinaryDeserializer for StackFrame {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let class_name = Option::<String>::deserialize(context)?;
        let method_name = Option::<String>::deserialize(context)?;
        let file_name = Option::<String>::deserialize(context)?;
        let line_number = context.read_var_u32()?;
        Ok(StackFrame {
            class_name,
            method_name,
            file_name,
            line_number,
        })
    }
}

/// A serializable snapshot of an error, used as the error side of [`Try`]. Reading a `Throwable`
/// back never reconstructs the original exception type -- it always materializes this record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Throwable {
    pub class_name: String,
    pub message: String,
    pub stack_trace: Vec<StackFrame>,
    pub cause: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Throwable {
            class_name: class_name.into(),
            message: message.into(),
            stack_trace: Vec::new(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: Throwable) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

impl std::fmt::Display for Throwable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.class_name, self.message)
    }
}

impl std::error::Error for Throwable {}

impl BinarySerializer for Throwable {
    fn serialize<Output: BinaryOutput>(&self, context: &mut SerializationContext<Output>) -> Result<()> {
        self.class_name.serialize(context)?;
        self.message.serialize(context)?;
        self.stack_trace.serialize(context)?;
        self.cause.serialize(context)
    }
}

impl BinaryDeserializer for Throwable {
    fn deserialize(context: &mut DeserializationContext<'_>) -> Result<Self> {
        let class_name = String::deserialize(context)?;
        let message = String::deserialize(context)?;
        let stack_trace = Vec::<StackFrame>::deserialize(context)?;
        let cause = Option::<Box<Throwable>>::deserialize(context)?;
        Ok(Throwable {
            class_name,
            message,
            stack_trace,
            cause,
        })
    }
}

/// A computation that either succeeds with a `T` or failed with a persisted [`Throwable`]. Wire
/// shape matches `Result<T, Throwable>` (tag 0 = failure, tag 1 = success) exactly, since that
/// impl already covers this case.
pub type Try<T> = std::result::Result<T, Throwable>;

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;
    use crate::{deserialize, serialize_to_byte_vec};

    #[test]
    fn round_trips_success() {
        let value: Try<i32> = Ok(42);
        let bytes = serialize_to_byte_vec(&value).unwrap();
        let restored: Try<i32> = deserialize(&bytes).unwrap();
        assert_eq!(restored, Ok(42));
    }

    #[test]
    fn round_trips_failure_with_cause_and_stack_trace() {
        let cause = Throwable::new("java.io.IOException", "disk full");
        let throwable = Throwable {
            stack_trace: vec![StackFrame {
                class_name: Some("com.example.Main".to_string()),
                method_name: Some("run".to_string()),
                file_name: Some("Main.java".to_string()),
                line_number: 42,
            }],
            ..Throwable::new("java.lang.RuntimeException", "boom").with_cause(cause)
        };
        let value: Try<i32> = Err(throwable.clone());
        let bytes = serialize_to_byte_vec(&value).unwrap();
        let restored: Try<i32> = deserialize(&bytes).unwrap();
        assert_eq!(restored, Err(throwable));
    }
}
