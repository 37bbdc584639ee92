//! Built-in commands.
//!
//! Each command is a small stateless struct implementing
//! [`clc_plug::Command`]; [`register_all`] puts them in a registry.

pub mod map;
pub mod queue;
pub mod viridian;

use std::sync::Arc;

use clc_plug::{CommandRegistry, Error, Result};
use clc_proto::{Data, Value, serialization};

pub use map::{MapEntrySetCommand, MapGetCommand, MapGroup};
pub use queue::{QueueGroup, QueueOfferCommand, QueuePollCommand};
pub use viridian::{
    ViridianGetClusterCommand, ViridianGroup, ViridianListClustersCommand, ViridianLoginCommand,
};

/// Shared flag: target data-structure name.
pub const FLAG_NAME: &str = "name";
/// Shared flag: add type-name columns.
pub const FLAG_SHOW_TYPE: &str = "show-type";

/// Help-listing group for data-structure commands.
pub const GROUP_DDS: &str = "dds";

/// Register every built-in command.
///
/// # Errors
///
/// Returns the first registration error.
pub fn register_all(registry: &mut CommandRegistry) -> Result<()> {
    registry.register("map", Arc::new(MapGroup))?;
    registry.register("map:get", Arc::new(MapGetCommand))?;
    registry.register("map:entry-set", Arc::new(MapEntrySetCommand))?;
    registry.register("queue", Arc::new(QueueGroup))?;
    registry.register("queue:offer", Arc::new(QueueOfferCommand))?;
    registry.register("queue:poll", Arc::new(QueuePollCommand))?;
    registry.register("viridian", Arc::new(ViridianGroup))?;
    registry.register("viridian:login", Arc::new(ViridianLoginCommand))?;
    registry.register("viridian:list-clusters", Arc::new(ViridianListClustersCommand))?;
    registry.register("viridian:get-cluster", Arc::new(ViridianGetClusterCommand))?;
    Ok(())
}

/// Serialize command-line text as a value of the named type.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an unknown type or unparsable text.
pub fn make_data(type_name: &str, text: &str) -> Result<Data> {
    let value = match type_name {
        "" | "string" => Value::String(text.to_string()),
        "bool" => Value::Bool(parse(type_name, text)?),
        "int8" => Value::Int8(parse(type_name, text)?),
        "int16" => Value::Int16(parse(type_name, text)?),
        "int32" => Value::Int32(parse(type_name, text)?),
        "int64" => Value::Int64(parse(type_name, text)?),
        "float32" => Value::Float32(parse(type_name, text)?),
        "float64" => Value::Float64(parse(type_name, text)?),
        "json" => {
            serde_json::from_str::<serde_json::Value>(text)
                .map_err(|e| Error::InvalidArgument(format!("'{text}' is not valid JSON: {e}")))?;
            Value::Json(text.to_string())
        }
        other => return Err(Error::InvalidArgument(format!("unknown type '{other}'"))),
    };
    Ok(serialization::encode(&value)?)
}

fn parse<T>(type_name: &str, text: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    text.parse()
        .map_err(|e| Error::InvalidArgument(format!("'{text}' is not a valid {type_name}: {e}")))
}

#[cfg(test)]
mod tests {
    use clc_proto::ValueType;
    use test_case::test_case;

    use super::*;

    #[test_case("string", "k1", ValueType::STRING)]
    #[test_case("", "k1", ValueType::STRING)]
    #[test_case("int8", "-3", ValueType::INT8)]
    #[test_case("int64", "9000000000", ValueType::INT64)]
    #[test_case("bool", "true", ValueType::BOOL)]
    #[test_case("float64", "1.5", ValueType::FLOAT64)]
    #[test_case("json", r#"{"a":1}"#, ValueType::JSON)]
    fn typed_text_is_tagged(type_name: &str, text: &str, expected: ValueType) {
        let data = make_data(type_name, text).expect("encode");
        assert_eq!(data.value_type(), expected);
    }

    #[test_case("int8", "300"; "out of range")]
    #[test_case("bool", "yes"; "not a bool")]
    #[test_case("json", "{"; "bad json")]
    #[test_case("uuid", "x"; "unknown type")]
    fn bad_text_is_invalid_argument(type_name: &str, text: &str) {
        assert!(matches!(
            make_data(type_name, text),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn all_commands_register_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry).expect("register");
        assert_eq!(registry.len(), 10);
        assert!(matches!(
            register_all(&mut registry),
            Err(Error::DuplicateCommand(_))
        ));
    }
}
