//! serde adapters for generated protobuf fields.
//!
//! The build script attaches one of these to every field of every generated message, see
//! `json_fields.rs` next to it. Together with the `camelCase` renaming and the snake_case aliases
//! this gives the proto3 JSON input rules:
//!
//! - `null` reads as the field's default value.
//! - Numeric fields accept a JSON number or a string holding one (`"120"`, `"Infinity"`).
//! - Enum fields are written by value name (`"PLAYER_MODE_BUILD"`); values outside the enum are
//!   kept as numbers. Either form is accepted on input. Unknown names are rejected.

use serde::Deserialize;

/// Wire representation accepted for an enum field.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum EnumRepr {
    Name(String),
    Number(i32),
}

macro_rules! proto_enum_json {
    ($module:ident, $enum:ty) => {
        pub mod $module {
            use serde::{Deserialize, Deserializer, Serializer};

            pub fn serialize<S>(value: &i32, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                match <$enum>::try_from(*value) {
                    Ok(known) => serializer.serialize_str(known.as_str_name()),
                    Err(_) => serializer.serialize_i32(*value),
                }
            }

            pub fn deserialize<'de, D>(deserializer: D) -> Result<i32, D::Error>
            where
                D: Deserializer<'de>,
            {
                match Option::<super::EnumRepr>::deserialize(deserializer)? {
                    None => Ok(0),
                    Some(super::EnumRepr::Number(value)) => Ok(value),
                    Some(super::EnumRepr::Name(name)) => <$enum>::from_str_name(&name)
                        .map(|known| known as i32)
                        .ok_or_else(|| {
                            serde::de::Error::custom(format!(
                                "unknown {} value: {}",
                                stringify!($module),
                                name
                            ))
                        }),
                }
            }
        }
    };
}

/// Reads `null` as `T::default()`.
pub mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Reads a numeric field from a JSON number, a numeric string or `null`.
pub mod number {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberRepr<T> {
        Number(T),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr + Default,
        T::Err: Display,
    {
        match Option::<NumberRepr<T>>::deserialize(deserializer)? {
            None => Ok(T::default()),
            Some(NumberRepr::Number(value)) => Ok(value),
            Some(NumberRepr::Text(text)) => text.parse().map_err(|e| {
                serde::de::Error::custom(format!("invalid number {text:?}: {e}"))
            }),
        }
    }
}

proto_enum_json!(player_mode, crate::pb::common::PlayerMode);
proto_enum_json!(
    code_operation_type,
    crate::pb::serverbound::plot::CodeOperationType
);
