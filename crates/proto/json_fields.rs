// serde attributes for generated message fields, derived from the compiled descriptor set.
//
// Included by the build script and by the library tests, so this file holds no inner attributes
// and no crate-relative imports.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FileDescriptorSet};

/// Enum types and the adapter module rendering them by value name.
pub const ENUM_ADAPTERS: &[(&str, &str)] = &[
    (
        ".mcdiamondfire.messages.common.PlayerMode",
        "crate::json::player_mode",
    ),
    (
        ".mcdiamondfire.messages.serverbound.plot.CodeOperationType",
        "crate::json::code_operation_type",
    ),
];

const NULL_AS_DEFAULT: &str = "#[serde(deserialize_with = \"crate::json::null_as_default::deserialize\")]";
const NUMBER: &str = "#[serde(deserialize_with = \"crate::json::number::deserialize\")]";

/// Returns `(field path, attribute)` pairs for every field of every message in `set`.
///
/// Field paths use the fully qualified `.package.Message.field` form expected by
/// `tonic_build::Builder::field_attribute`. Fails when an enum field has no adapter.
pub fn json_field_attributes(set: &FileDescriptorSet) -> Result<Vec<(String, String)>, String> {
    let mut attributes = Vec::new();
    for file in &set.file {
        let package = file.package();
        let scope = if package.is_empty() {
            String::new()
        } else {
            format!(".{package}")
        };
        for message in &file.message_type {
            message_attributes(&scope, message, &mut attributes)?;
        }
    }
    Ok(attributes)
}

fn message_attributes(
    scope: &str,
    message: &DescriptorProto,
    out: &mut Vec<(String, String)>,
) -> Result<(), String> {
    if message.options.as_ref().is_some_and(|o| o.map_entry()) {
        return Ok(());
    }
    let message_path = format!("{scope}.{}", message.name());

    for field in &message.field {
        // Oneof members become enum variants, not struct fields.
        if field.oneof_index.is_some() && !field.proto3_optional() {
            continue;
        }
        let path = format!("{message_path}.{}", field.name());

        if field.name().contains('_') {
            out.push((path.clone(), format!("#[serde(alias = \"{}\")]", field.name())));
        }
        if field.proto3_optional() {
            continue;
        }

        let repeated = field.label() == Label::Repeated;
        let attribute = match field.r#type() {
            Type::Enum if repeated => {
                return Err(format!("repeated enum field {path} has no JSON adapter"));
            }
            Type::Enum => {
                let adapter = ENUM_ADAPTERS
                    .iter()
                    .find(|(name, _)| *name == field.type_name())
                    .map(|(_, adapter)| *adapter)
                    .ok_or_else(|| {
                        format!(
                            "enum {} used by {path} has no JSON adapter",
                            field.type_name()
                        )
                    })?;
                format!("#[serde(with = \"{adapter}\")]")
            }
            // Singular message fields are `Option`s, which already read `null` as absent.
            Type::Message | Type::Group if !repeated => continue,
            Type::Double
            | Type::Float
            | Type::Int64
            | Type::Uint64
            | Type::Int32
            | Type::Fixed64
            | Type::Fixed32
            | Type::Uint32
            | Type::Sfixed32
            | Type::Sfixed64
            | Type::Sint32
            | Type::Sint64
                if !repeated =>
            {
                NUMBER.to_string()
            }
            _ => NULL_AS_DEFAULT.to_string(),
        };
        out.push((path, attribute));
    }

    for nested in &message.nested_type {
        message_attributes(&message_path, nested, out)?;
    }
    Ok(())
}
