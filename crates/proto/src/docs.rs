//! Markdown API reference.
//!
//! Renders the compiled schemas as a single markdown document in the layout of protoc-gen-doc's
//! markdown template: a table of contents, one section per file with message, enum and service
//! tables, and a closing table of scalar value types. Descriptions come from the leading comments
//! recorded in the descriptor set's source info.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::path::Path;

use prost::Message as _;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, ServiceDescriptorProto,
};

use crate::{DocsResult, FILE_DESCRIPTOR_SET};

// Field numbers used in `SourceCodeInfo` location paths.
const FILE_MESSAGE_TYPE: i32 = 4;
const FILE_ENUM_TYPE: i32 = 5;
const FILE_SERVICE: i32 = 6;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED_TYPE: i32 = 3;
const MESSAGE_ENUM_TYPE: i32 = 4;
const ENUM_VALUE: i32 = 2;
const SERVICE_METHOD: i32 = 2;

const SCALAR_TYPES: &[(&str, &str, &str)] = &[
    ("double", "", "f64"),
    ("float", "", "f32"),
    ("int32", "Uses variable-length encoding. Inefficient for encoding negative numbers; if your field is likely to have negative values, use sint32 instead.", "i32"),
    ("int64", "Uses variable-length encoding. Inefficient for encoding negative numbers; if your field is likely to have negative values, use sint64 instead.", "i64"),
    ("uint32", "Uses variable-length encoding.", "u32"),
    ("uint64", "Uses variable-length encoding.", "u64"),
    ("sint32", "Uses variable-length encoding. Signed int value. These more efficiently encode negative numbers than regular int32s.", "i32"),
    ("sint64", "Uses variable-length encoding. Signed int value. These more efficiently encode negative numbers than regular int64s.", "i64"),
    ("fixed32", "Always four bytes. More efficient than uint32 if values are often greater than 2^28.", "u32"),
    ("fixed64", "Always eight bytes. More efficient than uint64 if values are often greater than 2^56.", "u64"),
    ("sfixed32", "Always four bytes.", "i32"),
    ("sfixed64", "Always eight bytes.", "i64"),
    ("bool", "", "bool"),
    ("string", "A string must always contain UTF-8 encoded or 7-bit ASCII text.", "String"),
    ("bytes", "May contain any arbitrary sequence of bytes.", "Vec<u8>"),
];

/// Leading comments of one file, keyed by source-info path.
struct Comments(HashMap<Vec<i32>, String>);

impl Comments {
    fn of(file: &FileDescriptorProto) -> Self {
        let mut map = HashMap::new();
        if let Some(info) = &file.source_code_info {
            for location in &info.location {
                if let Some(comment) = location.leading_comments.as_deref() {
                    let text = comment
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if !text.is_empty() {
                        map.insert(location.path.clone(), text);
                    }
                }
            }
        }
        Self(map)
    }

    fn get(&self, path: &[i32]) -> &str {
        self.0.get(path).map(String::as_str).unwrap_or("")
    }
}

struct FieldDoc {
    name: String,
    type_link: String,
    label: &'static str,
    description: String,
}

struct MessageDoc {
    name: String,
    full_name: String,
    description: String,
    fields: Vec<FieldDoc>,
}

struct EnumDoc {
    name: String,
    full_name: String,
    description: String,
    values: Vec<(String, i32, String)>,
}

struct MethodDoc {
    name: String,
    request: String,
    response: String,
    description: String,
}

struct ServiceDoc {
    name: String,
    full_name: String,
    description: String,
    methods: Vec<MethodDoc>,
}

struct FileDoc {
    name: String,
    package: String,
    messages: Vec<MessageDoc>,
    enums: Vec<EnumDoc>,
    services: Vec<ServiceDoc>,
}

fn scalar_name(ty: Type) -> &'static str {
    match ty {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

/// Markdown link to a named type, shortened relative to the current package.
fn type_link(type_name: &str, package: &str) -> String {
    let full = type_name.trim_start_matches('.');
    let short = full
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .filter(|_| !package.is_empty())
        .unwrap_or(full);
    format!("[{short}](#{full})")
}

fn field_doc(
    field: &FieldDescriptorProto,
    package: &str,
    proto3: bool,
    description: &str,
) -> FieldDoc {
    let type_link = match field.r#type() {
        Type::Message | Type::Enum | Type::Group => type_link(field.type_name(), package),
        scalar => {
            let name = scalar_name(scalar);
            format!("[{name}](#{name})")
        }
    };
    let label = match field.label() {
        Label::Repeated => "repeated",
        Label::Required => "required",
        Label::Optional if field.proto3_optional() || !proto3 => "optional",
        Label::Optional => "",
    };

    FieldDoc {
        name: field.name().to_owned(),
        type_link,
        label,
        description: description.to_owned(),
    }
}

fn enum_doc(
    enumeration: &EnumDescriptorProto,
    scope: &str,
    package: &str,
    path: &[i32],
    comments: &Comments,
) -> EnumDoc {
    let values = enumeration
        .value
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let mut value_path = path.to_vec();
            value_path.extend([ENUM_VALUE, index as i32]);
            (
                value.name().to_owned(),
                value.number(),
                comments.get(&value_path).to_owned(),
            )
        })
        .collect();

    let name = qualify(scope, enumeration.name());
    EnumDoc {
        full_name: qualify(package, &name),
        name,
        description: comments.get(path).to_owned(),
        values,
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_owned()
    } else {
        format!("{scope}.{name}")
    }
}

/// Collects a message, its nested messages and nested enums, in declaration order.
#[allow(clippy::too_many_arguments)]
fn collect_message(
    message: &DescriptorProto,
    scope: &str,
    path: &[i32],
    package: &str,
    proto3: bool,
    comments: &Comments,
    messages: &mut Vec<MessageDoc>,
    enums: &mut Vec<EnumDoc>,
) {
    let is_map_entry = message
        .options
        .as_ref()
        .and_then(|options| options.map_entry)
        .unwrap_or(false);
    if is_map_entry {
        return;
    }

    let name = qualify(scope, message.name());
    let fields = message
        .field
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let mut field_path = path.to_vec();
            field_path.extend([MESSAGE_FIELD, index as i32]);
            field_doc(field, package, proto3, comments.get(&field_path))
        })
        .collect();

    messages.push(MessageDoc {
        full_name: qualify(package, &name),
        name: name.clone(),
        description: comments.get(path).to_owned(),
        fields,
    });

    for (index, nested) in message.nested_type.iter().enumerate() {
        let mut nested_path = path.to_vec();
        nested_path.extend([MESSAGE_NESTED_TYPE, index as i32]);
        collect_message(
            nested,
            &name,
            &nested_path,
            package,
            proto3,
            comments,
            messages,
            enums,
        );
    }

    for (index, enumeration) in message.enum_type.iter().enumerate() {
        let mut enum_path = path.to_vec();
        enum_path.extend([MESSAGE_ENUM_TYPE, index as i32]);
        enums.push(enum_doc(enumeration, &name, package, &enum_path, comments));
    }
}

fn service_doc(
    service: &ServiceDescriptorProto,
    index: usize,
    package: &str,
    comments: &Comments,
) -> ServiceDoc {
    let path = [FILE_SERVICE, index as i32];
    let methods = service
        .method
        .iter()
        .enumerate()
        .map(|(method_index, method)| {
            let stream = |streaming: bool| if streaming { "stream " } else { "" };
            MethodDoc {
                name: method.name().to_owned(),
                request: format!(
                    "{}{}",
                    stream(method.client_streaming()),
                    type_link(method.input_type(), package)
                ),
                response: format!(
                    "{}{}",
                    stream(method.server_streaming()),
                    type_link(method.output_type(), package)
                ),
                description: comments
                    .get(&[FILE_SERVICE, index as i32, SERVICE_METHOD, method_index as i32])
                    .to_owned(),
            }
        })
        .collect();

    ServiceDoc {
        name: service.name().to_owned(),
        full_name: qualify(package, service.name()),
        description: comments.get(&path).to_owned(),
        methods,
    }
}

fn file_doc(file: &FileDescriptorProto) -> FileDoc {
    let comments = Comments::of(file);
    let package = file.package().to_owned();
    let proto3 = file.syntax() == "proto3";

    let mut messages = Vec::new();
    let mut enums = Vec::new();
    for (index, message) in file.message_type.iter().enumerate() {
        collect_message(
            message,
            "",
            &[FILE_MESSAGE_TYPE, index as i32],
            &package,
            proto3,
            &comments,
            &mut messages,
            &mut enums,
        );
    }
    for (index, enumeration) in file.enum_type.iter().enumerate() {
        enums.push(enum_doc(
            enumeration,
            "",
            &package,
            &[FILE_ENUM_TYPE, index as i32],
            &comments,
        ));
    }
    let services = file
        .service
        .iter()
        .enumerate()
        .map(|(index, service)| service_doc(service, index, &package, &comments))
        .collect();

    FileDoc {
        name: file.name().to_owned(),
        package,
        messages,
        enums,
        services,
    }
}

/// Escapes text placed inside a markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn write_file_section(out: &mut String, file: &FileDoc) -> fmt::Result {
    writeln!(out, "<a name=\"{}\"></a>", file.name)?;
    writeln!(out, "<p align=\"right\"><a href=\"#top\">Top</a></p>")?;
    writeln!(out)?;
    writeln!(out, "## {}", file.name)?;
    writeln!(out)?;
    if !file.package.is_empty() {
        writeln!(out, "Package: `{}`", file.package)?;
        writeln!(out)?;
    }

    for message in &file.messages {
        writeln!(out, "<a name=\"{}\"></a>", message.full_name)?;
        writeln!(out)?;
        writeln!(out, "### {}", message.name)?;
        if !message.description.is_empty() {
            writeln!(out, "{}", message.description)?;
        }
        writeln!(out)?;
        if !message.fields.is_empty() {
            writeln!(out, "| Field | Type | Label | Description |")?;
            writeln!(out, "| ----- | ---- | ----- | ----------- |")?;
            for field in &message.fields {
                writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    field.name,
                    field.type_link,
                    field.label,
                    cell(&field.description)
                )?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    writeln!(out, " <!-- end messages -->")?;
    writeln!(out)?;

    for enumeration in &file.enums {
        writeln!(out, "<a name=\"{}\"></a>", enumeration.full_name)?;
        writeln!(out)?;
        writeln!(out, "### {}", enumeration.name)?;
        if !enumeration.description.is_empty() {
            writeln!(out, "{}", enumeration.description)?;
        }
        writeln!(out)?;
        writeln!(out, "| Name | Number | Description |")?;
        writeln!(out, "| ---- | ------ | ----------- |")?;
        for (name, number, description) in &enumeration.values {
            writeln!(out, "| {} | {} | {} |", name, number, cell(description))?;
        }
        writeln!(out)?;
    }
    writeln!(out, " <!-- end enums -->")?;
    writeln!(out)?;

    for service in &file.services {
        writeln!(out, "<a name=\"{}\"></a>", service.full_name)?;
        writeln!(out)?;
        writeln!(out, "### {}", service.name)?;
        if !service.description.is_empty() {
            writeln!(out, "{}", service.description)?;
        }
        writeln!(out)?;
        writeln!(out, "| Method Name | Request Type | Response Type | Description |")?;
        writeln!(out, "| ----------- | ------------ | ------------- | ------------|")?;
        for method in &service.methods {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                method.name,
                method.request,
                method.response,
                cell(&method.description)
            )?;
        }
        writeln!(out)?;
    }
    writeln!(out, " <!-- end services -->")?;
    writeln!(out)?;
    writeln!(out)?;
    Ok(())
}

fn write_document(out: &mut String, files: &[FileDoc]) -> fmt::Result {
    writeln!(out, "# Protocol Documentation")?;
    writeln!(out, "<a name=\"top\"></a>")?;
    writeln!(out)?;
    writeln!(out, "## Table of Contents")?;
    writeln!(out)?;
    for file in files {
        writeln!(out, "- [{0}](#{0})", file.name)?;
        for message in &file.messages {
            writeln!(out, "    - [{}](#{})", message.name, message.full_name)?;
        }
        for enumeration in &file.enums {
            writeln!(out, "    - [{}](#{})", enumeration.name, enumeration.full_name)?;
        }
        for service in &file.services {
            writeln!(out, "    - [{}](#{})", service.name, service.full_name)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "- [Scalar Value Types](#scalar-value-types)")?;
    writeln!(out)?;
    writeln!(out)?;

    for file in files {
        write_file_section(out, file)?;
    }

    writeln!(out, "## Scalar Value Types")?;
    writeln!(out)?;
    writeln!(out, "| .proto Type | Notes | Rust Type |")?;
    writeln!(out, "| ----------- | ----- | --------- |")?;
    for (name, notes, rust) in SCALAR_TYPES {
        writeln!(out, "| <a name=\"{name}\" /> {name} | {notes} | {rust} |")?;
    }
    Ok(())
}

/// Renders every file of `set` as one markdown document, files ordered by name.
pub fn render_markdown(set: &FileDescriptorSet) -> DocsResult<String> {
    let mut files: Vec<FileDoc> = set.file.iter().map(file_doc).collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::new();
    write_document(&mut out, &files)?;
    Ok(out)
}

/// Decodes an encoded `FileDescriptorSet`.
pub fn decode_descriptor_set(bytes: &[u8]) -> DocsResult<FileDescriptorSet> {
    Ok(FileDescriptorSet::decode(bytes)?)
}

/// Renders the API reference of the schemas compiled into this crate.
pub fn render_crate_docs() -> DocsResult<String> {
    let set = decode_descriptor_set(FILE_DESCRIPTOR_SET)?;
    render_markdown(&set)
}

/// Writes the API reference of this crate's schemas to `path`, creating parent directories.
pub fn write_markdown(path: &Path) -> DocsResult<()> {
    let markdown = render_crate_docs()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, markdown)?;
    tracing::info!(path = %path.display(), "wrote API reference");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{
        EnumValueDescriptorProto, MessageOptions, MethodDescriptorProto, SourceCodeInfo,
    };

    fn location(path: Vec<i32>, comment: &str) -> prost_types::source_code_info::Location {
        prost_types::source_code_info::Location {
            path,
            leading_comments: Some(comment.to_owned()),
            ..Default::default()
        }
    }

    fn field(name: &str, number: i32, ty: Type, label: Label, type_name: Option<&str>) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_owned()),
            number: Some(number),
            r#type: Some(ty as i32),
            label: Some(label as i32),
            type_name: type_name.map(str::to_owned),
            ..Default::default()
        }
    }

    fn sample_set() -> FileDescriptorSet {
        let entry = DescriptorProto {
            name: Some("TagsEntry".into()),
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let region = DescriptorProto {
            name: Some("Region".into()),
            field: vec![field("id", 1, Type::Int32, Label::Optional, None)],
            ..Default::default()
        };
        let plot = DescriptorProto {
            name: Some("Plot".into()),
            field: vec![
                field("name", 1, Type::String, Label::Optional, None),
                field("regions", 2, Type::Message, Label::Repeated, Some(".demo.Plot.Region")),
                field("mode", 3, Type::Enum, Label::Optional, Some(".other.Mode")),
            ],
            nested_type: vec![region, entry],
            ..Default::default()
        };
        let kind = EnumDescriptorProto {
            name: Some("Kind".into()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("KIND_UNSPECIFIED".into()),
                    number: Some(0),
                    ..Default::default()
                },
                EnumValueDescriptorProto {
                    name: Some("KIND_PARKOUR".into()),
                    number: Some(1),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let service = ServiceDescriptorProto {
            name: Some("Plots".into()),
            method: vec![MethodDescriptorProto {
                name: Some("Watch".into()),
                input_type: Some(".demo.Plot".into()),
                output_type: Some(".demo.Plot".into()),
                server_streaming: Some(true),
                ..Default::default()
            }],
            ..Default::default()
        };

        FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("demo/plot.proto".into()),
                package: Some("demo".into()),
                syntax: Some("proto3".into()),
                message_type: vec![plot],
                enum_type: vec![kind],
                service: vec![service],
                source_code_info: Some(SourceCodeInfo {
                    location: vec![
                        location(vec![4, 0], " A plot.\n Spans lines.\n"),
                        location(vec![4, 0, 2, 0], " Display | name.\n"),
                        location(vec![5, 0, 2, 1], " Parkour maps.\n"),
                        location(vec![6, 0, 2, 0], " Streams plot updates.\n"),
                    ],
                }),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_render_sample_messages() {
        let markdown = render_markdown(&sample_set()).unwrap();

        assert!(markdown.starts_with("# Protocol Documentation"));
        assert!(markdown.contains("- [demo/plot.proto](#demo/plot.proto)"));
        assert!(markdown.contains("    - [Plot](#demo.Plot)"));
        assert!(markdown.contains("### Plot\nA plot. Spans lines.\n"));
        assert!(markdown.contains("| name | [string](#string) |  | Display \\| name. |"));
        assert!(markdown.contains("| regions | [Plot.Region](#demo.Plot.Region) | repeated |  |"));
        assert!(markdown.contains("| mode | [other.Mode](#other.Mode) |  |  |"));
        assert!(markdown.contains("### Plot.Region"));
        assert!(!markdown.contains("TagsEntry"));
    }

    #[test]
    fn test_render_sample_enums_and_services() {
        let markdown = render_markdown(&sample_set()).unwrap();

        assert!(markdown.contains("<a name=\"demo.Kind\"></a>"));
        assert!(markdown.contains("| KIND_PARKOUR | 1 | Parkour maps. |"));
        assert!(markdown.contains("| Watch | [Plot](#demo.Plot) | stream [Plot](#demo.Plot) | Streams plot updates. |"));
        assert!(markdown.contains("| <a name=\"sint64\" /> sint64 |"));
    }

    #[test]
    fn test_render_crate_docs_covers_every_registered_message() {
        let markdown = render_crate_docs().unwrap();

        for entry in crate::modapi::registry().iter() {
            assert!(
                markdown.contains(&format!("<a name=\"{}\"></a>", entry.proto_name())),
                "missing {}",
                entry.proto_name()
            );
        }
        for entry in crate::plugin::registry().iter() {
            assert!(markdown.contains(&format!("<a name=\"{}\"></a>", entry.proto_name())));
        }
        assert!(markdown.contains("## mcdiamondfire/messages/common.proto"));
        assert!(markdown.contains("| PLAYER_MODE_BUILD | 3 | Building on a plot. |"));
        assert!(markdown.contains(
            "| online_players | [int32](#int32) |  | Number of players online across the network. |"
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_descriptor_set(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_write_markdown_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs/api/proto.md");

        write_markdown(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("### S2CServerInfo"));
    }
}
