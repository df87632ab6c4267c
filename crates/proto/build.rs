//! Build script for the `mcdf-proto` crate.
//!
//! ## Purpose
//! Compiles every schema under the repository-level `proto/` directory into Rust message types
//! and gRPC client/server stubs, and emits a file-descriptor set.
//!
//! ## Intended use
//! Generated messages derive serde so the hand-written codec can speak the packet-id JSON
//! format. Per-field serde attributes are derived from the descriptor set before code
//! generation, see `json_fields.rs`. The descriptor set also backs the markdown API reference.

use std::path::{Path, PathBuf};

include!("json_fields.rs");

fn collect_protos(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_protos(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "proto") {
            out.push(path);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The crate lives in `<repo>/crates/proto` so the repository root is two levels up.
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .ok_or("could not determine repository root from CARGO_MANIFEST_DIR")?;

    // Prefer the repo-level `proto/`, fall back to a crate-local copy for packaged builds.
    let candidate1 = repo_root.join("proto");
    let candidate2 = manifest_dir.join("proto");
    let proto_root = if candidate1.is_dir() {
        candidate1
    } else if candidate2.is_dir() {
        candidate2
    } else {
        return Err(format!(
            "proto directory not found. looked for:\n  {}\n  {}",
            candidate1.display(),
            candidate2.display()
        )
        .into());
    };

    let mut protos = Vec::new();
    collect_protos(&proto_root, &mut protos)?;
    protos.sort();
    if protos.is_empty() {
        return Err(format!("no .proto files under {}", proto_root.display()).into());
    }

    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    std::env::set_var("PROTOC", protoc);

    let out_dir = std::env::var("OUT_DIR")?;
    let descriptor_path = Path::new(&out_dir).join("proto_descriptor.bin");
    let descriptor_set = prost_build::Config::new()
        .file_descriptor_set_path(&descriptor_path)
        .load_fds(protos.as_slice(), &[proto_root.as_path()])?;
    let field_attributes = json_field_attributes(&descriptor_set)?;

    let mut builder = tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .message_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")
        .message_attribute(".", "#[serde(default, rename_all = \"camelCase\")]");
    for (field, attribute) in &field_attributes {
        builder = builder.field_attribute(field, attribute);
    }
    builder.compile_fds(descriptor_set)?;

    println!("cargo:rerun-if-changed=json_fields.rs");
    println!("cargo:rerun-if-changed={}", proto_root.display());
    for proto in &protos {
        println!("cargo:rerun-if-changed={}", proto.display());
    }
    Ok(())
}
