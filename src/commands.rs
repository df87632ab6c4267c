//! Command handlers for the `mcdf` binary.
//!
//! Handlers write to a caller-supplied writer so they can be exercised without a terminal.

use std::fmt::Debug;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use mcdf_proto::{docs, JsonCodec, MessageRegistry, PacketSet};

/// Prints one line per registered message: id, direction and protobuf name.
pub fn list<E>(registry: &MessageRegistry<E>, out: &mut impl Write) -> anyhow::Result<()> {
    for entry in registry.iter() {
        writeln!(
            out,
            "{:<28} {:<12} {}",
            entry.id(),
            entry.direction(),
            entry.proto_name()
        )?;
    }
    writeln!(out, "{} messages", registry.len())?;
    Ok(())
}

/// Writes the markdown API reference to `path`.
pub fn write_docs(path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    docs::write_markdown(path)
        .with_context(|| format!("failed to write API reference to {}", path.display()))?;
    writeln!(out, "Wrote API reference to {}", path.display())?;
    Ok(())
}

/// Prints the markdown API reference.
pub fn print_docs(out: &mut impl Write) -> anyhow::Result<()> {
    let markdown = docs::render_crate_docs()?;
    out.write_all(markdown.as_bytes())?;
    Ok(())
}

/// Decodes a tagged JSON packet and prints the decoded message plus its canonical JSON form.
pub fn decode<E>(
    registry: &MessageRegistry<E>,
    json: &str,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    E: PacketSet + Debug,
{
    let codec = JsonCodec::new(registry);
    let packet = codec.deserialize_any(json).context("failed to decode packet")?;
    tracing::debug!(packet_id = packet.packet_id(), "decoded packet");

    writeln!(out, "packet_id: {}", packet.packet_id())?;
    writeln!(out, "{packet:#?}")?;
    writeln!(out, "{}", canonical_json(&codec, &packet)?)?;
    Ok(())
}

/// Prints a JSON packet for `packet_id` with every field at its default value.
pub fn template<E>(
    registry: &MessageRegistry<E>,
    packet_id: &str,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    E: PacketSet,
{
    let descriptor = registry
        .get(packet_id)
        .with_context(|| format!("unknown packet id: {packet_id}"))?;
    let packet = descriptor.decode(serde_json::Value::Object(serde_json::Map::new()))?;

    let codec = JsonCodec::new(registry);
    writeln!(out, "{}", canonical_json(&codec, &packet)?)?;
    Ok(())
}

/// Prints the published artifact coordinates and registry sizes.
pub fn info(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "artifact: {}", mcdf_proto::artifact_coordinates())?;
    writeln!(out, "modapi messages: {}", mcdf_proto::modapi::registry().len())?;
    writeln!(out, "plugin messages: {}", mcdf_proto::plugin::registry().len())?;
    Ok(())
}

fn canonical_json<E: PacketSet>(codec: &JsonCodec<'_, E>, packet: &E) -> anyhow::Result<String> {
    let json = codec.serialize_any(packet)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcdf_proto::{modapi, plugin};

    fn output(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_list_modapi() {
        let text = output(|out| list(modapi::registry(), out));

        assert!(text.lines().next().unwrap().starts_with("s2c_server_info"));
        assert!(text.contains("c2s_player_teleport"));
        assert!(text.contains("serverbound"));
        assert!(text.trim_end().ends_with("12 messages"));
    }

    #[test]
    fn test_list_plugin() {
        let text = output(|out| list(plugin::registry(), out));
        assert!(text.contains("mcdiamondfire.plugin.PlayerSwitchMode"));
        assert!(text.trim_end().ends_with("6 messages"));
    }

    #[test]
    fn test_decode_prints_canonical_json() {
        let json = r#"{"packet_id":"s2c_player_switch_mode","mode":3,"extra":true}"#;
        let text = output(|out| decode(modapi::registry(), json, out));

        assert!(text.starts_with("packet_id: s2c_player_switch_mode\n"));
        assert!(text.contains("S2cPlayerSwitchMode"));
        assert!(text.contains(r#""mode": "PLAYER_MODE_BUILD""#));
        assert!(!text.contains("extra"));
    }

    #[test]
    fn test_decode_unknown_packet_fails() {
        let mut buf = Vec::new();
        let err = decode(modapi::registry(), r#"{"packet_id":"s2c_nope"}"#, &mut buf).unwrap_err();
        assert!(format!("{err:#}").contains("unknown packet_id: s2c_nope"));
    }

    #[test]
    fn test_template_uses_defaults() {
        let text = output(|out| template(plugin::registry(), "player_currency", out));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "tokens": 0,
                "tickets": 0,
                "sparks": 0,
                "packet_id": "player_currency",
            })
        );
    }

    #[test]
    fn test_template_unknown_id_fails() {
        let mut buf = Vec::new();
        assert!(template(modapi::registry(), "s2c_nope", &mut buf).is_err());
    }

    #[test]
    fn test_write_docs_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api/proto.md");

        let text = output(|out| write_docs(&path, out));

        assert!(text.starts_with("Wrote API reference to"));
        let markdown = std::fs::read_to_string(&path).unwrap();
        assert!(markdown.contains("## Scalar Value Types"));
    }

    #[test]
    fn test_info_lists_coordinates() {
        let text = output(|out| info(out));
        assert!(text.contains("artifact: com.mcdiamondfire:proto:"));
        assert!(text.contains("modapi messages: 12"));
    }
}
