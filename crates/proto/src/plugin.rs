//! The legacy plugin message set.
//!
//! Predates the ModAPI set. Every plugin message is client-bound and its packet id carries no
//! direction prefix.

use std::sync::LazyLock;

use crate::codec::JsonCodec;
use crate::pb::plugin::{
    PlayerCurrency, PlayerPermissions, PlayerSwitchMode, PlotInfo, ServerBooster, ServerInfo,
};
use crate::registry::{MessageDescriptor, MessageRegistry, ProtoMessage};
use crate::CodecResult;

packet_set! {
    /// A deserialized legacy plugin message, tagged by its type.
    pub enum PluginMessage {
        // Server.
        ServerInfo(ServerInfo) => "server_info", "mcdiamondfire.plugin.ServerInfo", Clientbound;
        ServerBooster(ServerBooster) => "server_booster", "mcdiamondfire.plugin.ServerBooster", Clientbound;

        // Plot.
        PlotInfo(PlotInfo) => "plot_info", "mcdiamondfire.plugin.PlotInfo", Clientbound;

        // Player.
        PlayerCurrency(PlayerCurrency) => "player_currency", "mcdiamondfire.plugin.PlayerCurrency", Clientbound;
        PlayerPermissions(PlayerPermissions) => "player_permissions", "mcdiamondfire.plugin.PlayerPermissions", Clientbound;
        PlayerSwitchMode(PlayerSwitchMode) => "player_switch_mode", "mcdiamondfire.plugin.PlayerSwitchMode", Clientbound;
    }
}

static REGISTRY: LazyLock<MessageRegistry<PluginMessage>> = LazyLock::new(|| {
    let mut registry = MessageRegistry::new();
    if let Err(e) = PluginMessage::register_all(&mut registry) {
        panic!("plugin message set is inconsistent: {e}");
    }
    tracing::debug!(messages = registry.len(), "plugin registry initialised");
    registry
});

pub fn registry() -> &'static MessageRegistry<PluginMessage> {
    &REGISTRY
}

pub fn codec() -> JsonCodec<'static, PluginMessage> {
    JsonCodec::new(registry())
}

/// Returns the packet id of plugin message type `M`.
pub fn message_id<M: 'static>() -> Option<&'static str> {
    registry().id_of::<M>()
}

/// Looks up the descriptor registered under packet id `id`.
pub fn descriptor(id: &str) -> Option<&'static MessageDescriptor<PluginMessage>> {
    registry().get(id)
}

pub fn serialize_message<M: ProtoMessage>(message: &M) -> CodecResult<String> {
    codec().serialize(message)
}

pub fn deserialize_message<M: ProtoMessage>(json: &str) -> CodecResult<M> {
    codec().deserialize(json)
}

pub fn deserialize_any(json: &str) -> CodecResult<PluginMessage> {
    codec().deserialize_any(json)
}

pub fn serialize_any(message: &PluginMessage) -> CodecResult<String> {
    codec().serialize_any(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb::common::PlayerMode;
    use crate::registry::Direction;
    use crate::CodecError;

    #[test]
    fn test_registry_contains_every_message() {
        assert_eq!(registry().len(), 6);
        assert_eq!(message_id::<PlotInfo>(), Some("plot_info"));
        assert!(registry()
            .iter()
            .all(|entry| entry.direction() == Direction::Clientbound));
    }

    #[test]
    fn test_modapi_types_are_not_plugin_messages() {
        let info = crate::pb::clientbound::server::S2cServerInfo::default();
        let result = serialize_message(&info);
        assert!(matches!(result, Err(CodecError::Unregistered(_))));
    }

    #[test]
    fn test_serialize_permissions() {
        let message = PlayerPermissions {
            permissions: vec!["plot.build".into()],
        };
        let json = serialize_message(&message).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "permissions": ["plot.build"],
                "packet_id": "player_permissions",
            })
        );
    }

    #[test]
    fn test_deserialize_any_switch_mode() {
        let message =
            deserialize_any(r#"{"packet_id":"player_switch_mode","mode":"PLAYER_MODE_PLAY"}"#)
                .unwrap();
        assert_eq!(
            message,
            PluginMessage::PlayerSwitchMode(PlayerSwitchMode {
                mode: PlayerMode::Play as i32,
            })
        );
    }

    #[test]
    fn test_deserialize_message_uses_plugin_ids() {
        let booster: ServerBooster =
            deserialize_message(r#"{"packet_id":"server_booster","owner":"Vattendroppen"}"#)
                .unwrap();
        assert_eq!(booster.owner, "Vattendroppen");

        let result = deserialize_message::<ServerBooster>(
            r#"{"packet_id":"s2c_server_booster","owner":"Vattendroppen"}"#,
        );
        assert!(matches!(result, Err(CodecError::PacketIdMismatch { .. })));
    }

    #[test]
    fn test_descriptor_lookup() {
        let entry = descriptor("plot_info").unwrap();
        assert_eq!(entry.id(), "plot_info");
        assert_eq!(entry.proto_name(), "mcdiamondfire.plugin.PlotInfo");
        assert!(descriptor("s2c_plot_info").is_none());
    }

    #[test]
    fn test_serialize_any_matches_serialize_message() {
        let currency = PlayerCurrency {
            tokens: 250,
            tickets: 4,
            sparks: 1,
        };

        let direct = serialize_message(&currency).unwrap();
        let message = PluginMessage::from(currency);
        let tagged = serialize_any(&message).unwrap();
        assert_eq!(direct, tagged);
        assert_eq!(deserialize_any(&tagged).unwrap(), message);
    }

    #[test]
    fn test_deserialize_accepts_original_field_names() {
        let info: PlotInfo =
            deserialize_message(r#"{"packet_id":"plot_info","plot_id":"7","owner":"Jeremaster"}"#)
                .unwrap();
        assert_eq!(info.plot_id, 7);
        assert_eq!(info.owner, "Jeremaster");
    }
}
