//! The ModAPI message set.
//!
//! Holds the mapping between ModAPI message types and their packet identifiers, plus codec
//! helpers bound to that mapping. Client-bound ids start with `s2c_`, server-bound ids with
//! `c2s_`.

use std::sync::LazyLock;

use crate::codec::JsonCodec;
use crate::pb::clientbound::player::{
    S2cChestReference, S2cPlayerCurrency, S2cPlayerPermissions, S2cPlayerSwitchMode,
};
use crate::pb::clientbound::plot::{S2cCodeTemplate, S2cPlaceTemplateResult, S2cPlotInfo};
use crate::pb::clientbound::server::{S2cServerBooster, S2cServerInfo};
use crate::pb::serverbound::player::C2sPlayerTeleport;
use crate::pb::serverbound::plot::{C2sCodeOperation, C2sMultiCodeOperations};
use crate::registry::{MessageDescriptor, MessageRegistry, ProtoMessage};
use crate::CodecResult;

packet_set! {
    /// A deserialized ModAPI message, tagged by its type.
    pub enum ModApiMessage {
        // Client-bound.

        // Server.
        S2cServerInfo(S2cServerInfo) =>
            "s2c_server_info", "mcdiamondfire.messages.clientbound.server.S2CServerInfo", Clientbound;
        S2cServerBooster(S2cServerBooster) =>
            "s2c_server_booster", "mcdiamondfire.messages.clientbound.server.S2CServerBooster", Clientbound;

        // Plot.
        S2cPlotInfo(S2cPlotInfo) =>
            "s2c_plot_info", "mcdiamondfire.messages.clientbound.plot.S2CPlotInfo", Clientbound;
        S2cCodeTemplate(S2cCodeTemplate) =>
            "s2c_code_template", "mcdiamondfire.messages.clientbound.plot.S2CCodeTemplate", Clientbound;
        S2cPlaceTemplateResult(S2cPlaceTemplateResult) =>
            "s2c_place_template_result", "mcdiamondfire.messages.clientbound.plot.S2CPlaceTemplateResult", Clientbound;

        // Player.
        S2cPlayerCurrency(S2cPlayerCurrency) =>
            "s2c_player_currency", "mcdiamondfire.messages.clientbound.player.S2CPlayerCurrency", Clientbound;
        S2cPlayerPermissions(S2cPlayerPermissions) =>
            "s2c_player_permissions", "mcdiamondfire.messages.clientbound.player.S2CPlayerPermissions", Clientbound;
        S2cPlayerSwitchMode(S2cPlayerSwitchMode) =>
            "s2c_player_switch_mode", "mcdiamondfire.messages.clientbound.player.S2CPlayerSwitchMode", Clientbound;
        S2cChestReference(S2cChestReference) =>
            "s2c_chest_reference", "mcdiamondfire.messages.clientbound.player.S2CChestReference", Clientbound;

        // Server-bound.

        // Plot.
        C2sCodeOperation(C2sCodeOperation) =>
            "c2s_code_operation", "mcdiamondfire.messages.serverbound.plot.C2SCodeOperation", Serverbound;
        C2sMultiCodeOperations(C2sMultiCodeOperations) =>
            "c2s_multi_code_operations", "mcdiamondfire.messages.serverbound.plot.C2SMultiCodeOperations", Serverbound;

        // Player.
        C2sPlayerTeleport(C2sPlayerTeleport) =>
            "c2s_player_teleport", "mcdiamondfire.messages.serverbound.player.C2SPlayerTeleport", Serverbound;
    }
}

static REGISTRY: LazyLock<MessageRegistry<ModApiMessage>> = LazyLock::new(|| {
    let mut registry = MessageRegistry::new();
    // The set is fixed at compile time; a failure here is a bug in the declaration above.
    if let Err(e) = ModApiMessage::register_all(&mut registry) {
        panic!("ModAPI message set is inconsistent: {e}");
    }
    tracing::debug!(messages = registry.len(), "ModAPI registry initialised");
    registry
});

/// The shared ModAPI registry.
pub fn registry() -> &'static MessageRegistry<ModApiMessage> {
    &REGISTRY
}

/// A codec bound to the ModAPI registry.
pub fn codec() -> JsonCodec<'static, ModApiMessage> {
    JsonCodec::new(registry())
}

/// Returns the packet id of ModAPI message type `M`, or `None` if it is not a ModAPI message.
pub fn message_id<M: 'static>() -> Option<&'static str> {
    registry().id_of::<M>()
}

/// Returns the registration for `id`, or `None` if no ModAPI message uses it.
pub fn descriptor(id: &str) -> Option<&'static MessageDescriptor<ModApiMessage>> {
    registry().get(id)
}

/// Serializes a ModAPI message to JSON, including its packet id.
pub fn serialize_message<M: ProtoMessage>(message: &M) -> CodecResult<String> {
    codec().serialize(message)
}

/// Deserializes JSON into ModAPI message type `M`.
pub fn deserialize_message<M: ProtoMessage>(json: &str) -> CodecResult<M> {
    codec().deserialize(json)
}

/// Deserializes JSON into whichever ModAPI message its packet id names.
pub fn deserialize_any(json: &str) -> CodecResult<ModApiMessage> {
    codec().deserialize_any(json)
}

/// Serializes a tagged ModAPI message to JSON, including its packet id.
pub fn serialize_any(message: &ModApiMessage) -> CodecResult<String> {
    codec().serialize_any(message)
}
