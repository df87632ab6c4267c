//! Packet-id JSON codec.
//!
//! A message travels as its proto3 JSON object with an extra string field, `packet_id`, naming the
//! registered message type. The codec adds that field when serializing and strips it before
//! decoding the message fields.
//!
//! Decoding ignores unknown fields and fills absent fields with their protobuf defaults.

use serde_json::{Map, Value};

use crate::constants::PACKET_ID_FIELD;
use crate::registry::{MessageRegistry, ProtoMessage};
use crate::{CodecError, CodecResult};

/// A closed set of registered messages, such as [`crate::ModApiMessage`].
pub trait PacketSet: Sized {
    /// Packet identifier of the contained message.
    fn packet_id(&self) -> &'static str;

    /// JSON object of the contained message, without its packet id.
    fn to_json_value(&self) -> serde_json::Result<Value>;
}

/// JSON codec bound to one message registry.
pub struct JsonCodec<'r, E> {
    registry: &'r MessageRegistry<E>,
}

// Manual impls: the codec is a shared reference regardless of `E`.
impl<E> Clone for JsonCodec<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for JsonCodec<'_, E> {}

impl<'r, E> JsonCodec<'r, E> {
    pub fn new(registry: &'r MessageRegistry<E>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r MessageRegistry<E> {
        self.registry
    }

    /// Serializes `message` to a JSON string tagged with its registered packet id.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Unregistered` if the message type is not in the registry.
    pub fn serialize<M: ProtoMessage>(&self, message: &M) -> CodecResult<String> {
        let id = self
            .registry
            .id_of::<M>()
            .ok_or(CodecError::Unregistered(std::any::type_name::<M>()))?;
        let value = serde_json::to_value(message).map_err(CodecError::Serialization)?;
        tag(value, id)
    }

    /// Deserializes a tagged JSON string into message type `M`.
    ///
    /// The `packet_id` field must be present and a string. When `M` is registered, the id must
    /// also be the one registered for `M`.
    pub fn deserialize<M: ProtoMessage>(&self, json: &str) -> CodecResult<M> {
        let (id, fields) = untag(json)?;
        if let Some(expected) = self.registry.id_of::<M>() {
            if expected != id {
                return Err(CodecError::PacketIdMismatch {
                    expected,
                    found: id,
                });
            }
        }

        serde_json::from_value(Value::Object(fields)).map_err(CodecError::Deserialization)
    }

    /// Deserializes a tagged JSON string into whichever registered message its `packet_id` names.
    pub fn deserialize_any(&self, json: &str) -> CodecResult<E> {
        let (id, fields) = untag(json)?;
        let Some(descriptor) = self.registry.get(&id) else {
            tracing::debug!(packet_id = %id, "rejecting unknown packet");
            return Err(CodecError::UnknownPacketId(id));
        };

        tracing::trace!(packet_id = descriptor.id(), "decoding packet");
        descriptor
            .decode(Value::Object(fields))
            .map_err(CodecError::Deserialization)
    }
}

impl<E: PacketSet> JsonCodec<'_, E> {
    /// Serializes a packet-set value to a JSON string tagged with its packet id.
    pub fn serialize_any(&self, packet: &E) -> CodecResult<String> {
        let value = packet.to_json_value().map_err(CodecError::Serialization)?;
        tag(value, packet.packet_id())
    }
}

fn tag(value: Value, id: &str) -> CodecResult<String> {
    let Value::Object(mut object) = value else {
        return Err(CodecError::NotAnObject);
    };
    object.insert(PACKET_ID_FIELD.to_owned(), Value::String(id.to_owned()));
    serde_json::to_string(&object).map_err(CodecError::Serialization)
}

fn untag(json: &str) -> CodecResult<(String, Map<String, Value>)> {
    let value: Value = serde_json::from_str(json).map_err(CodecError::Syntax)?;
    let Value::Object(mut object) = value else {
        return Err(CodecError::NotAnObject);
    };

    match object.remove(PACKET_ID_FIELD) {
        Some(Value::String(id)) => Ok((id, object)),
        Some(_) => Err(CodecError::InvalidPacketId),
        None => Err(CodecError::MissingPacketId),
    }
}
