//! Packet registries.
//!
//! A [`MessageRegistry`] maps string packet identifiers to generated message types and back. Each
//! registry is tied to a packet-set enum `E` (for example [`crate::ModApiMessage`]) so that a
//! message whose type is only known at runtime, from its `packet_id`, can still be decoded into a
//! strongly typed value.
//!
//! Registries enforce two invariants at registration time:
//! - an identifier maps to exactly one message type
//! - a message type maps to exactly one identifier

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::{CLIENTBOUND_PREFIX, SERVERBOUND_PREFIX};
use crate::{RegistryError, RegistryResult};

/// A generated protobuf message that can also travel as JSON.
///
/// Implemented for every type that meets the bounds; the build script derives the serde traits on
/// all generated messages.
pub trait ProtoMessage: prost::Message + Default + Serialize + DeserializeOwned + 'static {}

impl<T> ProtoMessage for T where
    T: prost::Message + Default + Serialize + DeserializeOwned + 'static
{
}

/// Which side of the connection sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the server to the client.
    Clientbound,
    /// Sent by the client to the server.
    Serverbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Clientbound => "clientbound",
            Direction::Serverbound => "serverbound",
        }
    }

    /// Packet id prefix used by ModAPI messages travelling in this direction.
    pub fn packet_prefix(&self) -> &'static str {
        match self {
            Direction::Clientbound => CLIENTBOUND_PREFIX,
            Direction::Serverbound => SERVERBOUND_PREFIX,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration record for a single message type.
pub struct MessageDescriptor<E> {
    id: &'static str,
    proto_name: &'static str,
    rust_name: &'static str,
    type_id: TypeId,
    direction: Direction,
    decode: fn(serde_json::Value) -> Result<E, serde_json::Error>,
    decode_binary: fn(&[u8]) -> Result<E, prost::DecodeError>,
}

impl<E> MessageDescriptor<E> {
    /// The packet identifier, e.g. `s2c_server_info`.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Fully qualified protobuf name, e.g. `mcdiamondfire.messages.clientbound.server.S2CServerInfo`.
    pub fn proto_name(&self) -> &'static str {
        self.proto_name
    }

    /// Rust path of the generated type.
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Decode a JSON object (without its `packet_id`) into the packet-set enum.
    pub fn decode(&self, value: serde_json::Value) -> Result<E, serde_json::Error> {
        (self.decode)(value)
    }

    /// Decode protobuf binary bytes into the packet-set enum.
    pub fn decode_binary(&self, bytes: &[u8]) -> Result<E, prost::DecodeError> {
        (self.decode_binary)(bytes)
    }
}

impl<E> fmt::Debug for MessageDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("id", &self.id)
            .field("proto_name", &self.proto_name)
            .field("rust_name", &self.rust_name)
            .field("direction", &self.direction)
            .finish()
    }
}

fn decode_as<M, E>(value: serde_json::Value) -> Result<E, serde_json::Error>
where
    M: ProtoMessage,
    E: From<M>,
{
    serde_json::from_value::<M>(value).map(E::from)
}

fn decode_binary_as<M, E>(bytes: &[u8]) -> Result<E, prost::DecodeError>
where
    M: ProtoMessage,
    E: From<M>,
{
    <M as prost::Message>::decode(bytes).map(E::from)
}

/// Validates that a packet identifier is non-empty `snake_case` ASCII.
pub fn validate_packet_id(id: &str) -> RegistryResult<()> {
    if id.is_empty() {
        return Err(RegistryError::InvalidId {
            id: id.to_owned(),
            reason: "identifier cannot be empty",
        });
    }

    let ok = id
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'_'));
    if !ok {
        return Err(RegistryError::InvalidId {
            id: id.to_owned(),
            reason: "only lowercase ASCII letters, digits and '_' are allowed",
        });
    }

    Ok(())
}

/// Bidirectional mapping between packet identifiers and message types.
pub struct MessageRegistry<E> {
    entries: Vec<MessageDescriptor<E>>,
    by_id: HashMap<&'static str, usize>,
    by_type: HashMap<TypeId, usize>,
}

impl<E> MessageRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_type: HashMap::new(),
        }
    }

    /// Registers message type `M` under `id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateType` if `M` is already registered,
    /// `RegistryError::DuplicateId` if `id` is taken, or `RegistryError::InvalidId` if `id` is
    /// not a valid packet identifier.
    pub fn register<M>(
        &mut self,
        id: &'static str,
        proto_name: &'static str,
        direction: Direction,
    ) -> RegistryResult<()>
    where
        M: ProtoMessage,
        E: From<M>,
    {
        let type_id = TypeId::of::<M>();
        if self.by_type.contains_key(&type_id) {
            return Err(RegistryError::DuplicateType(type_name::<M>()));
        }
        if self.by_id.contains_key(id) {
            return Err(RegistryError::DuplicateId(id.to_owned()));
        }
        validate_packet_id(id)?;

        let index = self.entries.len();
        self.entries.push(MessageDescriptor {
            id,
            proto_name,
            rust_name: type_name::<M>(),
            type_id,
            direction,
            decode: decode_as::<M, E>,
            decode_binary: decode_binary_as::<M, E>,
        });
        self.by_id.insert(id, index);
        self.by_type.insert(type_id, index);

        tracing::trace!(id, proto_name, "registered message");
        Ok(())
    }

    /// Returns the identifier registered for message type `M`.
    pub fn id_of<M: 'static>(&self) -> Option<&'static str> {
        self.descriptor_of::<M>().map(MessageDescriptor::id)
    }

    /// Returns the descriptor registered for message type `M`.
    pub fn descriptor_of<M: 'static>(&self) -> Option<&MessageDescriptor<E>> {
        self.by_type
            .get(&TypeId::of::<M>())
            .map(|&index| &self.entries[index])
    }

    /// Returns the descriptor registered under `id`.
    pub fn get(&self, id: &str) -> Option<&MessageDescriptor<E>> {
        self.by_id.get(id).map(|&index| &self.entries[index])
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Iterates over all registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageDescriptor<E>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes a JSON object into the message registered under `id`.
    ///
    /// Returns `None` when `id` is not registered.
    pub fn decode(
        &self,
        id: &str,
        value: serde_json::Value,
    ) -> Option<Result<E, serde_json::Error>> {
        self.get(id).map(|descriptor| descriptor.decode(value))
    }
}

impl<E> Default for MessageRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for MessageRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
