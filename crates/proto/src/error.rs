#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("message id already registered: {0}")]
    DuplicateId(String),
    #[error("message type already registered: {0}")]
    DuplicateType(&'static str),
    #[error("invalid message id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed JSON: {0}")]
    Syntax(serde_json::Error),
    #[error("message JSON must be an object")]
    NotAnObject,
    #[error("missing packet_id")]
    MissingPacketId,
    #[error("packet_id must be a string")]
    InvalidPacketId,
    #[error("unknown packet_id: {0}")]
    UnknownPacketId(String),
    #[error("message type is not registered: {0}")]
    Unregistered(&'static str),
    #[error("packet_id mismatch: expected {expected}, found {found}")]
    PacketIdMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("failed to serialize message: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize message: {0}")]
    Deserialization(serde_json::Error),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("failed to decode file descriptor set: {0}")]
    Descriptor(#[from] prost::DecodeError),
    #[error("failed to render API reference: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("failed to write API reference: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocsResult<T> = std::result::Result<T, DocsError>;
