//! Constants shared across the crate.

/// Maven group the bindings are published under.
pub const ARTIFACT_GROUP: &str = "com.mcdiamondfire";

/// Artifact name the bindings are published under.
pub const ARTIFACT_ID: &str = "proto";

/// Published version of the bindings.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON field carrying the packet identifier.
pub const PACKET_ID_FIELD: &str = "packet_id";

/// Packet id prefix of client-bound (server to client) ModAPI messages.
pub const CLIENTBOUND_PREFIX: &str = "s2c_";

/// Packet id prefix of server-bound (client to server) ModAPI messages.
pub const SERVERBOUND_PREFIX: &str = "c2s_";

/// Default location of the generated markdown API reference.
pub const DEFAULT_DOCS_PATH: &str = "docs/api/proto.md";
