//! # mcdf-proto
//!
//! Protocol buffer bindings for the DiamondFire mod API.
//!
//! Contains:
//! - Protobuf-generated message types and gRPC stubs (`pb` module)
//! - Packet registries for the ModAPI and legacy plugin message sets
//! - A JSON codec that tags every message with its `packet_id`
//! - A markdown API reference rendered from the embedded descriptor set
//!
//! ## Wire format
//!
//! Messages travel as proto3 JSON objects with one extra string field naming the packet:
//!
//! ```text
//! {"node":"node3","version":"1.21","onlinePlayers":120,"packet_id":"s2c_server_info"}
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use mcdf_proto::modapi::{self, ModApiMessage};
//! use mcdf_proto::pb::clientbound::server::S2cServerInfo;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let info = S2cServerInfo {
//!     node: "node3".into(),
//!     ..Default::default()
//! };
//! let json = modapi::serialize_message(&info)?;
//!
//! match modapi::deserialize_any(&json)? {
//!     ModApiMessage::S2cServerInfo(info) => println!("connected to {}", info.node),
//!     other => println!("unexpected packet {}", other.packet_id()),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]

mod constants;
mod error;
#[macro_use]
mod packet_set;

pub mod codec;
pub mod docs;
pub mod json;
pub mod modapi;
pub mod plugin;
pub mod registry;

// Re-export the generated protobuf modules. The generated code is placed into OUT_DIR at build
// time by the build script; the module tree mirrors the proto package hierarchy so that
// cross-package references resolve.
pub mod pb {
    pub mod mcdiamondfire {
        pub mod messages {
            pub mod common {
                tonic::include_proto!("mcdiamondfire.messages.common");
            }
            pub mod clientbound {
                pub mod server {
                    tonic::include_proto!("mcdiamondfire.messages.clientbound.server");
                }
                pub mod plot {
                    tonic::include_proto!("mcdiamondfire.messages.clientbound.plot");
                }
                pub mod player {
                    tonic::include_proto!("mcdiamondfire.messages.clientbound.player");
                }
            }
            pub mod serverbound {
                pub mod plot {
                    tonic::include_proto!("mcdiamondfire.messages.serverbound.plot");
                }
                pub mod player {
                    tonic::include_proto!("mcdiamondfire.messages.serverbound.player");
                }
            }
        }
        pub mod plugin {
            tonic::include_proto!("mcdiamondfire.plugin");
        }
    }

    pub use mcdiamondfire::messages::{clientbound, common, serverbound};
    pub use mcdiamondfire::plugin;
}

/// Encoded `FileDescriptorSet` covering every compiled schema, including source comments.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use codec::{JsonCodec, PacketSet};
pub use constants::{
    ARTIFACT_GROUP, ARTIFACT_ID, CLIENTBOUND_PREFIX, DEFAULT_DOCS_PATH, PACKET_ID_FIELD,
    SERVERBOUND_PREFIX, VERSION,
};
pub use error::{CodecError, CodecResult, DocsError, DocsResult, RegistryError, RegistryResult};
pub use modapi::ModApiMessage;
pub use plugin::PluginMessage;
pub use registry::{Direction, MessageDescriptor, MessageRegistry, ProtoMessage};

/// Maven-style coordinates of this artifact, formatted as `group:artifact:version`.
pub fn artifact_coordinates() -> String {
    format!("{ARTIFACT_GROUP}:{ARTIFACT_ID}:{VERSION}")
}
