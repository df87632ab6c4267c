//! Declares a packet-set enum together with its registrations.
//!
//! Each line `Variant(Type) => "packet_id", "proto.Name", Direction;` produces one enum variant,
//! a `From<Type>` conversion, and one registry entry. Registration order follows declaration
//! order.

macro_rules! packet_set {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty) => $id:literal, $proto:literal, $direction:ident;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )*
        }

        $(
            impl From<$ty> for $name {
                fn from(message: $ty) -> Self {
                    $name::$variant(message)
                }
            }
        )*

        impl $name {
            fn register_all(
                registry: &mut $crate::registry::MessageRegistry<Self>,
            ) -> $crate::RegistryResult<()> {
                $(
                    registry.register::<$ty>(
                        $id,
                        $proto,
                        $crate::registry::Direction::$direction,
                    )?;
                )*
                Ok(())
            }

            /// Packet identifier of the contained message.
            pub fn packet_id(&self) -> &'static str {
                <Self as $crate::codec::PacketSet>::packet_id(self)
            }

            /// Fully qualified protobuf name of the contained message.
            pub fn proto_name(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => $proto, )*
                }
            }

            /// Which side of the connection sends the contained message.
            pub fn direction(&self) -> $crate::registry::Direction {
                match self {
                    $( $name::$variant(_) => $crate::registry::Direction::$direction, )*
                }
            }

            /// Encodes the contained message in protobuf binary form.
            pub fn encode_to_vec(&self) -> Vec<u8> {
                match self {
                    $( $name::$variant(message) => ::prost::Message::encode_to_vec(message), )*
                }
            }
        }

        impl $crate::codec::PacketSet for $name {
            fn packet_id(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => $id, )*
                }
            }

            fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
                match self {
                    $( $name::$variant(message) => serde_json::to_value(message), )*
                }
            }
        }
    };
}
