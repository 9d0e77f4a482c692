//! Immutable value types returned by the EC2 query API.
//!
//! Enumerations mirror the wire vocabulary.  Values this crate does not
//! know yet parse to an `Unrecognized` variant that keeps the raw string,
//! so a new state on the provider side never fails a whole response.

/// Declare an enumeration backed by EC2 wire strings.
///
/// Generates `from_wire`, `as_wire`, `Display` and a `Serialize` impl that
/// writes the wire string.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this crate does not know about.
            Unrecognized(String),
        }

        impl $name {
            /// Parse a wire value; unknown values are kept verbatim.
            pub fn from_wire(value: &str) -> Self {
                match value {
                    $( $wire => $name::$variant, )+
                    other => $name::Unrecognized(other.to_string()),
                }
            }

            /// The value as sent on the wire.
            pub fn as_wire(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unrecognized(raw) => raw,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_wire())
            }
        }
    };
}

pub mod ebs;
pub mod image;
pub mod instance;
pub mod key_pair;
pub mod network;
pub mod security_group;
pub mod spot;
pub mod tag;

pub use ebs::*;
pub use image::*;
pub use instance::*;
pub use key_pair::*;
pub use network::*;
pub use security_group::*;
pub use spot::*;
pub use tag::*;
