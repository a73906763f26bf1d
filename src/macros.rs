//! Declarative helpers that stand in for per-type generated code.
//!
//! - `string_enum!` declares an enum value set that tolerates values it does not know.
//! - `tagged_union!` declares a discriminated union and its dispatch table.
//! - `tagged_response!` declares an operation response with header slots and a body slot.

/// Declares a string-backed enum value set.
///
/// Values outside the table decode to `Unknown(String)` and are kept verbatim, so a
/// service that grows a new lifecycle state never breaks decoding.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not know about, stored exactly as received.
            Unknown(String),
        }

        impl $name {
            /// The canonical wire values of this set.
            pub const KNOWN_VALUES: &'static [&'static str] = &[$($wire),+];

            /// Returns the wire value.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unknown(value) => value.as_str(),
                }
            }

            /// Returns `false` for values outside the known set.
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl ::core::convert::From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => $name::$variant, )+
                    other => $name::Unknown(other.to_owned()),
                }
            }
        }

        impl ::core::convert::From<::std::string::String> for $name {
            fn from(value: ::std::string::String) -> Self {
                $name::from(value.as_str())
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                let value =
                    <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::from(value))
            }
        }

        impl $crate::schema::ParamValue for $name {
            fn to_param(&self) -> Option<::std::string::String> {
                Some(self.as_str().to_owned())
            }
        }
    };
}

/// Declares a discriminated union over concrete variant records.
///
/// The literal after the enum name is the discriminator key; each arm maps a
/// discriminator value to a variant constructor. Adding a variant means adding
/// an arm here and nothing else.
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $field:literal {
            $( $(#[$vmeta:meta])* $tag:literal => $variant:ident($inner:ty), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant($inner), )+
            /// A variant this client does not know about. The raw JSON is preserved.
            Unknown($crate::polymorphic::UnknownVariant),
        }

        impl $crate::polymorphic::Polymorphic for $name {
            const DISCRIMINATOR: &'static str = $field;

            fn from_variant(
                tag: &str,
                raw: &::serde_json::value::RawValue,
            ) -> Option<::serde_json::Result<Self>> {
                match tag {
                    $( $tag => Some(::serde_json::from_str(raw.get()).map($name::$variant)), )+
                    _ => None,
                }
            }

            fn from_unknown(unknown: $crate::polymorphic::UnknownVariant) -> Self {
                $name::Unknown(unknown)
            }

            fn discriminator(&self) -> Option<&str> {
                match self {
                    $( $name::$variant(_) => Some($tag), )+
                    $name::Unknown(unknown) => unknown.discriminator(),
                }
            }

            fn as_unknown(&self) -> Option<&$crate::polymorphic::UnknownVariant> {
                match self {
                    $name::Unknown(unknown) => Some(unknown),
                    _ => None,
                }
            }

            fn to_json(&self) -> ::serde_json::Result<::serde_json::Value> {
                match self {
                    $(
                        $name::$variant(inner) => {
                            $crate::polymorphic::tagged_object($field, $tag, inner)
                        }
                    )+
                    $name::Unknown(unknown) => unknown.to_json(),
                }
            }
        }

        impl $name {
            /// Returns `true` when the payload carried a discriminator this client does not know.
            pub fn is_unknown(&self) -> bool {
                matches!(self, $name::Unknown(_))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                $crate::polymorphic::serialize(self, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                $crate::polymorphic::deserialize(deserializer)
            }
        }

        $(
            impl ::core::convert::From<$inner> for $name {
                fn from(value: $inner) -> Self {
                    $name::$variant(value)
                }
            }
        )+
    };
}

/// Declares the typed response of one operation.
///
/// `body` names the slot the decoded payload lands in; every `header` line maps a
/// field to the wire name it is read from.
macro_rules! tagged_response {
    (@body_ty $ty:ty) => { $ty };
    (@body_ty) => { () };

    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( body $body:ident : $body_ty:ty, )?
            $( $(#[$hmeta:meta])* header $field:ident : $fty:ty = $wire:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            /// The HTTP response this value was decoded from. Its body is already drained.
            pub raw_response: $crate::response::RawResponse,
            $( pub $body: Option<$body_ty>, )?
            $( $(#[$hmeta])* pub $field: $fty, )*
        }

        impl $crate::schema::TaggedResponse for $name {
            type Body = tagged_response!(@body_ty $($body_ty)?);

            fn from_raw(raw_response: $crate::response::RawResponse) -> Self {
                $name {
                    raw_response,
                    $( $body: None, )?
                    $( $field: ::core::default::Default::default(), )*
                }
            }

            fn read_headers(
                &mut self,
                headers: &$crate::schema::HeaderReader<'_>,
            ) -> ::core::result::Result<(), $crate::schema::HeaderValueError> {
                $( self.$field = headers.get($wire)?; )*
                let _ = headers;
                Ok(())
            }

            #[allow(unused_variables)]
            fn set_body(&mut self, body: Self::Body) {
                $( self.$body = Some(body); )?
            }

            fn raw_response(&self) -> &$crate::response::RawResponse {
                &self.raw_response
            }
        }
    };
}
