//! Declaration macros for marshallable structs and enums.
//!
//! [`schema!`](crate::schema!) declares a struct together with its default
//! values and field registrations; [`schema_enum!`](crate::schema_enum!)
//! declares an enumeration whose constants resolve case-insensitively on
//! read.

/// Declares a struct with per-field defaults and registers its members for
/// marshalling.
///
/// Every field carries a default after `=`; field options after `=>` are
/// chained calls on [`FieldDescriptor`](crate::FieldDescriptor), applied
/// in order.
///
/// # Examples
///
/// ```rust
/// use yamlish::schema;
///
/// schema! {
///     pub struct ServerConfig {
///         pub host: String = "localhost".to_string()
///             => comment_same_line("no protocol prefix"),
///         pub port: u16 = 25565,
///         pub motd: Option<String> = None
///             => with_node_name("message-of-the-day"),
///     }
/// }
///
/// let config = ServerConfig::default();
/// assert_eq!(config.port, 25565);
/// ```
#[macro_export]
macro_rules! schema {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $fname:ident : $fty:ty = $default:expr
                $(=> $($opt:ident ( $($arg:tt)* )).+)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $fname : $fty,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                $name {
                    $($fname : $default,)*
                }
            }
        }

        impl $crate::Schema for $name {
            fn fields() -> ::std::vec::Vec<$crate::FieldDescriptor> {
                ::std::vec![
                    $(
                        $crate::FieldDescriptor::new(
                            stringify!($fname),
                            <$fty as $crate::FieldType>::descriptor(),
                        )
                        .with_type_id(<$fty as $crate::FieldType>::type_id())
                        $($(.$opt($($arg)*))+)?
                    ),*
                ]
            }

            fn get_field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $(
                        stringify!($fname) => ::std::option::Option::Some(
                            $crate::FieldType::to_value(&self.$fname),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Value,
            ) -> $crate::Result<()> {
                match name {
                    $(
                        stringify!($fname) => {
                            self.$fname = <$fty as $crate::FieldType>::from_value(value)?;
                            ::std::result::Result::Ok(())
                        }
                    )*
                    _ => ::std::result::Result::Err($crate::Error::unknown_field(name)),
                }
            }
        }

        impl $crate::FieldType for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Composite(<Self as $crate::Schema>::fields)
            }

            fn type_id() -> &'static str {
                stringify!($name)
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Mapping($crate::schema::collect(self))
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                let mut result = <Self as ::std::default::Default>::default();
                $crate::schema::apply(&mut result, value)?;
                ::std::result::Result::Ok(result)
            }
        }
    };
}

/// Declares an enumeration usable as a field type.
///
/// Constants are written under their declared names and matched
/// case-insensitively on read.
///
/// # Examples
///
/// ```rust
/// use yamlish::{schema_enum, FieldType, Value};
///
/// schema_enum! {
///     pub enum Difficulty {
///         Peaceful,
///         Easy,
///         Normal,
///         Hard,
///     }
/// }
///
/// assert_eq!(Difficulty::Hard.to_value(), Value::from("Hard"));
/// ```
#[macro_export]
macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// The declared constant names, in order.
            pub const CONSTANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

            /// The constant name of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }
        }

        impl $crate::FieldType for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Scalar($crate::ScalarKind::Enum(Self::CONSTANTS))
            }

            fn type_id() -> &'static str {
                stringify!($name)
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::String(self.as_str().to_string())
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                match value {
                    $crate::Value::String(text) => match text.as_str() {
                        $(stringify!($variant) => ::std::result::Result::Ok($name::$variant),)+
                        other => ::std::result::Result::Err(
                            $crate::Error::unknown_enum_value(other, Self::CONSTANTS),
                        ),
                    },
                    other => ::std::result::Result::Err($crate::Error::type_mismatch(
                        stringify!($name),
                        other.kind_name(),
                    )),
                }
            }
        }
    };
}
