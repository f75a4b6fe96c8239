// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boilerplate macros for status types, test fixtures, and poller config.
//!
//! - [`simple_display!`]: wire label per enum variant as `Display`
//! - [`builder!`]: fixture builder for directory entries, test-only
//! - [`setters!`]: chained `with`-style setters on config structs

/// `Display` for an enum whose variants each print as one fixed label,
/// usually the label the backend uses on the wire.
///
/// ```ignore
/// crate::simple_display! {
///     Schedule {
///         Daily => "DAILY",
///         Once => "ONCE",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $label:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $label, )+
                })
            }
        }
    };
}

/// Fixture builder: `$target::builder()` returns a `$builder` holding test
/// defaults, with one setter per field and `build()`.
///
/// Only compiled for tests and the `test-support` feature. `into` setters
/// take `impl Into<T>`, `set` setters take `T`, and `option` fields start
/// at their default and are wrapped in `Some` when set.
///
/// ```ignore
/// crate::builder! {
///     pub struct RepositoryBuilder => Repository {
///         into { id: RepositoryId = "1" }
///         set { enabled: bool = false }
///         option { date_stamp: String = None }
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            into { $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)? }
            set { $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)? }
            option { $( $opt_field:ident : $opt_ty:ty = $opt_default:expr ),* $(,)? }
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $into_field: $into_ty, )*
            $( $set_field: $set_ty, )*
            $( $opt_field: Option<$opt_ty>, )*
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $into_field: $into_default.into(), )*
                    $( $set_field: $set_default, )*
                    $( $opt_field: $opt_default, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $into_field(mut self, v: impl Into<$into_ty>) -> Self {
                    self.$into_field = v.into();
                    self
                }
            )*
            $(
                pub fn $set_field(mut self, v: $set_ty) -> Self {
                    self.$set_field = v;
                    self
                }
            )*
            $(
                pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                    self.$opt_field = Some(v.into());
                    self
                }
            )*

            pub fn build(self) -> $target {
                $target {
                    $( $into_field: self.$into_field, )*
                    $( $set_field: self.$set_field, )*
                    $( $opt_field: self.$opt_field, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// By-value setters for config structs, expanded inside an `impl` block.
///
/// ```ignore
/// impl PollerConfig {
///     hc_core::setters! {
///         set { interval: Duration, fast_interval: Duration }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (set { $( $field:ident : $ty:ty ),* $(,)? }) => {
        $(
            pub fn $field(mut self, v: $ty) -> Self {
                self.$field = v;
                self
            }
        )*
    };
}
