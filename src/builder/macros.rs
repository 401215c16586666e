//! Macros for ergonomic state declaration.

/// Declare a state enum together with its `State` implementation, a module
/// of `StateKind` constants and a flat `StateCatalog`.
///
/// Variants may be unit-like or carry named fields. The kind constants keep
/// the variant names, so they are usable as `kinds::Variant`.
///
/// # Example
///
/// ```
/// use stategraph::core::State;
/// use stategraph::state_enum;
///
/// state_enum! {
///     pub enum AuthState => auth_kinds {
///         LoggedOut,
///         LoggingIn { user: String, password: String },
///         LoggedIn { user: String },
///     }
/// }
///
/// let state = AuthState::LoggedIn { user: "ada".into() };
/// assert_eq!(state.kind(), auth_kinds::LoggedIn);
/// assert_eq!(auth_kinds::ALL.len(), 3);
/// assert_eq!(AuthState::catalog().leaves().len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident => $kinds:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $ty:ty),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $({ $($field : $ty),* })?
            ),*
        }

        #[allow(non_upper_case_globals, dead_code)]
        $vis mod $kinds {
            $(
                pub const $variant: $crate::core::StateKind =
                    $crate::core::StateKind::new(stringify!($variant));
            )*

            /// Every variant, in declaration order.
            pub const ALL: &[$crate::core::StateKind] = &[$($variant),*];
        }

        impl $crate::core::State for $name {
            fn kind(&self) -> $crate::core::StateKind {
                match self {
                    $(Self::$variant { .. } => $kinds::$variant),*
                }
            }
        }

        impl $name {
            /// Flat catalog of every declared variant.
            #[allow(dead_code)]
            pub fn catalog() -> $crate::graph::StateCatalog {
                $crate::graph::StateCatalog::new(stringify!($name))
                    $(.state($kinds::$variant))*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState => test_kinds {
            Initial,
            Processing { job: u32 },
            Complete,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Initial.kind(), test_kinds::Initial);
        assert_eq!(TestState::Processing { job: 4 }.name(), "Processing");
        assert!(TestState::Complete.is(test_kinds::Complete));
    }

    #[test]
    fn state_enum_lists_kinds_in_order() {
        assert_eq!(
            test_kinds::ALL,
            &[
                test_kinds::Initial,
                test_kinds::Processing,
                test_kinds::Complete
            ]
        );
    }

    #[test]
    fn state_enum_builds_flat_catalog() {
        let catalog = TestState::catalog();

        assert_eq!(catalog.base_name(), "TestState");
        assert_eq!(catalog.leaves(), test_kinds::ALL.to_vec());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState => public_kinds {
                A,
                B,
            }
        }

        let _state = PublicState::A;
        assert_eq!(public_kinds::B.name(), "B");
    }
}
