//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant gets a snake_case constructor. Field parameters take
//! `impl Into<T>`, so adapters can pass `&str` or a formatted `String`
//! straight into `Query { message }` style variants.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build a `", stringify!($variant), "` error.")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Build a `", stringify!($variant), "` error.")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $(#[doc = stringify!($field)] $field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    define_port_error! {
        /// Store failures shaped like the real port errors.
        pub enum SampleStoreError {
            Query { message: String } => "store query failed: {message}",
            Contention { attempts: u32 } => "gave up after {attempts} attempts",
            Rejected { code: u16, message: String } => "rejected ({code}): {message}",
            NotFound => "document not found",
        }
    }

    #[rstest]
    #[case::borrowed_message(SampleStoreError::query("timeout"), "store query failed: timeout")]
    #[case::owned_message(
        SampleStoreError::query(format!("row {}", 3)),
        "store query failed: row 3"
    )]
    #[case::numeric_field(SampleStoreError::contention(5_u32), "gave up after 5 attempts")]
    #[case::mixed_fields(SampleStoreError::rejected(409_u16, "stale"), "rejected (409): stale")]
    #[case::unit_variant(SampleStoreError::not_found(), "document not found")]
    fn constructors_render_their_messages(#[case] error: SampleStoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn constructors_build_the_named_variant() {
        assert_eq!(
            SampleStoreError::contention(2_u32),
            SampleStoreError::Contention { attempts: 2 }
        );
    }
}
