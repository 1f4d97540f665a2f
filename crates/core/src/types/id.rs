//! Newtype IDs for type-safe entity references.
//!
//! Every table keyed by a `SERIAL` column gets its own ID type so a cart line
//! ID can never be passed where a product ID is expected.

/// Define a type-safe ID wrapper around an `i32` primary key.
///
/// The generated type is `Copy`, orders and hashes like the underlying
/// integer, serializes transparently, and (with the `postgres` feature)
/// binds and decodes as a Postgres `INT4`.
///
/// # Example
///
/// ```rust
/// # use mercado_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShelfId);
///
/// let warehouse = WarehouseId::new(1);
/// let shelf = ShelfId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shelf;
/// # let _ = (warehouse, shelf);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Accounts
define_id!(UserId);
define_id!(AddressId);

// Catalog
define_id!(CategoryId);
define_id!(ProductId);

// Cart
define_id!(CartId);
define_id!(CartLineId);

// Orders and payments
define_id!(OrderId);
define_id!(OrderLineId);
define_id!(PaymentId);
define_id!(PaymentMethodId);
