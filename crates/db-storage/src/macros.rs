// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

/// Allows to create one or more typed ids
///
/// Defines the type and implements a variety of traits for it to be usable with diesel.
/// The sql type is taken as `::` separated segments so it can be spliced
/// into the diesel derive attribute.
/// See <https://stackoverflow.com/a/59948116> for more information.
#[macro_export]
macro_rules! diesel_newtype {
    ($($(#[$meta:meta])* $name:ident($to_wrap:ty) => $($sql_type:ident)::+),+) => {
        pub use __newtype_impl::{$($name),+};

        mod __newtype_impl {
            use diesel::deserialize::{self, FromSql};
            use diesel::pg::{Pg, PgValue};
            use diesel::serialize::{self, Output, ToSql};
            use serde::{Deserialize, Serialize};
            use std::fmt;

            $(

            #[derive(
                Debug,
                Clone,
                PartialEq,
                Eq,
                PartialOrd,
                Ord,
                Hash,
                Serialize,
                Deserialize,
                AsExpression,
                FromSqlRow,
            )]
            $(#[$meta])*
            #[diesel(sql_type = $($sql_type)::+)]
            pub struct $name($to_wrap);

            impl $name {
                pub const fn from(inner: $to_wrap) -> Self {
                    Self(inner)
                }

                pub fn inner(&self) -> &$to_wrap {
                    &self.0
                }

                pub fn into_inner(self) -> $to_wrap {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl ToSql<$($sql_type)::+, Pg> for $name
            where
                $to_wrap: ToSql<$($sql_type)::+, Pg>,
            {
                fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                    <$to_wrap as ToSql<$($sql_type)::+, Pg>>::to_sql(&self.0, out)
                }
            }

            impl FromSql<$($sql_type)::+, Pg> for $name
            where
                $to_wrap: FromSql<$($sql_type)::+, Pg>,
            {
                fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
                    <$to_wrap as FromSql<$($sql_type)::+, Pg>>::from_sql(bytes).map(Self)
                }
            }

            )+
        }
    };
}

/// Creates the mapping between a PostgreSQL enum type and a Rust enum
///
/// Defines the SQL type marker struct together with the enum and its
/// to-/from-sql conversions. The given byte literals must match the
/// variants of the enum type created in the migration.
macro_rules! sql_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident,
        $sql_type_lit:tt,
        $type_name:ident,
        {
            $($variant:ident = $variant_lit:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, SqlType, QueryId)]
        #[diesel(postgres_type(name = $sql_type_lit))]
        pub struct $type_name;

        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
        #[diesel(sql_type = $type_name)]
        pub enum $enum_name {
            $($variant,)+
        }

        impl diesel::serialize::ToSql<$type_name, diesel::pg::Pg> for $enum_name {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, diesel::pg::Pg>,
            ) -> diesel::serialize::Result {
                use std::io::Write;

                match *self {
                    $(Self::$variant => out.write_all($variant_lit)?,)+
                }

                Ok(diesel::serialize::IsNull::No)
            }
        }

        impl diesel::deserialize::FromSql<$type_name, diesel::pg::Pg> for $enum_name {
            fn from_sql(
                bytes: diesel::pg::PgValue<'_>,
            ) -> diesel::deserialize::Result<Self> {
                match bytes.as_bytes() {
                    $($variant_lit => Ok(Self::$variant),)+
                    _ => Err("unrecognized enum variant".into()),
                }
            }
        }
    };
}
