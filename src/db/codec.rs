//! Decoding of closed enums stored as TEXT. Values go through the same
//! normalizing parser as API input, so rows written with older casing
//! (`draft`, `nodal_officer`) still load.

use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, PgValueRef};
use sqlx::{Decode, Postgres, Type};

use crate::models::TenantKind;
use crate::workflow::{CommentKind, Role, SubmissionStatus};

macro_rules! text_column {
    ($ty:ty) => {
        impl Type<Postgres> for $ty {
            fn type_info() -> PgTypeInfo {
                <String as Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let raw = <&'r str as Decode<'r, Postgres>>::decode(value)?;
                Ok(raw.parse::<$ty>()?)
            }
        }
    };
}

text_column!(SubmissionStatus);
text_column!(Role);
text_column!(CommentKind);
text_column!(TenantKind);
