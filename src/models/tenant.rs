use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::types::string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TenantKind {
    #[default]
    State,
    Ministry,
}

impl TenantKind {
    pub const ALL: [TenantKind; 2] = [TenantKind::State, TenantKind::Ministry];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenantKind::State => "state",
            TenantKind::Ministry => "ministry",
        }
    }
}

string_enum!(TenantKind, "tenant kind");

/// A jurisdiction (`state`) or the ministry that reviews every jurisdiction.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub kind: TenantKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_ministry(&self) -> bool {
        self.kind == TenantKind::Ministry
    }
}
