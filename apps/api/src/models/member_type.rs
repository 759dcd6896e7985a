//! Member type model for socialgraph
//!
//! Member types are a fixed, seeded catalogue of tiers a profile belongs to.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identifier of a member tier
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    async_graphql::Enum,
)]
#[sqlx(type_name = "member_type_id", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[graphql(name = "MemberTypeId")]
pub enum MemberTypeId {
    Basic,
    Business,
}

impl MemberTypeId {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Business => "BUSINESS",
        }
    }
}

impl std::fmt::Display for MemberTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member type record from the member_types table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct MemberType {
    /// Tier identifier
    pub id: MemberTypeId,

    /// Discount granted to members of this tier (percent)
    pub discount: f64,

    /// Number of posts a member may publish per month
    pub posts_limit_per_month: i32,
}

impl MemberType {
    /// The catalogue every store is seeded with
    pub fn seeded() -> Vec<Self> {
        vec![
            Self {
                id: MemberTypeId::Basic,
                discount: 2.3,
                posts_limit_per_month: 20,
            },
            Self {
                id: MemberTypeId::Business,
                discount: 7.7,
                posts_limit_per_month: 100,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_type_id_wire_format() {
        assert_eq!(MemberTypeId::Basic.to_string(), "BASIC");
        let json = serde_json::to_string(&MemberTypeId::Business).unwrap();
        assert_eq!(json, "\"BUSINESS\"");
    }

    #[test]
    fn test_seeded_catalogue() {
        let seeded = MemberType::seeded();
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].id, MemberTypeId::Basic);
        assert_eq!(seeded[1].posts_limit_per_month, 100);
    }
}
