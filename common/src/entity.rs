//! Entity kinds and their storage descriptors.
//!
//! Every collection exposed by Cadastros has the same behavioural shape. The
//! only thing that differs between them is an [`EntityDescriptor`]: the table
//! name, the ordered list of writable columns, the sort column and the columns
//! that must be present on create.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Entity Kind
// =============================================================================

/// The four managed collections.
///
/// The serialized form is also the URL segment (`/api/teams`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Teams,
    Systems,
    Clients,
    Statuses,
}

impl EntityKind {
    /// All kinds, in display order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Teams,
        EntityKind::Systems,
        EntityKind::Clients,
        EntityKind::Statuses,
    ];

    /// URL segment and wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Teams => "teams",
            EntityKind::Systems => "systems",
            EntityKind::Clients => "clients",
            EntityKind::Statuses => "statuses",
        }
    }

    /// Static storage descriptor for this kind.
    pub fn descriptor(&self) -> &'static EntityDescriptor {
        match self {
            EntityKind::Teams => &TEAMS,
            EntityKind::Systems => &SYSTEMS,
            EntityKind::Clients => &CLIENTS,
            EntityKind::Statuses => &STATUSES,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name an entity kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity '{0}' (expected one of: teams, systems, clients, statuses)")]
pub struct UnknownEntity(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teams" => Ok(EntityKind::Teams),
            "systems" => Ok(EntityKind::Systems),
            "clients" => Ok(EntityKind::Clients),
            "statuses" => Ok(EntityKind::Statuses),
            other => Err(UnknownEntity(other.to_string())),
        }
    }
}

// =============================================================================
// Entity Descriptor
// =============================================================================

/// Storage shape of one entity collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    /// Table holding the rows.
    pub table: &'static str,
    /// Writable columns, in statement order.
    pub columns: &'static [&'static str],
    /// Column used for `ORDER BY` in listings.
    pub order_by: &'static str,
    /// Primary key column (assigned by the store).
    pub id_column: &'static str,
    /// Columns that must be non-empty on create.
    pub required_columns: &'static [&'static str],
}

impl EntityDescriptor {
    /// Descriptor ordered and keyed by `id`, with no required columns.
    pub const fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            order_by: "id",
            id_column: "id",
            required_columns: &[],
        }
    }

    pub const fn order_by(mut self, column: &'static str) -> Self {
        self.order_by = column;
        self
    }

    pub const fn required(mut self, columns: &'static [&'static str]) -> Self {
        self.required_columns = columns;
        self
    }

    /// Whether `column` is one of the writable columns.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }
}

pub static TEAMS: EntityDescriptor = EntityDescriptor::new("teams", &["name", "email", "phone", "role"])
    .order_by("name")
    .required(&["name"]);

pub static SYSTEMS: EntityDescriptor = EntityDescriptor::new("systems", &["name", "description"])
    .order_by("name")
    .required(&["name"]);

pub static CLIENTS: EntityDescriptor = EntityDescriptor::new("clients", &["name", "email", "phone", "company"])
    .order_by("name")
    .required(&["name"]);

pub static STATUSES: EntityDescriptor = EntityDescriptor::new("statuses", &["name", "color"])
    .order_by("name")
    .required(&["name"]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_url_segment() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "projects".parse::<EntityKind>().unwrap_err();
        assert!(err.to_string().contains("projects"));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EntityKind::Statuses).unwrap();
        assert_eq!(json, "\"statuses\"");
    }

    #[test]
    fn test_descriptors_match_tables() {
        assert_eq!(EntityKind::Teams.descriptor().columns, &["name", "email", "phone", "role"]);
        assert_eq!(EntityKind::Systems.descriptor().columns, &["name", "description"]);
        assert_eq!(EntityKind::Clients.descriptor().columns, &["name", "email", "phone", "company"]);
        assert_eq!(EntityKind::Statuses.descriptor().columns, &["name", "color"]);

        for kind in EntityKind::ALL {
            let d = kind.descriptor();
            assert_eq!(d.table, kind.as_str());
            assert_eq!(d.order_by, "name");
            assert_eq!(d.id_column, "id");
            assert_eq!(d.required_columns, &["name"]);
        }
    }

    #[test]
    fn test_descriptor_defaults() {
        const PLAIN: EntityDescriptor = EntityDescriptor::new("things", &["label"]);
        assert_eq!(PLAIN.order_by, "id");
        assert!(PLAIN.required_columns.is_empty());
        assert!(PLAIN.has_column("label"));
        assert!(!PLAIN.has_column("id"));
    }
}
