//! Database row types — these map directly to SQLite rows.
//! Distinct from the railboard-types API models to keep the DB layer
//! independent.

use anyhow::{Context, Result};

use railboard_types::models::Widget;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

/// A stored widget: denormalized columns for querying plus the full
/// serialized record.
pub struct WidgetRow {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub enabled: bool,
    pub record: String,
    pub created_at: String,
}

impl WidgetRow {
    pub fn into_widget(self) -> Result<Widget> {
        serde_json::from_str(&self.record)
            .with_context(|| format!("corrupt widget record {}", self.id))
    }
}
