use anyhow::{Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use railboard_types::models::Widget;

use crate::Database;
use crate::models::{UserRow, WidgetRow};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Widgets --

    /// Persist a new widget. The caller assigns the id at persistence time;
    /// the primary key enforces uniqueness within the collection.
    pub fn insert_widget(&self, widget: &Widget) -> Result<()> {
        let id = widget
            .id()
            .ok_or_else(|| anyhow!("widget must have an id assigned before persisting"))?;
        let record = serde_json::to_string(widget)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO widgets (id, kind, name, enabled, record) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    id.to_string(),
                    widget.kind(),
                    widget.name(),
                    widget.enabled(),
                    record
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_widget(&self, id: Uuid) -> Result<Option<Widget>> {
        let row = self.with_conn(|conn| query_widget(conn, &id.to_string()))?;
        row.map(WidgetRow::into_widget).transpose()
    }

    /// Widgets for display. Disabled widgets are retained in storage but
    /// only surface when `include_disabled` is set.
    pub fn list_widgets(&self, include_disabled: bool) -> Result<Vec<Widget>> {
        let rows = self.with_conn(|conn| {
            let sql = if include_disabled {
                "SELECT id, kind, name, enabled, record, created_at FROM widgets ORDER BY created_at, id"
            } else {
                "SELECT id, kind, name, enabled, record, created_at FROM widgets WHERE enabled = 1 ORDER BY created_at, id"
            };
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map([], row_to_widget_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(WidgetRow::into_widget).collect()
    }

    /// Replace a stored widget's mutable fields. The id is immutable: the
    /// incoming record must carry the same id it was stored under.
    /// Returns false if no widget with that id exists.
    pub fn update_widget(&self, id: Uuid, widget: &Widget) -> Result<bool> {
        if widget.id() != Some(id) {
            bail!("widget id is immutable once assigned");
        }
        let record = serde_json::to_string(widget)?;

        self.with_conn(|conn| {
            // kind rides along so the denormalized column always matches
            // the stored record.
            let changed = conn.execute(
                "UPDATE widgets SET kind = ?2, name = ?3, enabled = ?4, record = ?5 WHERE id = ?1",
                rusqlite::params![
                    id.to_string(),
                    widget.kind(),
                    widget.name(),
                    widget.enabled(),
                    record
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Returns false if no widget with that id existed.
    pub fn delete_widget(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM widgets WHERE id = ?1", [id.to_string()])?;
            Ok(changed > 0)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, username, password, created_at FROM users WHERE {column} = ?1");
    let row = conn
        .query_row(&sql, [value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn query_widget(conn: &Connection, id: &str) -> Result<Option<WidgetRow>> {
    let row = conn
        .query_row(
            "SELECT id, kind, name, enabled, record, created_at FROM widgets WHERE id = ?1",
            [id],
            row_to_widget_row,
        )
        .optional()?;
    Ok(row)
}

fn row_to_widget_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WidgetRow> {
    Ok(WidgetRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        name: row.get(2)?,
        enabled: row.get(3)?,
        record: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use railboard_types::models::{AlertMessage, GenericWidget, TrainArrivalWidget, Widget};
    use uuid::Uuid;

    use crate::Database;

    fn test_db() -> Database {
        Database::open(Path::new(":memory:")).unwrap()
    }

    fn alert(id: Option<Uuid>, name: &str, enabled: bool) -> Widget {
        Widget::Alert(AlertMessage {
            widget: GenericWidget {
                id,
                name: name.to_string(),
                enabled,
            },
            text: "Track work".to_string(),
        })
    }

    #[test]
    fn insert_requires_an_assigned_id() {
        let db = test_db();
        assert!(db.insert_widget(&alert(None, "Alerts", true)).is_err());
    }

    #[test]
    fn inserted_widgets_round_trip() {
        let db = test_db();
        let id = Uuid::new_v4();
        let widget = Widget::TrainArrival(TrainArrivalWidget {
            widget: GenericWidget {
                id: Some(id),
                name: "Platform board".to_string(),
                enabled: true,
            },
            station_id: "A01".to_string(),
            custom_trains: vec![],
        });

        db.insert_widget(&widget).unwrap();
        assert_eq!(db.get_widget(id).unwrap(), Some(widget));
    }

    #[test]
    fn ids_are_unique_within_the_collection() {
        let db = test_db();
        let id = Uuid::new_v4();
        db.insert_widget(&alert(Some(id), "First", true)).unwrap();
        assert!(db.insert_widget(&alert(Some(id), "Second", true)).is_err());
    }

    #[test]
    fn disabled_widgets_are_retained_but_not_listed() {
        let db = test_db();
        let enabled_id = Uuid::new_v4();
        let disabled_id = Uuid::new_v4();
        db.insert_widget(&alert(Some(enabled_id), "Shown", true))
            .unwrap();
        db.insert_widget(&alert(Some(disabled_id), "Hidden", false))
            .unwrap();

        let active = db.list_widgets(false).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), Some(enabled_id));

        let all = db.list_widgets(true).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(db.get_widget(disabled_id).unwrap().unwrap().name(), "Hidden");
    }

    #[test]
    fn update_cannot_change_the_id() {
        let db = test_db();
        let id = Uuid::new_v4();
        db.insert_widget(&alert(Some(id), "Alerts", true)).unwrap();

        let renamed = alert(Some(Uuid::new_v4()), "Renamed", true);
        assert!(db.update_widget(id, &renamed).is_err());

        let renamed = alert(Some(id), "Renamed", false);
        assert!(db.update_widget(id, &renamed).unwrap());
        let stored = db.get_widget(id).unwrap().unwrap();
        assert_eq!(stored.name(), "Renamed");
        assert!(!stored.enabled());
    }

    #[test]
    fn update_keeps_the_kind_column_in_sync_with_the_record() {
        let db = test_db();
        let id = Uuid::new_v4();
        db.insert_widget(&alert(Some(id), "Alerts", true)).unwrap();

        let arrival = Widget::TrainArrival(TrainArrivalWidget {
            widget: GenericWidget {
                id: Some(id),
                name: "Platform board".to_string(),
                enabled: true,
            },
            station_id: "A01".to_string(),
            custom_trains: vec![],
        });
        assert!(db.update_widget(id, &arrival).unwrap());

        let kind: String = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT kind FROM widgets WHERE id = ?1",
                    [id.to_string()],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(kind, "DCMetroTrainArrivalWidget");
    }

    #[test]
    fn update_and_delete_report_missing_rows() {
        let db = test_db();
        let id = Uuid::new_v4();
        assert!(!db.update_widget(id, &alert(Some(id), "Ghost", true)).unwrap());
        assert!(!db.delete_widget(id).unwrap());
    }
}
