use std::path::Path;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use cart_domain::{Item, ItemId, ItemPatch, ItemStatus, ItemType, NewItem};

use crate::store::{GroceryStore, StoreError};

/// SQLite-backed implementation of the GroceryStore trait.
///
/// `stores` and `tags` are persisted as JSON value-lists, `status` and
/// `aisle` as nullable text, timestamps as epoch milliseconds.
pub struct SqliteGroceryStore {
    conn: Mutex<Connection>,
}

impl SqliteGroceryStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                quantity REAL NOT NULL DEFAULT 0,
                unit TEXT NOT NULL DEFAULT '',
                status TEXT,
                item_type TEXT NOT NULL DEFAULT 'grocery',
                stores TEXT NOT NULL DEFAULT '[]',
                aisle TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_at);
            CREATE INDEX IF NOT EXISTS idx_items_status ON items(status);
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
        Ok(())
    }

    fn insert_item(conn: &Connection, item: &Item) -> Result<(), StoreError> {
        let stores_json =
            serde_json::to_string(&item.stores).map_err(|e| StoreError::Storage(e.to_string()))?;
        let tags_json =
            serde_json::to_string(&item.tags).map_err(|e| StoreError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT INTO items (id, name, quantity, unit, status, item_type, stores, aisle, tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                item.id.to_string(),
                item.name,
                item.quantity,
                item.unit,
                item.status.map(|s| s.to_string()),
                item.item_type.label(),
                stores_json,
                item.aisle,
                tags_json,
                item.created_at.timestamp_millis(),
                item.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| StoreError::Storage(format!("insert: {}", e)))?;
        Ok(())
    }

    fn update_item(conn: &Connection, item: &Item) -> Result<(), StoreError> {
        let stores_json =
            serde_json::to_string(&item.stores).map_err(|e| StoreError::Storage(e.to_string()))?;
        let tags_json =
            serde_json::to_string(&item.tags).map_err(|e| StoreError::Storage(e.to_string()))?;

        conn.execute(
            "UPDATE items SET name = ?2, quantity = ?3, unit = ?4, status = ?5, item_type = ?6,
                              stores = ?7, aisle = ?8, tags = ?9, updated_at = ?10
             WHERE id = ?1",
            params![
                item.id.to_string(),
                item.name,
                item.quantity,
                item.unit,
                item.status.map(|s| s.to_string()),
                item.item_type.label(),
                stores_json,
                item.aisle,
                tags_json,
                item.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| StoreError::Storage(format!("update: {}", e)))?;
        Ok(())
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> Result<Item, StoreError> {
        let id_str: String = row
            .get(0)
            .map_err(|e| StoreError::Storage(format!("row id: {}", e)))?;
        let id: ItemId =
            uuid::Uuid::parse_str(&id_str).map_err(|e| StoreError::Storage(e.to_string()))?;

        let name: String = row
            .get(1)
            .map_err(|e| StoreError::Storage(format!("row name: {}", e)))?;
        let quantity: f64 = row
            .get(2)
            .map_err(|e| StoreError::Storage(format!("row quantity: {}", e)))?;
        let unit: String = row
            .get(3)
            .map_err(|e| StoreError::Storage(format!("row unit: {}", e)))?;
        let status_str: Option<String> = row
            .get(4)
            .map_err(|e| StoreError::Storage(format!("row status: {}", e)))?;
        let type_str: String = row
            .get(5)
            .map_err(|e| StoreError::Storage(format!("row item_type: {}", e)))?;
        let stores_json: String = row
            .get(6)
            .map_err(|e| StoreError::Storage(format!("row stores: {}", e)))?;
        let aisle: Option<String> = row
            .get(7)
            .map_err(|e| StoreError::Storage(format!("row aisle: {}", e)))?;
        let tags_json: String = row
            .get(8)
            .map_err(|e| StoreError::Storage(format!("row tags: {}", e)))?;
        let created_ms: i64 = row
            .get(9)
            .map_err(|e| StoreError::Storage(format!("row created_at: {}", e)))?;
        let updated_ms: i64 = row
            .get(10)
            .map_err(|e| StoreError::Storage(format!("row updated_at: {}", e)))?;

        let status = match status_str.as_deref() {
            None => None,
            Some("pending") => Some(ItemStatus::Pending),
            Some("purchased") => Some(ItemStatus::Purchased),
            Some("skipped") => Some(ItemStatus::Skipped),
            Some(other) => {
                return Err(StoreError::Storage(format!("unknown status: {}", other)))
            }
        };
        let item_type = match type_str.as_str() {
            "supply" => ItemType::Supply,
            "clothing" => ItemType::Clothing,
            "other" => ItemType::Other,
            _ => ItemType::Grocery,
        };
        let stores: Vec<String> = serde_json::from_str(&stores_json)
            .map_err(|e| StoreError::Storage(format!("parse stores: {}", e)))?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| StoreError::Storage(format!("parse tags: {}", e)))?;

        let created_at = Utc
            .timestamp_millis_opt(created_ms)
            .single()
            .unwrap_or_else(Utc::now);
        let updated_at = Utc
            .timestamp_millis_opt(updated_ms)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(Item {
            id,
            name,
            quantity,
            unit,
            status,
            item_type,
            stores,
            aisle,
            tags,
            created_at,
            updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, name, quantity, unit, status, item_type, stores, aisle, tags, created_at, updated_at";

/// Current time truncated to the stored precision, so a returned item equals
/// its re-read row.
fn now_millis() -> chrono::DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

impl GroceryStore for SqliteGroceryStore {
    fn list(&self) -> Result<Vec<Item>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let sql = format!(
            // rowid tie-break keeps same-millisecond inserts newest-first.
            "SELECT {} FROM items ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Storage(format!("prepare list: {}", e)))?;
        let rows = stmt
            .query_map([], |row| Ok(Self::row_to_item(row)))
            .map_err(|e| StoreError::Storage(format!("query list: {}", e)))?;

        let mut items = Vec::new();
        for row_result in rows {
            let item = row_result.map_err(|e| StoreError::Storage(format!("row: {}", e)))?;
            items.push(item?);
        }
        Ok(items)
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let sql = format!("SELECT {} FROM items WHERE id = ?1", SELECT_COLUMNS);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Storage(format!("prepare get: {}", e)))?;

        let item = stmt
            .query_row(params![id.to_string()], |row| Ok(Self::row_to_item(row)))
            .optional()
            .map_err(|e| StoreError::Storage(format!("query get: {}", e)))?;

        match item {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn insert(&self, new: NewItem) -> Result<Item, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let item = new.into_item(now_millis());
        Self::insert_item(&conn, &item)?;
        Ok(item)
    }

    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let sql = format!("SELECT {} FROM items WHERE id = ?1", SELECT_COLUMNS);
        let current = {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| StoreError::Storage(format!("prepare update: {}", e)))?;
            stmt.query_row(params![id.to_string()], |row| Ok(Self::row_to_item(row)))
                .optional()
                .map_err(|e| StoreError::Storage(format!("query update: {}", e)))?
        };

        let mut item = match current {
            Some(Ok(item)) => item,
            Some(Err(e)) => return Err(e),
            None => return Err(StoreError::NotFound(id)),
        };

        patch.apply(&mut item, now_millis());
        Self::update_item(&conn, &item)?;
        Ok(item)
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let rows = conn
            .execute("DELETE FROM items WHERE id = ?1", params![id.to_string()])
            .map_err(|e| StoreError::Storage(format!("delete: {}", e)))?;
        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(|e| StoreError::Storage(format!("count: {}", e)))?;
        Ok(count as usize)
    }
}
