//! SQLite-backed transaction store.
//!
//! Memberships live in `transaction_item`, display names in `item`. The store
//! also acts as the level sink: each frequent level is materialized as a table
//! `L<k>` with columns `item_1..item_k, count` that outlives the run.

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};

use super::{LevelSink, ScriptExecutor, TransactionStore};
use crate::apriori::{FrequentLevel, ItemId, TransactionId};
use crate::error::{StoreError, StoreResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS item (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS transaction_item (
        transaction_id INTEGER NOT NULL,
        item_id        INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transaction_item_item
        ON transaction_item (item_id, transaction_id);
    CREATE INDEX IF NOT EXISTS idx_transaction_item_transaction
        ON transaction_item (transaction_id, item_id);
";

// ?1 = prefix as a JSON array, ?2 = max(prefix), ?3 = prefix length.
const EXTENSION_QUERY: &str = "
    SELECT ext.item_id, ext.transaction_id
    FROM transaction_item AS ext
    WHERE ext.item_id > ?2
      AND ext.transaction_id IN (
          SELECT transaction_id
          FROM transaction_item
          WHERE item_id IN (SELECT value FROM json_each(?1))
          GROUP BY transaction_id
          HAVING COUNT(DISTINCT item_id) = ?3
      )
";

/// Name of the table a level of size `itemset_size` is persisted under.
pub fn level_table_name(itemset_size: usize) -> String {
    format!("L{itemset_size}")
}

fn is_level_table(name: &str) -> bool {
    name.len() > 1
        && name.starts_with('L')
        && name[1..].bytes().all(|b| b.is_ascii_digit())
}

/// One scoped connection held for the lifetime of a run; released on drop.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store backed by a file on disk, creating the schema if missing.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::with_connection(conn)
    }

    /// Open a database file that must already exist.
    ///
    /// Unlike [`SqliteStore::open`] a missing file is an error, so a mistyped
    /// database name never leaves an empty database behind.
    pub fn open_existing(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Unavailable {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Close the connection, surfacing any error instead of dropping it.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))
    }

    pub fn insert_item(&self, item: ItemId, name: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO item (id, name) VALUES (?1, ?2)",
            params![item, name],
        )?;
        Ok(())
    }

    pub fn insert_membership(&self, transaction: TransactionId, item: ItemId) -> StoreResult<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO transaction_item (transaction_id, item_id) VALUES (?1, ?2)",
            )?
            .execute(params![transaction, item])?;
        Ok(())
    }

    /// Names of the level tables currently present, ordered by level.
    pub fn level_tables(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name GLOB 'L[0-9]*'",
        )?;
        let mut names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        names.retain(|name| is_level_table(name));
        names.sort_by_key(|name| name[1..].parse::<usize>().unwrap_or(usize::MAX));
        Ok(names)
    }

    /// Read a persisted level back, ordered by its members.
    pub fn load_level(&self, itemset_size: usize) -> StoreResult<Option<FrequentLevel>> {
        let table = level_table_name(itemset_size);
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists || itemset_size == 0 {
            return Ok(None);
        }

        let columns = member_columns(itemset_size);
        let sql = format!("SELECT {columns}, count FROM \"{table}\" ORDER BY {columns}");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut level = FrequentLevel::new(itemset_size);
        let mut members = Vec::with_capacity(itemset_size);
        while let Some(row) = rows.next()? {
            members.clear();
            for idx in 0..itemset_size {
                members.push(row.get::<_, ItemId>(idx)?);
            }
            let count: i64 = row.get(itemset_size)?;
            level.add_itemset_with_support(&members, count as usize);
        }
        Ok(Some(level))
    }

    fn drop_level_table(&self, itemset_size: usize) -> StoreResult<()> {
        let table = level_table_name(itemset_size);
        self.conn.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\""))?;
        Ok(())
    }
}

fn member_columns(itemset_size: usize) -> String {
    (1..=itemset_size)
        .map(|idx| format!("item_{idx}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl TransactionStore for SqliteStore {
    fn item_catalog(&self) -> StoreResult<Vec<ItemId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT DISTINCT item_id FROM transaction_item ORDER BY item_id")?;
        let items = stmt
            .query_map([], |row| row.get::<_, ItemId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn support_of(&self, item: ItemId) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .prepare_cached(
                "SELECT COUNT(DISTINCT transaction_id) FROM transaction_item WHERE item_id = ?1",
            )?
            .query_row(params![item], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn co_occurring_extension<F>(&self, prefix: &[ItemId], mut visit: F) -> StoreResult<()>
    where
        F: FnMut(ItemId, TransactionId),
    {
        let Some(&last) = prefix.iter().max() else {
            return Ok(());
        };
        let encoded = serde_json::to_string(prefix)
            .map_err(|e| StoreError::Encoding { message: e.to_string() })?;

        let mut stmt = self.conn.prepare_cached(EXTENSION_QUERY)?;
        let mut rows = stmt.query(params![encoded, last, prefix.len() as i64])?;
        while let Some(row) = rows.next()? {
            visit(row.get(0)?, row.get(1)?);
        }
        Ok(())
    }

    fn name_of(&self, item: ItemId) -> StoreResult<Option<String>> {
        let name = self
            .conn
            .prepare_cached("SELECT name FROM item WHERE id = ?1")?
            .query_row(params![item], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(name)
    }
}

impl LevelSink for SqliteStore {
    fn begin_run(&self) -> StoreResult<()> {
        for table in self.level_tables()? {
            tracing::debug!(table = %table, "dropping level table from a previous run");
            self.conn.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\""))?;
        }
        Ok(())
    }

    fn persist_level(&self, level: &FrequentLevel) -> StoreResult<()> {
        let size = level.itemset_size;
        let table = level_table_name(size);
        self.drop_level_table(size)?;

        let definitions = (1..=size)
            .map(|idx| format!("item_{idx} INTEGER NOT NULL"))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn.execute_batch(&format!(
            "CREATE TABLE \"{table}\" ({definitions}, count INTEGER NOT NULL)"
        ))?;

        let placeholders = vec!["?"; size + 1].join(", ");
        let mut insert = self.conn.prepare(&format!(
            "INSERT INTO \"{table}\" ({}, count) VALUES ({placeholders})",
            member_columns(size)
        ))?;
        for (members, support) in level.iter() {
            let values = members.iter().copied().chain(std::iter::once(support as i64));
            insert.execute(params_from_iter(values))?;
        }

        tracing::debug!(table = %table, rows = level.len(), "materialized level table");
        Ok(())
    }

    fn discard_level(&self, itemset_size: usize) -> StoreResult<()> {
        tracing::debug!(
            table = %level_table_name(itemset_size),
            rows = 0,
            "dropping empty level table"
        );
        self.drop_level_table(itemset_size)
    }
}

impl ScriptExecutor for SqliteStore {
    fn execute_script(&self, sql: &str) -> StoreResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}
