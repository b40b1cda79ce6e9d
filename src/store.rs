//! SQLite-backed catalog.
//!
//! The whole catalog lives as one JSON document under a single namespaced
//! key of a `kv_store` table, next to the calculator [`Workspace`]. Every
//! mutation rewrites that document.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::catalog::{
    InMemoryRepository, NewProduct, ProductRepository, ProductUpdate, Workspace,
};
use crate::error::CatalogError;
use crate::model::Product;

pub const DEFAULT_STORAGE_KEY: &str = "ecommerce-calculator";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogState {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(flatten)]
    workspace: Workspace,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    state: CatalogState,
    #[serde(default)]
    version: u32,
}

pub struct SqliteRepository {
    conn: Connection,
    key: String,
}

impl SqliteRepository {
    pub fn open<P: AsRef<Path>>(path: P, key: &str) -> Result<Self, CatalogError> {
        Self::with_connection(Connection::open(path)?, key)
    }

    pub fn open_in_memory(key: &str) -> Result<Self, CatalogError> {
        Self::with_connection(Connection::open_in_memory()?, key)
    }

    fn with_connection(conn: Connection, key: &str) -> Result<Self, CatalogError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteRepository {
            conn,
            key: key.to_string(),
        })
    }

    fn load(&self) -> Result<CatalogState, CatalogError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => {
                let snapshot: Snapshot = serde_json::from_str(&json)?;
                Ok(snapshot.state)
            }
            None => Ok(CatalogState::default()),
        }
    }

    fn save(&self, state: CatalogState) -> Result<(), CatalogError> {
        let count = state.products.len();
        let snapshot = Snapshot { state, version: 0 };
        let json = serde_json::to_string(&snapshot)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, json],
        )?;
        debug!(key = %self.key, products = count, "catalog snapshot saved");
        Ok(())
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut InMemoryRepository, &mut Workspace) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        let CatalogState {
            products,
            mut workspace,
        } = self.load()?;
        let mut repo = InMemoryRepository::from_products(products);
        let out = op(&mut repo, &mut workspace)?;
        self.save(CatalogState {
            products: repo.into_products(),
            workspace,
        })?;
        Ok(out)
    }

    /// The persisted calculator state, default when nothing was saved yet.
    pub fn load_workspace(&self) -> Result<Workspace, CatalogError> {
        Ok(self.load()?.workspace)
    }

    pub fn save_workspace(&mut self, workspace: &Workspace) -> Result<(), CatalogError> {
        self.mutate(|_, stored| {
            *stored = workspace.clone();
            Ok(())
        })
    }
}

impl ProductRepository for SqliteRepository {
    fn get(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.load()?.products.into_iter().find(|p| p.id == id))
    }

    fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.load()?.products)
    }

    fn create(&mut self, product: NewProduct) -> Result<Product, CatalogError> {
        self.mutate(|repo, _| repo.create(product))
    }

    fn update(&mut self, id: &str, update: ProductUpdate) -> Result<Product, CatalogError> {
        self.mutate(|repo, _| repo.update(id, update))
    }

    fn delete(&mut self, id: &str) -> Result<(), CatalogError> {
        self.mutate(|repo, workspace| {
            repo.delete(id)?;
            workspace.on_product_deleted(id);
            Ok(())
        })
    }
}
