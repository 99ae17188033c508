//! SurrealDB-backed branch registry implementation
//!
//! Uses a private `DbBranch` row type for persistence, converting to/from
//! the public `BranchRecord` at the boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::record::{BranchId, BranchRecord, RepoRef};
use crate::registry::{BranchRegistry, RegistryResult};

/// Module for serializing chrono DateTime to SurrealDB datetime format
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Branch row as stored in the `branches` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DbBranch {
    /// SurrealDB record ID
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<surrealdb::sql::Thing>,
    branch_id: String,
    name: String,
    repo_fq_name: String,
    repo_path: String,
    enabled_checkers: Vec<String>,
    pr_number: Option<u64>,
    commits: Vec<String>,
    commit_uri_template: String,
    #[serde(with = "surreal_datetime")]
    updated_at: DateTime<Utc>,
}

impl DbBranch {
    fn from_record(record: BranchRecord) -> Self {
        DbBranch {
            id: None,
            branch_id: record.branch_id.0,
            name: record.name,
            repo_fq_name: record.repo.fq_name,
            repo_path: record.repo.path,
            enabled_checkers: record.enabled_checkers,
            pr_number: record.pr_number,
            commits: record.commits,
            commit_uri_template: record.commit_uri_template,
            updated_at: record.updated_at,
        }
    }

    fn into_record(self) -> BranchRecord {
        BranchRecord {
            branch_id: BranchId(self.branch_id),
            name: self.name,
            repo: RepoRef {
                fq_name: self.repo_fq_name,
                path: self.repo_path,
            },
            enabled_checkers: self.enabled_checkers,
            pr_number: self.pr_number,
            commits: self.commits,
            commit_uri_template: self.commit_uri_template,
            updated_at: self.updated_at,
        }
    }
}

/// SurrealDB-backed implementation of [`BranchRegistry`].
pub struct SurrealBranchRegistry {
    db: Surreal<Any>,
}

impl SurrealBranchRegistry {
    /// Create an in-memory instance for testing.
    ///
    /// Connects to `mem://`, selects `depwatch/main`, and initializes the
    /// `branches` table.
    pub async fn in_memory() -> RegistryResult<Self> {
        let db = surrealdb::engine::any::connect("mem://")
            .await
            .map_err(|e| RegistryError::Connection(e.to_string()))?;

        db.use_ns("depwatch")
            .use_db("main")
            .await
            .map_err(|e| RegistryError::Connection(e.to_string()))?;

        init_schema(&db).await?;

        info!("SurrealBranchRegistry connected (in-memory)");
        Ok(Self { db })
    }

    /// Create from environment variables.
    ///
    /// Connects to `SURREALDB_URL` when set; otherwise falls back to local
    /// persistence under `.depwatch/db`.
    pub async fn from_env() -> RegistryResult<Self> {
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            let db = surrealdb::engine::any::connect(&url)
                .await
                .map_err(|e| RegistryError::Connection(e.to_string()))?;

            db.use_ns("depwatch")
                .use_db("main")
                .await
                .map_err(|e| RegistryError::Connection(e.to_string()))?;

            init_schema(&db).await?;
            info!("SurrealBranchRegistry connected ({})", url);
            return Ok(Self { db });
        }

        let path = ".depwatch/db";
        std::fs::create_dir_all(path).map_err(|e| {
            RegistryError::Connection(format!(
                "Failed to create database directory {}: {}",
                path, e
            ))
        })?;
        let url = format!("surrealkv://{}", path);
        info!(
            "No SURREALDB_URL found, using local persistence: {}",
            url
        );

        let db = surrealdb::engine::any::connect(&url)
            .await
            .map_err(|e| RegistryError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

        db.use_ns("depwatch")
            .use_db("main")
            .await
            .map_err(|e| RegistryError::Connection(e.to_string()))?;

        init_schema(&db).await?;
        Ok(Self { db })
    }

    /// Fetch a branch row by id, or `None` when absent.
    async fn fetch_branch(&self, bid: &str) -> RegistryResult<Option<DbBranch>> {
        let bid_owned = bid.to_string();
        let mut res = self
            .db
            .query("SELECT * FROM branches WHERE branch_id = $bid")
            .bind(("bid", bid_owned))
            .await
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        let rows: Vec<DbBranch> = res
            .take(0)
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl BranchRegistry for SurrealBranchRegistry {
    async fn find_branch(&self, id: &BranchId) -> RegistryResult<Option<BranchRecord>> {
        let row = self.fetch_branch(&id.0).await?;
        Ok(row.map(DbBranch::into_record))
    }

    async fn upsert_branch(&self, record: BranchRecord) -> RegistryResult<()> {
        let row = DbBranch::from_record(record);
        let bid_owned = row.branch_id.clone();

        debug!(branch_id = %bid_owned, "upserting branch");

        // Replace any existing row with the same branch_id
        self.db
            .query("DELETE FROM branches WHERE branch_id = $bid")
            .bind(("bid", bid_owned))
            .await
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        let _created: Option<DbBranch> = self
            .db
            .create("branches")
            .content(row)
            .await
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn delete_branch(&self, id: &BranchId) -> RegistryResult<()> {
        if self.fetch_branch(&id.0).await?.is_none() {
            return Err(RegistryError::BranchNotFound {
                branch_id: id.0.clone(),
            });
        }

        let bid_owned = id.0.clone();
        self.db
            .query("DELETE FROM branches WHERE branch_id = $bid")
            .bind(("bid", bid_owned))
            .await
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_branches(&self) -> RegistryResult<Vec<BranchRecord>> {
        let mut res = self
            .db
            .query("SELECT * FROM branches ORDER BY name ASC")
            .await
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        let rows: Vec<DbBranch> = res
            .take(0)
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        Ok(rows.into_iter().map(DbBranch::into_record).collect())
    }
}

/// Initialize the `branches` table with constraints and indexes.
///
/// Constraints:
/// - `branch_id` is unique (one row per tracked branch)
async fn init_schema(db: &Surreal<Any>) -> RegistryResult<()> {
    debug!("Initializing branches table");

    let sql = r#"
        DEFINE TABLE branches
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update FULL
                FOR delete FULL;

        -- Ensure branch_id is unique
        DEFINE INDEX idx_branch_id ON TABLE branches COLUMNS branch_id UNIQUE;

        -- Index repo name for per-repo listings
        DEFINE INDEX idx_repo_fq_name ON TABLE branches COLUMNS repo_fq_name;
    "#;

    db.query(sql)
        .await
        .map_err(|e| RegistryError::Backend(e.to_string()))?;

    info!("branches table initialized");
    Ok(())
}
