//! Audit history keyed by e-mail address.
//!
//! Results are stored verbatim as JSON next to a few columns used for listing.

#[cfg(feature = "database")]
use anyhow::{Context, Result};
#[cfg(feature = "database")]
use chrono::{DateTime, Utc};
#[cfg(feature = "database")]
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Row, SqlitePool};
#[cfg(feature = "database")]
use tracing::info;

#[cfg(feature = "database")]
use crate::audit::AuditResults;
#[cfg(feature = "database")]
use crate::config::DatabaseConfig;

#[cfg(feature = "database")]
/// SQLite-backed store of completed audits
pub struct AuditStore {
    pool: SqlitePool,
}

#[cfg(feature = "database")]
#[derive(Debug, Clone)]
pub struct StoredAudit {
    pub id: i64,
    pub email: String,
    pub company_name: Option<String>,
    pub portal_id: Option<String>,
    pub overall_score: f64,
    pub overall_grade: String,
    pub audit_timestamp: DateTime<Utc>,
    pub results: AuditResults,
}

#[cfg(feature = "database")]
impl AuditStore {
    /// Open (creating if needed) the database and optionally run migrations
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if !config.url.contains(":memory:") && !sqlx::Sqlite::database_exists(&config.url).await? {
            if let Some(parent) = config
                .url
                .strip_prefix("sqlite://")
                .and_then(|path| std::path::Path::new(path).parent())
                .filter(|parent| !parent.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            info!("Creating database at {}", config.url);
            sqlx::Sqlite::create_database(&config.url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        if config.auto_migrate {
            info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
        }

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persist one audit run and return its row id
    pub async fn store_audit(
        &self,
        email: &str,
        company_name: Option<&str>,
        portal_id: Option<&str>,
        results: &AuditResults,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (email, company_name) VALUES (?1, ?2)
            ON CONFLICT(email) DO UPDATE SET company_name = COALESCE(?2, company_name)
            "#,
        )
        .bind(email)
        .bind(company_name)
        .execute(&mut *tx)
        .await?;

        let user_id: i64 = sqlx::query("SELECT id FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&mut *tx)
            .await?
            .get("id");

        let enrichment = results.enrichment.as_ref();
        let ai_recommendations = enrichment
            .map(|e| serde_json::to_string(&e.ai_recommendations))
            .transpose()?;

        let id = sqlx::query(
            r#"
            INSERT INTO audit_results
                (user_id, results_json, overall_score, overall_grade, portal_id,
                 audit_timestamp, ai_summary, ai_recommendations)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(user_id)
        .bind(serde_json::to_string(results)?)
        .bind(results.overall_score)
        .bind(results.overall_grade.as_str())
        .bind(portal_id)
        .bind(Utc::now().to_rfc3339())
        .bind(enrichment.map(|e| e.ai_summary.as_str()))
        .bind(ai_recommendations)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        info!(email, audit_id = id, "Stored audit results");
        Ok(id)
    }

    /// Most recent audits for `email`, newest first
    pub async fn audit_history(&self, email: &str, limit: u32) -> Result<Vec<StoredAudit>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, u.email, u.company_name, a.portal_id, a.overall_score,
                   a.overall_grade, a.audit_timestamp, a.results_json
            FROM audit_results a
            JOIN users u ON u.id = a.user_id
            WHERE u.email = ?1
            ORDER BY a.audit_timestamp DESC, a.id DESC
            LIMIT ?2
            "#,
        )
        .bind(email)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<StoredAudit> {
                let timestamp: String = row.get("audit_timestamp");
                let results_json: String = row.get("results_json");
                Ok(StoredAudit {
                    id: row.get("id"),
                    email: row.get("email"),
                    company_name: row.get("company_name"),
                    portal_id: row.get("portal_id"),
                    overall_score: row.get("overall_score"),
                    overall_grade: row.get("overall_grade"),
                    audit_timestamp: DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc),
                    results: serde_json::from_str(&results_json)?,
                })
            })
            .collect()
    }

    pub async fn latest_audit(&self, email: &str) -> Result<Option<StoredAudit>> {
        Ok(self.audit_history(email, 1).await?.into_iter().next())
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}

#[cfg(all(test, feature = "database"))]
mod tests {
    use super::*;

    async fn memory_store() -> AuditStore {
        AuditStore::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            auto_migrate: true,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn stores_and_lists_newest_first() {
        let store = memory_store().await;
        let first = store
            .store_audit("ops@example.com", Some("Acme"), Some("123"), &AuditResults::empty())
            .await
            .unwrap();
        let second = store
            .store_audit("ops@example.com", None, Some("123"), &AuditResults::empty())
            .await
            .unwrap();

        let history = store.audit_history("ops@example.com", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second);
        assert_eq!(history[1].id, first);
        assert_eq!(history[0].company_name.as_deref(), Some("Acme"));
        assert_eq!(history[0].results, AuditResults::empty());

        assert!(store.latest_audit("nobody@example.com").await.unwrap().is_none());
    }
}
