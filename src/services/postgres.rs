use crate::models::{ActivityEntry, InterestStatus, SavedOffering};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Per-status interest counts for one investor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestStats {
    pub investor_id: String,
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub declined: i64,
    pub withdrawn: i64,
    pub last_activity_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// PostgreSQL client for the service-owned tables.
///
/// Interests, the watchlist, and the activity log live in a database this
/// service owns rather than in Supabase: the interest table is the match
/// engine's exclusion source and has to be authoritative on every request.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Record a new interest. The (investor, offering) pair is unique;
    /// a second attempt surfaces as `AlreadyExists` rather than an upsert,
    /// since re-expressing interest is a client error in this domain.
    pub async fn record_interest(
        &self,
        investor_id: &str,
        offering_id: &str,
        amount: Option<i64>,
        message: Option<&str>,
    ) -> Result<Uuid, PostgresError> {
        let query = r#"
            INSERT INTO interests (investor_id, offering_id, amount, message, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (investor_id, offering_id) DO NOTHING
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(investor_id)
            .bind(offering_id)
            .bind(amount)
            .bind(message)
            .bind(InterestStatus::Pending)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let id: Uuid = row.get("id");
                tracing::debug!("Recorded interest: {} -> {}", investor_id, offering_id);
                Ok(id)
            }
            None => Err(PostgresError::AlreadyExists(format!(
                "Interest already exists for {} on {}",
                investor_id, offering_id
            ))),
        }
    }

    /// Every offering id the investor has engaged with, in any status.
    /// Withdrawn interests still count: prior engagement always excludes
    /// an offering from fresh recommendations.
    pub async fn get_interested_offerings(
        &self,
        investor_id: &str,
    ) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT offering_id
            FROM interests
            WHERE investor_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(investor_id)
            .fetch_all(&self.pool)
            .await?;

        let offering_ids: Vec<String> = rows.iter().map(|row| row.get("offering_id")).collect();

        tracing::debug!(
            "Investor {} has {} prior interests",
            investor_id,
            offering_ids.len()
        );

        Ok(offering_ids)
    }

    /// Current interest count per offering, for the social-proof tier
    pub async fn get_interest_counts(
        &self,
        offering_ids: &[String],
    ) -> Result<HashMap<String, i64>, PostgresError> {
        if offering_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = r#"
            SELECT offering_id, COUNT(*) AS interest_count
            FROM interests
            WHERE offering_id = ANY($1)
            GROUP BY offering_id
        "#;

        let rows = sqlx::query(query)
            .bind(offering_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("offering_id"), row.get("interest_count")))
            .collect())
    }

    /// All interests recorded against one offering, newest first
    /// (founder's view of demand for their round)
    pub async fn get_interests_for_offering(
        &self,
        offering_id: &str,
    ) -> Result<Vec<crate::models::Interest>, PostgresError> {
        let query = r#"
            SELECT id, investor_id, offering_id, amount, message, status, created_at
            FROM interests
            WHERE offering_id = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(offering_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| crate::models::Interest {
                id: row.get("id"),
                investor_id: row.get("investor_id"),
                offering_id: row.get("offering_id"),
                amount: row.get("amount"),
                message: row.get("message"),
                status: row.get("status"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Mark an interest withdrawn. The row stays, and keeps excluding the
    /// offering from the investor's matches.
    pub async fn withdraw_interest(
        &self,
        investor_id: &str,
        offering_id: &str,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            UPDATE interests
            SET status = $3, updated_at = NOW()
            WHERE investor_id = $1 AND offering_id = $2 AND status <> $3
        "#;

        let result = sqlx::query(query)
            .bind(investor_id)
            .bind(offering_id)
            .bind(InterestStatus::Withdrawn)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-status interest counts for an investor's dashboard
    pub async fn get_interest_stats(
        &self,
        investor_id: &str,
    ) -> Result<InterestStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
                COUNT(*) FILTER (WHERE status = 'declined') AS declined,
                COUNT(*) FILTER (WHERE status = 'withdrawn') AS withdrawn,
                MAX(updated_at) AS last_activity_at
            FROM interests
            WHERE investor_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(investor_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(InterestStats {
            investor_id: investor_id.to_string(),
            total: row.get("total"),
            pending: row.get("pending"),
            accepted: row.get("accepted"),
            declined: row.get("declined"),
            withdrawn: row.get("withdrawn"),
            last_activity_at: row.get("last_activity_at"),
        })
    }

    /// Add an offering to an investor's watchlist
    pub async fn save_offering(
        &self,
        investor_id: &str,
        offering_id: &str,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO saved_offerings (investor_id, offering_id)
            VALUES ($1, $2)
            ON CONFLICT (investor_id, offering_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(investor_id)
            .bind(offering_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::AlreadyExists(format!(
                "Offering {} already saved by {}",
                offering_id, investor_id
            )));
        }

        Ok(())
    }

    /// Remove an offering from the watchlist
    pub async fn unsave_offering(
        &self,
        investor_id: &str,
        offering_id: &str,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM saved_offerings
            WHERE investor_id = $1 AND offering_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(investor_id)
            .bind(offering_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Watchlist entries for an investor, newest first
    pub async fn get_saved_offerings(
        &self,
        investor_id: &str,
    ) -> Result<Vec<SavedOffering>, PostgresError> {
        let query = r#"
            SELECT investor_id, offering_id, created_at
            FROM saved_offerings
            WHERE investor_id = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(investor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| SavedOffering {
                investor_id: row.get("investor_id"),
                offering_id: row.get("offering_id"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Append one entry to the activity log
    pub async fn record_activity(
        &self,
        user_id: Option<&str>,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
        metadata: serde_json::Value,
    ) -> Result<Uuid, PostgresError> {
        let query = r#"
            INSERT INTO activity_log (user_id, action, entity_type, entity_id, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(action)
            .bind(entity_type)
            .bind(entity_id)
            .bind(metadata)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("id"))
    }

    /// Investor-scoped feed: own actions plus accept/decline updates on
    /// offerings the investor holds an interest in
    pub async fn get_activity_for_investor(
        &self,
        investor_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, PostgresError> {
        let query = r#"
            SELECT id, user_id, action, entity_type, entity_id, metadata, created_at
            FROM activity_log
            WHERE user_id = $1
               OR (action IN ('interest_accepted', 'interest_declined')
                   AND entity_id IN (SELECT offering_id FROM interests WHERE investor_id = $1))
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
        "#;

        let rows = sqlx::query(query)
            .bind(investor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::map_activity_row).collect())
    }

    /// Founder-scoped feed: own actions plus anything recorded against the
    /// founder's offerings
    pub async fn get_activity_for_founder(
        &self,
        founder_id: &str,
        offering_ids: &[String],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, PostgresError> {
        let query = r#"
            SELECT id, user_id, action, entity_type, entity_id, metadata, created_at
            FROM activity_log
            WHERE user_id = $1
               OR (entity_type = 'offering' AND entity_id = ANY($2))
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
        "#;

        let rows = sqlx::query(query)
            .bind(founder_id)
            .bind(offering_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::map_activity_row).collect())
    }

    /// Unscoped feed, newest first (admin view)
    pub async fn get_activity_all(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, PostgresError> {
        let query = r#"
            SELECT id, user_id, action, entity_type, entity_id, metadata, created_at
            FROM activity_log
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
        "#;

        let rows = sqlx::query(query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::map_activity_row).collect())
    }

    fn map_activity_row(row: &sqlx::postgres::PgRow) -> ActivityEntry {
        ActivityEntry {
            id: row.get("id"),
            user_id: row.get("user_id"),
            action: row.get("action"),
            entity_type: row.get("entity_type"),
            entity_id: row.get("entity_id"),
            metadata: row.get("metadata"),
            created_at: row.get("created_at"),
        }
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_stats_serializes() {
        let stats = InterestStats {
            investor_id: "inv_1".to_string(),
            total: 4,
            pending: 2,
            accepted: 1,
            declined: 0,
            withdrawn: 1,
            last_activity_at: None,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["withdrawn"], 1);
    }
}
