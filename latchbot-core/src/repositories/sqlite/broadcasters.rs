// File: latchbot-core/src/repositories/sqlite/broadcasters.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use sqlx::sqlite::SqliteRow;
use latchbot_common::error::Error;
use latchbot_common::models::BroadcasterRecord;
use latchbot_common::traits::repository_traits::BroadcasterRepository;

pub struct SqliteBroadcasterRepository {
    pool: Pool<Sqlite>,
}

impl SqliteBroadcasterRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn prepare_schema(&self) -> Result<(), Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS broadcasters (
                channelname TEXT PRIMARY KEY,
                dbcreated BOOLEAN NOT NULL DEFAULT 0,
                authorized BOOLEAN NOT NULL DEFAULT 0,
                requested_at TEXT NOT NULL
            )
            "#,
        )
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_record(r: &SqliteRow) -> Result<BroadcasterRecord, Error> {
        Ok(BroadcasterRecord {
            channel_name: r.try_get("channelname")?,
            db_created: r.try_get("dbcreated")?,
            authorized: r.try_get("authorized")?,
            requested_at: r.try_get("requested_at")?,
        })
    }
}

#[async_trait]
impl BroadcasterRepository for SqliteBroadcasterRepository {
    async fn add_broadcaster(&self, channel_name: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO broadcasters (channelname, dbcreated, authorized, requested_at)
            VALUES (?, 0, 0, ?)
            ON CONFLICT (channelname) DO NOTHING
            "#,
        )
            .bind(channel_name.to_lowercase())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_broadcaster(&self, channel_name: &str) -> Result<Option<BroadcasterRecord>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT channelname, dbcreated, authorized, requested_at
            FROM broadcasters
            WHERE channelname = ?
            "#,
        )
            .bind(channel_name.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(Self::row_to_record(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_broadcasters(&self) -> Result<Vec<BroadcasterRecord>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT channelname, dbcreated, authorized, requested_at
            FROM broadcasters
            ORDER BY channelname ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(Self::row_to_record(&r)?);
        }
        Ok(out)
    }

    async fn set_authorized(&self, channel_name: &str, authorized: bool) -> Result<(), Error> {
        let result = sqlx::query("UPDATE broadcasters SET authorized = ? WHERE channelname = ?")
            .bind(authorized)
            .bind(channel_name.to_lowercase())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("broadcaster '{}'", channel_name)));
        }
        Ok(())
    }

    async fn mark_db_created(&self, channel_name: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE broadcasters SET dbcreated = 1 WHERE channelname = ?")
            .bind(channel_name.to_lowercase())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("broadcaster '{}'", channel_name)));
        }
        Ok(())
    }

    async fn remove_broadcaster(&self, channel_name: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM broadcasters WHERE channelname = ?")
            .bind(channel_name.to_lowercase())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
