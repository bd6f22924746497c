// File: latchbot-core/src/repositories/sqlite/commands.rs

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;
use latchbot_common::error::Error;
use latchbot_common::models::{Command, CommandResolution, RequiredPermission};
use latchbot_common::traits::repository_traits::CommandStore;

/// Command table of one channel, living in that channel's own sqlite database.
pub struct SqliteCommandStore {
    channel: String,
    pool: Pool<Sqlite>,
}

impl SqliteCommandStore {
    pub fn new(channel: &str, pool: Pool<Sqlite>) -> Self {
        Self {
            channel: channel.to_string(),
            pool,
        }
    }

    /// Creates the `commands` table and the reserved `channelusers` table.
    pub async fn prepare_schema(&self) -> Result<(), Error> {
        debug!("Preparing the command table for channel '{}'", self.channel);
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS commands (
                id INTEGER PRIMARY KEY,
                trigger TEXT NOT NULL UNIQUE,
                payload TEXT NOT NULL,
                permission TEXT NOT NULL DEFAULT '',
                cooldown INTEGER NOT NULL DEFAULT 0,
                uses INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
            .execute(&self.pool)
            .await?;

        // Viewer tracking is not implemented; the table only keeps the schema stable.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channelusers (
                id INTEGER PRIMARY KEY,
                name TEXT,
                aliases BLOB,
                lastseen TEXT,
                streamsvisited INTEGER,
                watchtime INTEGER,
                streamer BOOLEAN,
                streamlink TEXT
            )
            "#,
        )
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl CommandStore for SqliteCommandStore {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn insert_command(&self, cmd: &Command) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO commands (trigger, payload, permission, cooldown, uses)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (trigger) DO UPDATE SET
                payload = excluded.payload,
                permission = excluded.permission,
                cooldown = excluded.cooldown
            "#,
        )
            .bind(cmd.trigger.to_lowercase())
            .bind(&cmd.payload)
            .bind(cmd.permission.to_stored())
            .bind(cmd.cooldown_seconds)
            .bind(cmd.uses)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove_command(&self, trigger: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM commands WHERE trigger = ?")
            .bind(trigger.to_lowercase())
            .execute(&self.pool)
            .await?;
        debug!(
            "remove_command('{}') on '{}' => {} row(s)",
            trigger, self.channel, result.rows_affected()
        );
        Ok(())
    }

    async fn lookup_command(&self, trigger: &str) -> Result<Option<CommandResolution>, Error> {
        let row_opt = sqlx::query("SELECT payload, permission FROM commands WHERE trigger = ?")
            .bind(trigger.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            let permission: String = r.try_get("permission")?;
            Ok(Some(CommandResolution {
                payload: r.try_get("payload")?,
                permission: RequiredPermission::from_stored(&permission),
            }))
        } else {
            Ok(None)
        }
    }

    async fn get_command(&self, trigger: &str) -> Result<Option<Command>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT trigger, payload, permission, cooldown, uses
            FROM commands
            WHERE trigger = ?
            "#,
        )
            .bind(trigger.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            let permission: String = r.try_get("permission")?;
            Ok(Some(Command {
                trigger: r.try_get("trigger")?,
                payload: r.try_get("payload")?,
                permission: RequiredPermission::from_stored(&permission),
                cooldown_seconds: r.try_get("cooldown")?,
                uses: r.try_get("uses")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn list_triggers(&self) -> Result<Vec<String>, Error> {
        let rows = sqlx::query("SELECT trigger FROM commands ORDER BY trigger ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut triggers = Vec::with_capacity(rows.len());
        for r in rows {
            triggers.push(r.try_get("trigger")?);
        }
        Ok(triggers)
    }
}
