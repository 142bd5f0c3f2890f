// File: ctxhelp-core/src/repositories/postgres/context_help.rs

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use ctxhelp_common::error::Error;
use ctxhelp_common::models::{ContextHelp, NewContextHelp};
use ctxhelp_common::traits::repository_traits::ContextHelpRepository;

#[derive(Clone)]
pub struct PostgresContextHelpRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresContextHelpRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_context_help(r: &PgRow) -> Result<ContextHelp, Error> {
    Ok(ContextHelp {
        context_help_id: r.try_get("context_help_id")?,
        controller: r.try_get("controller")?,
        action: r.try_get("action")?,
        property: r.try_get("property")?,
        help_text: r.try_get("help_text")?,
        tooltip: r.try_get("tooltip")?,
    })
}

#[async_trait]
impl ContextHelpRepository for PostgresContextHelpRepository {
    async fn create_context_help(&self, new: &NewContextHelp) -> Result<ContextHelp, Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO context_help (
                controller,
                action,
                property,
                help_text,
                tooltip
            )
            VALUES ($1,$2,$3,$4,$5)
            RETURNING context_help_id
            "#,
        )
            .bind(&new.controller)
            .bind(&new.action)
            .bind(&new.property)
            .bind(&new.help_text)
            .bind(&new.tooltip)
            .fetch_one(&self.pool)
            .await?;

        let id: i32 = row.try_get("context_help_id")?;
        Ok(new.clone().into_record(id))
    }

    async fn get_context_help(&self, context_help_id: i32) -> Result<Option<ContextHelp>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                context_help_id,
                controller,
                action,
                property,
                help_text,
                tooltip
            FROM context_help
            WHERE context_help_id = $1
            "#,
        )
            .bind(context_help_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_context_help(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_context_help(&self) -> Result<Vec<ContextHelp>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                context_help_id,
                controller,
                action,
                property,
                help_text,
                tooltip
            FROM context_help
            ORDER BY controller COLLATE "C" ASC,
                     action COLLATE "C" ASC NULLS FIRST,
                     property COLLATE "C" ASC NULLS FIRST,
                     context_help_id ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(row_to_context_help(&r)?);
        }
        Ok(out)
    }

    async fn list_context_help_for_controller(
        &self,
        controller: &str,
    ) -> Result<Vec<ContextHelp>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                context_help_id,
                controller,
                action,
                property,
                help_text,
                tooltip
            FROM context_help
            WHERE controller = $1
            ORDER BY context_help_id ASC
            "#,
        )
            .bind(controller)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(row_to_context_help(&r)?);
        }
        Ok(out)
    }

    async fn update_context_help(&self, ch: &ContextHelp) -> Result<(), Error> {
        let result = sqlx::query(
            r#"
            UPDATE context_help
            SET
                controller = $1,
                action = $2,
                property = $3,
                help_text = $4,
                tooltip = $5
            WHERE context_help_id = $6
            "#,
        )
            .bind(&ch.controller)
            .bind(&ch.action)
            .bind(&ch.property)
            .bind(&ch.help_text)
            .bind(&ch.tooltip)
            .bind(ch.context_help_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("context help {}", ch.context_help_id)));
        }
        Ok(())
    }

    async fn delete_context_help(&self, context_help_id: i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM context_help WHERE context_help_id = $1")
            .bind(context_help_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("context help {context_help_id}")));
        }
        Ok(())
    }
}
