//! Repository for the `push_templates` table.

use sqlx::PgPool;

use crate::models::template::NotificationTemplate;

/// Column list for `push_templates` queries.
const COLUMNS: &str = "id, code, title_template, body_template, created_at, updated_at";

/// Provides lookup and upsert operations for notification templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Find a template by its unique code.
    pub async fn get_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<NotificationTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM push_templates WHERE code = $1");
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a template by code in a single round-trip.
    pub async fn upsert(
        pool: &PgPool,
        code: &str,
        title_template: &str,
        body_template: &str,
    ) -> Result<NotificationTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO push_templates (code, title_template, body_template) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (code) DO UPDATE SET \
                title_template = EXCLUDED.title_template, \
                body_template = EXCLUDED.body_template, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(code)
            .bind(title_template)
            .bind(body_template)
            .fetch_one(pool)
            .await
    }
}
