//! DB-backed notification template rendering and seeding.

use std::collections::HashMap;

use toastlab_core::template::render_str;
use toastlab_db::repositories::TemplateRepo;
use toastlab_db::DbPool;

use crate::dispatcher::DispatchError;

/// Template code for the stock-low alert.
pub const TEMPLATE_STOCK_LOW: &str = "HQ_STOCK_LOW";

/// Template code for the expire-soon alert.
pub const TEMPLATE_EXPIRE_SOON: &str = "HQ_EXPIRE_SOON";

/// Which half of a template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart {
    Title,
    Body,
}

/// Renders stored templates against a variable map.
pub struct TemplateRenderer {
    pool: DbPool,
}

impl TemplateRenderer {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Render the title of the template identified by `code`.
    pub async fn render_title(
        &self,
        code: &str,
        vars: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        self.render(code, TemplatePart::Title, vars).await
    }

    /// Render the body of the template identified by `code`.
    pub async fn render_body(
        &self,
        code: &str,
        vars: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        self.render(code, TemplatePart::Body, vars).await
    }

    /// Look up a template and substitute the variable map into the
    /// requested part. Unknown codes fail with
    /// [`DispatchError::TemplateNotFound`].
    pub async fn render(
        &self,
        code: &str,
        part: TemplatePart,
        vars: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        let template = TemplateRepo::get_by_code(&self.pool, code)
            .await?
            .ok_or_else(|| DispatchError::TemplateNotFound(code.to_string()))?;

        let source = match part {
            TemplatePart::Title => &template.title_template,
            TemplatePart::Body => &template.body_template,
        };
        Ok(render_str(source, vars))
    }
}

/// Idempotently upsert the default alert templates.
///
/// Safe to run on every startup; existing rows are overwritten with the
/// shipped defaults, administrative edits happen through the template
/// upsert path afterwards.
pub async fn seed_default_templates(pool: &DbPool) -> Result<(), sqlx::Error> {
    upsert(
        pool,
        TEMPLATE_STOCK_LOW,
        "[Inventory] HQ stock low",
        "{materialName} stock {qty} (threshold: {threshold})",
    )
    .await?;

    upsert(
        pool,
        TEMPLATE_EXPIRE_SOON,
        "[Expiring soon] {materialName}",
        "{days} day(s) left (lot: {lot})",
    )
    .await?;

    Ok(())
}

async fn upsert(pool: &DbPool, code: &str, title: &str, body: &str) -> Result<(), sqlx::Error> {
    TemplateRepo::upsert(pool, code, title, body).await?;
    tracing::info!(code, "Push template upserted");
    Ok(())
}
