use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::{ContactEntry, ContentKey, ContentRow, ExperienceRow, NewExperience};
use crate::store::{StoreError, TableStore};

/// `TableStore` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn fetch_experiences(&self) -> Result<Vec<ExperienceRow>, StoreError> {
        Ok(sqlx::query_as::<_, ExperienceRow>(
            "SELECT id, title, company, period, description, order_index FROM experiences ORDER BY order_index ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_experience(
        &self,
        experience: NewExperience,
    ) -> Result<ExperienceRow, StoreError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            INSERT INTO experiences (title, company, period, description, order_index)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, company, period, description, order_index
            "#,
        )
        .bind(experience.title.to_column())
        .bind(experience.company.to_column())
        .bind(experience.period.to_column())
        .bind(experience.description.to_column())
        .bind(experience.order_index)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted experience {}", row.id);
        Ok(row)
    }

    async fn upsert_experience(&self, row: &ExperienceRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO experiences (id, title, company, period, description, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                period = EXCLUDED.period,
                description = EXCLUDED.description,
                order_index = EXCLUDED.order_index
            "#,
        )
        .bind(row.id)
        .bind(&row.title)
        .bind(&row.company)
        .bind(&row.period)
        .bind(&row.description)
        .bind(row.order_index)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_experience(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_contacts(&self) -> Result<Vec<ContactEntry>, StoreError> {
        Ok(sqlx::query_as::<_, ContactEntry>(
            "SELECT id, type, value, label FROM contact_info ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_contact(&self, contact: &ContactEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO contact_info (id, type, value, label)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                type = EXCLUDED.type,
                value = EXCLUDED.value,
                label = EXCLUDED.label
            "#,
        )
        .bind(contact.id)
        .bind(&contact.kind)
        .bind(&contact.value)
        .bind(&contact.label)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_content(&self) -> Result<Vec<ContentRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ContentRow>("SELECT key, language, value FROM content")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn fetch_content_keys(&self) -> Result<Vec<ContentKey>, StoreError> {
        Ok(
            sqlx::query_as::<_, ContentKey>("SELECT key, language FROM content")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn upsert_content(&self, rows: &[ContentRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        // One statement so the batch lands or fails as a whole.
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        let languages: Vec<&str> = rows.iter().map(|r| r.language.as_str()).collect();
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();

        sqlx::query(
            r#"
            INSERT INTO content (key, language, value)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[])
            ON CONFLICT (key, language) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = now()
            "#,
        )
        .bind(&keys)
        .bind(&languages)
        .bind(&values)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
