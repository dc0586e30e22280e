use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::experts::validation::ExpertInput;
use crate::models::expert::ExpertRow;

pub async fn list_experts(pool: &PgPool, active_only: bool) -> Result<Vec<ExpertRow>, sqlx::Error> {
    sqlx::query_as::<_, ExpertRow>(
        "SELECT * FROM experts WHERE ($1 = FALSE OR is_active) ORDER BY name ASC, id ASC",
    )
    .bind(active_only)
    .fetch_all(pool)
    .await
}

pub async fn get_expert(pool: &PgPool, id: Uuid) -> Result<Option<ExpertRow>, sqlx::Error> {
    sqlx::query_as::<_, ExpertRow>("SELECT * FROM experts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_expert(pool: &PgPool, input: &ExpertInput) -> Result<ExpertRow, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let row = insert_in_tx(&mut tx, input).await?;
    tx.commit().await?;
    Ok(row)
}

/// Inserts every expert in one transaction; any failure rolls back the whole batch.
pub async fn insert_experts(
    pool: &PgPool,
    inputs: &[ExpertInput],
) -> Result<Vec<ExpertRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut rows = Vec::with_capacity(inputs.len());
    for input in inputs {
        rows.push(insert_in_tx(&mut tx, input).await?);
    }
    tx.commit().await?;
    Ok(rows)
}

async fn insert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    input: &ExpertInput,
) -> Result<ExpertRow, sqlx::Error> {
    sqlx::query_as::<_, ExpertRow>(
        r#"
        INSERT INTO experts
            (id, name, email, title, company, expertise, bio,
             years_experience, hourly_rate, avatar_url, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.title)
    .bind(&input.company)
    .bind(&input.expertise)
    .bind(&input.bio)
    .bind(input.years_experience)
    .bind(input.hourly_rate)
    .bind(&input.avatar_url)
    .bind(input.is_active)
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_expert(
    pool: &PgPool,
    id: Uuid,
    input: &ExpertInput,
) -> Result<Option<ExpertRow>, sqlx::Error> {
    sqlx::query_as::<_, ExpertRow>(
        r#"
        UPDATE experts SET
            name = $2, email = $3, title = $4, company = $5, expertise = $6, bio = $7,
            years_experience = $8, hourly_rate = $9, avatar_url = $10, is_active = $11,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.title)
    .bind(&input.company)
    .bind(&input.expertise)
    .bind(&input.bio)
    .bind(input.years_experience)
    .bind(input.hourly_rate)
    .bind(&input.avatar_url)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await
}

/// Returns `true` if a row was deleted.
pub async fn delete_expert(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM experts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
