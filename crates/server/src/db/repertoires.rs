use repertoire_core::{MoveToken, RepertoireTree};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::error::AppError;

pub struct RepertoireSummary {
    pub name: String,
    pub line_count: i32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// What a save changed.
pub struct SaveOutcome {
    /// False when every move of the line was already in the tree.
    pub added: bool,
    pub line_count: i32,
}

pub async fn get_tree(pool: &PgPool, name: &str) -> Result<Option<RepertoireTree>, AppError> {
    let tree_json: Option<JsonValue> =
        sqlx::query_scalar("SELECT tree_json FROM repertoires WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Sqlx)?;

    tree_json
        .map(RepertoireTree::from_json)
        .transpose()
        .map_err(AppError::from)
}

/// Merge a line into the named repertoire, creating it on first save.
///
/// The row is locked for the read-modify-write so concurrent saves to the
/// same name cannot drop each other's lines.
pub async fn insert_line(
    pool: &PgPool,
    name: &str,
    line: &[MoveToken],
) -> Result<SaveOutcome, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    sqlx::query(
        r#"INSERT INTO repertoires (name, tree_json)
           VALUES ($1, $2)
           ON CONFLICT (name) DO NOTHING"#,
    )
    .bind(name)
    .bind(RepertoireTree::new().to_json())
    .execute(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;

    let (tree_json, line_count): (JsonValue, i32) = sqlx::query_as(
        r#"SELECT tree_json, line_count
           FROM repertoires
           WHERE name = $1
           FOR UPDATE"#,
    )
    .bind(name)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;

    let mut tree = RepertoireTree::from_json(tree_json)?;
    if tree.insert_line(line) == 0 {
        tx.commit().await.map_err(AppError::Sqlx)?;
        return Ok(SaveOutcome {
            added: false,
            line_count,
        });
    }

    let line_count = tree.line_count() as i32;
    sqlx::query(
        r#"UPDATE repertoires
           SET tree_json = $2, line_count = $3, updated_at = NOW()
           WHERE name = $1"#,
    )
    .bind(name)
    .bind(tree.to_json())
    .bind(line_count)
    .execute(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;

    tx.commit().await.map_err(AppError::Sqlx)?;

    Ok(SaveOutcome {
        added: true,
        line_count,
    })
}

pub async fn list_repertoires(pool: &PgPool) -> Result<Vec<RepertoireSummary>, AppError> {
    let rows = sqlx::query_as::<_, (String, i32, chrono::DateTime<chrono::Utc>)>(
        r#"SELECT name, line_count, updated_at
           FROM repertoires
           ORDER BY updated_at DESC"#,
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::Sqlx)?;

    Ok(rows
        .into_iter()
        .map(|(name, line_count, updated_at)| RepertoireSummary {
            name,
            line_count,
            updated_at,
        })
        .collect())
}
