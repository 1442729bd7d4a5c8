use axum::{Extension, Json};
use repertoire_core::{parse_line, rules, MoveToken};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::repertoires;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct LineRequest {
    pub name: String,
    #[serde(default)]
    pub line: String,
}

#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepertoireListItem {
    pub name: String,
    pub lines: i32,
    pub updated_at: String,
}

fn require_name(raw: &str) -> Result<&str, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Repertoire name is required".into()));
    }
    Ok(name)
}

/// Parse and check a line to be saved. Nothing reaches the tree unless the
/// whole line is valid.
fn validated_line(raw: &str, check_legality: bool) -> Result<Vec<MoveToken>, AppError> {
    let line = parse_line(raw)?;
    if line.is_empty() {
        return Err(AppError::BadRequest("No moves to save".into()));
    }
    if check_legality {
        return Ok(rules::replay(&line)?.line);
    }
    Ok(line)
}

/// POST /api/submit
/// Append one line to the named repertoire.
pub async fn submit_line(
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    Json(body): Json<LineRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let name = require_name(&body.name)?;
    let line = validated_line(&body.line, config.validate_legality)?;

    let outcome = repertoires::insert_line(&pool, name, &line).await?;
    tracing::info!(
        "Saved {}-move line to '{}' (new: {}, lines: {})",
        line.len(),
        name,
        outcome.added,
        outcome.line_count
    );

    Ok(Json(serde_json::json!({
        "status": "success",
        "name": name,
        "added": outcome.added,
        "lines": outcome.line_count,
    })))
}

/// POST /api/get_moves
/// Moves saved as continuations of `line` in the named repertoire.
pub async fn get_moves(
    Extension(pool): Extension<PgPool>,
    Json(body): Json<LineRequest>,
) -> Result<Json<Vec<MoveToken>>, AppError> {
    let name = require_name(&body.name)?;
    let prefix = parse_line(&body.line)?;

    let suggestions = match repertoires::get_tree(&pool, name).await? {
        Some(tree) => tree.suggest_next(&prefix),
        None => Vec::new(),
    };

    Ok(Json(suggestions))
}

/// POST /api/get_repertoire
/// The whole tree plus its lines in variant order.
pub async fn get_repertoire(
    Extension(pool): Extension<PgPool>,
    Json(body): Json<NameRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let name = require_name(&body.name)?;
    let tree = repertoires::get_tree(&pool, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Repertoire '{name}' not found")))?;

    Ok(Json(serde_json::json!({
        "name": name,
        "repertoire": tree.to_json(),
        "lines": tree.extract_lines(),
    })))
}

/// GET /api/repertoires
pub async fn list_repertoires(
    Extension(pool): Extension<PgPool>,
) -> Result<Json<Vec<RepertoireListItem>>, AppError> {
    let rows = repertoires::list_repertoires(&pool).await?;
    Ok(Json(
        rows.into_iter()
            .map(|r| RepertoireListItem {
                name: r.name,
                lines: r.line_count,
                updated_at: r.updated_at.to_rfc3339(),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name_trims() {
        assert_eq!(require_name("  Italian ").unwrap(), "Italian");
        assert!(matches!(require_name("   "), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_validated_line_rejects_empty() {
        assert!(matches!(validated_line("", true), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_validated_line_rejects_malformed() {
        assert!(matches!(validated_line("e2e4 Nf3", false), Err(AppError::Token(_))));
    }

    #[test]
    fn test_validated_line_checks_legality() {
        assert!(matches!(validated_line("e2e4 e2e4", true), Err(AppError::Rules(_))));
        assert_eq!(validated_line("e2e4 e2e4", false).unwrap().len(), 2);
    }

    #[test]
    fn test_validated_line_normalizes_promotion() {
        let line = validated_line(
            "a2a4 b7b5 a4b5 a7a6 b5a6 c8b7 a6b7 b8c6 b7a8",
            true,
        )
        .unwrap();
        assert_eq!(line.last().unwrap().as_str(), "b7a8q");
    }
}
