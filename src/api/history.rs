use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;
use crate::error::AppError;
use crate::journal::JournalDocument;

/// GET /api/ai/history
///
/// The user-visible response history document; an empty document when
/// nothing has been recorded (or the history journal is disabled).
pub async fn history(State(state): State<AppState>) -> Result<Json<JournalDocument>, AppError> {
    let doc = state
        .history
        .load::<JournalDocument>()
        .await?
        .unwrap_or_default();
    Ok(Json(doc))
}

#[derive(Debug, Serialize)]
pub struct RolloverResponse {
    pub message: String,
}

/// POST /api/ai/rollover
///
/// Unconditionally archive the history document and start a fresh one.
pub async fn force_rollover(
    State(state): State<AppState>,
) -> Result<Json<RolloverResponse>, AppError> {
    state.history.force_rollover().await?;
    tracing::info!("History rollover forced");
    Ok(Json(RolloverResponse {
        message: "History rolled over".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollover_response_serialization() {
        let response = RolloverResponse {
            message: "History rolled over".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "History rolled over");
    }

    #[test]
    fn test_empty_history_document_shape() {
        let doc = JournalDocument::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["totalRequests"], 0);
        assert_eq!(json["totalCost"], 0.0);
        assert!(json["responses"].as_array().unwrap().is_empty());
    }
}
