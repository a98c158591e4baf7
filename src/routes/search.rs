use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use crate::core::{build_user_prompt, parse_model_reply, retain_known_ids, SYSTEM_INSTRUCTION};
use crate::models::{ErrorResponse, HealthResponse, SearchRequest, SearchResponse};
use crate::services::ModelClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelClient>,
    pub max_context_entries: usize,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let model_configured = state.model.is_configured();
    let status = if model_configured { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_configured,
        timestamp: chrono::Utc::now(),
    })
}

/// Match-and-rank endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "query": "string",
///   "context": [{ "id": "string", "name": "string", ... }]
/// }
/// ```
///
/// Every branch after validation answers HTTP 200 with a well-formed
/// SearchResponse; upstream failures travel in the `error` field with
/// empty matches so the caller can degrade instead of breaking.
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let query = req.query.trim();
    if query.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "query must not be empty".to_string(),
            status_code: 400,
        });
    }

    let mut context = req.context.as_slice();
    if context.len() > state.max_context_entries {
        tracing::warn!(
            "Context truncated from {} to {} entries",
            context.len(),
            state.max_context_entries
        );
        context = &context[..state.max_context_entries];
    }

    let search_id = uuid::Uuid::new_v4();

    tracing::info!(
        "Processing search {}: {:?} ({} context entries)",
        search_id,
        query,
        context.len()
    );

    let prompt = build_user_prompt(query, context);

    match state.model.complete(SYSTEM_INSTRUCTION, &prompt).await {
        Ok(content) => {
            tracing::debug!("Model reply for {} received ({} bytes)", search_id, content.len());

            let verdict = parse_model_reply(&content);

            // Drop IDs the model invented; matches must map back to the context
            let known: HashSet<String> = context.iter().map(|e| e.id.clone()).collect();
            let matches = retain_known_ids(verdict.matches, &known);

            tracing::info!("Search {} returning {} matches", search_id, matches.len());

            HttpResponse::Ok().json(SearchResponse::ranked(matches, verdict.explanation))
        }
        Err(e) => {
            tracing::error!("Model call failed for search {}: {}", search_id, e);
            HttpResponse::Ok().json(SearchResponse::failed(
                "Failed to process search results",
                e.to_string(),
            ))
        }
    }
}
