//! Servidor Axum que expõe o pipeline em `POST /parse`

pub mod config;

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use textparse_core::NerPipeline;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Estado compartilhado da aplicação: o pipeline configurado na inicialização,
/// somente leitura a partir daí.
pub struct AppState {
    pub pipeline: NerPipeline,
}

impl AppState {
    pub fn new(pipeline: NerPipeline) -> Self {
        Self { pipeline }
    }
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// `{"tokens": [...], "entities": [["cafe", "BUSINESS_TYPE"], ...]}`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ParseResponse {
    pub tokens: Vec<String>,
    pub entities: Vec<(String, String)>,
}

/// Monta o roteador com a única rota do serviço
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/parse", post(parse_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Tokens e entidades de um texto. Texto vazio é válido.
async fn parse_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> Json<ParseResponse> {
    let doc = state.pipeline.analyze(&req.text);
    debug!(
        chars = req.text.len(),
        tokens = doc.tokens.len(),
        entities = doc.entities.len(),
        "parse"
    );

    Json(ParseResponse {
        tokens: doc.token_texts(),
        entities: doc.entity_pairs(),
    })
}
