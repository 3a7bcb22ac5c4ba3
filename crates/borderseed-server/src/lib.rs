//! HTTP surface for BIP39 final-word completion.
//!
//! Serves candidate final words, final word lookups by number, the word
//! checker and the dyadic extractor as JSON. The server is stateless: every
//! request is answered from one shared, immutable completion engine.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use borderseed_core::{
    ChecksumCompletionEngine, CompletionSource, Contribution, EntropySpec, MnemonicCheck,
    PartialMnemonic, SeedError, assemble, check_mnemonic, extract, final_word_by_number,
};

/// Shared server state.
struct AppState {
    engine: ChecksumCompletionEngine,
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(flatten)]
    data: Option<T>,
    /// Error message if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn ok<T>(data: T) -> ApiResult<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

fn bad_request<T>(err: impl std::fmt::Display) -> ApiResult<T> {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    )
}

#[derive(Deserialize)]
struct WordsParams {
    /// Space-separated words (`+` in a query string).
    words: Option<String>,
}

#[derive(Deserialize)]
struct FinalWordParams {
    words: Option<String>,
    number: Option<u32>,
}

#[derive(Deserialize)]
struct ExtractParams {
    outcome: Option<u32>,
    sides: Option<u32>,
}

#[derive(Serialize)]
struct CandidatesData {
    partial: String,
    spec: EntropySpec,
    candidates: Vec<String>,
}

#[derive(Serialize)]
struct FinalWordData {
    number: u32,
    word: String,
    mnemonic: String,
}

#[derive(Serialize)]
struct ExtractData {
    outcome: u32,
    sides: u32,
    contribution: Option<Contribution>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    wordlist_words: usize,
}

fn words_of(param: Option<&str>) -> Result<Vec<&str>, SeedError> {
    let words: Vec<&str> = param.unwrap_or_default().split_whitespace().collect();
    if words.is_empty() {
        return Err(SeedError::Malformed("missing 'words' parameter".into()));
    }
    Ok(words)
}

fn partial_of(state: &AppState, param: Option<&str>) -> Result<PartialMnemonic, SeedError> {
    PartialMnemonic::new(&words_of(param)?, state.engine.wordlist())
}

async fn handle_candidates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordsParams>,
) -> ApiResult<CandidatesData> {
    let partial = match partial_of(&state, params.words.as_deref()) {
        Ok(p) => p,
        Err(e) => return bad_request(e),
    };
    let candidates = state.engine.compute_candidates(&partial);
    ok(CandidatesData {
        partial: partial.to_string(),
        spec: *partial.spec(),
        candidates: candidates.into_vec(),
    })
}

async fn handle_final_word(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FinalWordParams>,
) -> ApiResult<FinalWordData> {
    let partial = match partial_of(&state, params.words.as_deref()) {
        Ok(p) => p,
        Err(e) => return bad_request(e),
    };
    let Some(number) = params.number else {
        return bad_request("missing 'number' parameter");
    };
    match final_word_by_number(&state.engine, &partial, number) {
        Ok(word) => ok(FinalWordData {
            number,
            mnemonic: assemble(&partial, &word),
            word,
        }),
        Err(e) => bad_request(e),
    }
}

async fn handle_check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordsParams>,
) -> ApiResult<MnemonicCheck> {
    match words_of(params.words.as_deref()) {
        Ok(words) => ok(check_mnemonic(&state.engine, &words)),
        Err(e) => bad_request(e),
    }
}

async fn handle_extract(Query(params): Query<ExtractParams>) -> ApiResult<ExtractData> {
    let (Some(outcome), Some(sides)) = (params.outcome, params.sides) else {
        return bad_request("both 'outcome' and 'sides' are required");
    };
    match extract(outcome, sides) {
        Ok(contribution) => ok(ExtractData {
            outcome,
            sides,
            contribution,
        }),
        Err(e) => bad_request(e),
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        wordlist_words: state.engine.wordlist().len(),
    })
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "borderseed server",
        "version": borderseed_core::VERSION,
        "endpoints": {
            "/": "This API index",
            "/api/v1/candidates": {
                "method": "GET",
                "description": "Every valid final word for a partial mnemonic",
                "params": { "words": "11, 14, 17, 20 or 23 space-separated words" }
            },
            "/api/v1/final-word": {
                "method": "GET",
                "description": "Final word picked by final word number",
                "params": {
                    "words": "Partial mnemonic",
                    "number": "1-128 for 12 words, 1-8 for 24 words",
                }
            },
            "/api/v1/check": {
                "method": "GET",
                "description": "Dictionary, length and checksum check of a full mnemonic",
                "params": { "words": "Full mnemonic" }
            },
            "/api/v1/extract": {
                "method": "GET",
                "description": "Unbiased bits contributed by one die roll",
                "params": { "outcome": "Zero-based outcome", "sides": "Sides on the die" }
            },
            "/health": "Health check",
        },
        "examples": {
            "extract": "/api/v1/extract?outcome=4&sides=6",
            "check": "/api/v1/check?words=legal+winner+thank+year+wave+sausage+worth+useful+legal+winner+thank+yellow",
        }
    }))
}

/// Build the axum router.
fn build_router(engine: ChecksumCompletionEngine) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/v1/candidates", get(handle_candidates))
        .route("/api/v1/final-word", get(handle_final_word))
        .route("/api/v1/check", get(handle_check))
        .route("/api/v1/extract", get(handle_extract))
        .with_state(state)
}

/// Run the HTTP completion server over the English dictionary.
pub async fn run_server(host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(ChecksumCompletionEngine::english());
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, app).await
}
