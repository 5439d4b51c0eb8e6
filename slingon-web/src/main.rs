use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use slingon::{Direction, EngineConfig, FileStore, SlingonError, TranslationEngine};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_direction() -> String {
    Direction::Forward.code().to_string()
}

#[derive(Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
    pub source: String,
    pub warnings: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DictionaryEntry {
    pub source: String,
    pub target: String,
}

#[derive(Serialize, Deserialize)]
pub struct DictionaryResponse {
    pub entries: Vec<DictionaryEntry>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TranslationEngine>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/translate", post(translate_text))
        .route("/api/dictionary", get(list_dictionary).post(add_entry))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env()
        .map_err(|e| format!("Failed to read configuration: {}", e))?;
    let addr = std::env::var("SLINGON_WEB_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    info!(
        "📖 Loading dictionary '{}' from {}",
        config.dictionary_key,
        config.store_dir.display()
    );
    let store = Arc::new(FileStore::new(&config.store_dir));
    let engine = TranslationEngine::load(store, config).await;
    let state = AppState {
        engine: Arc::new(engine),
    };

    info!("🚀 Starting Slingon translator at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn translate_text(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let direction: Direction = request
        .direction
        .parse()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    if request.text.trim().is_empty() {
        return Ok(Json(TranslateResponse {
            translated: String::new(),
            source: request.text,
            warnings: Vec::new(),
        }));
    }

    let translation = state.engine.translate(&request.text, direction).await;
    info!(
        "Translated {} chars ({}), learned {} words",
        request.text.chars().count(),
        direction.code(),
        translation.learned.len()
    );

    Ok(Json(TranslateResponse {
        translated: translation.text,
        source: request.text,
        warnings: translation.warnings.iter().map(|w| w.to_string()).collect(),
    }))
}

async fn list_dictionary(State(state): State<AppState>) -> Json<DictionaryResponse> {
    let entries = state
        .engine
        .dictionary_snapshot()
        .await
        .into_iter()
        .map(|(source, target)| DictionaryEntry { source, target })
        .collect();
    Json(DictionaryResponse { entries })
}

async fn add_entry(
    State(state): State<AppState>,
    Json(entry): Json<DictionaryEntry>,
) -> Result<(StatusCode, Json<DictionaryEntry>), ApiError> {
    match state.engine.add_manual_entry(&entry.source, &entry.target).await {
        Ok(()) => {
            info!("Added dictionary entry '{}'", entry.source.trim());
            Ok((
                StatusCode::CREATED,
                Json(DictionaryEntry {
                    source: entry.source.trim().to_lowercase(),
                    target: entry.target.trim().to_lowercase(),
                }),
            ))
        }
        Err(e @ SlingonError::InvalidManualEntry(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e))
        }
        Err(e @ SlingonError::StoreUnavailable(_)) => {
            Err(api_error(StatusCode::SERVICE_UNAVAILABLE, e))
        }
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use slingon::{Dictionary, MockStore, MockStoreMode};
    use tower::ServiceExt;

    fn test_app(mode: MockStoreMode) -> Router {
        let store = Arc::new(MockStore::new(mode));
        let engine =
            TranslationEngine::with_dictionary(store, EngineConfig::default(), Dictionary::seed());
        app(AppState {
            engine: Arc::new(engine),
        })
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_translate_forward() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(json_request(
                "POST",
                "/api/translate",
                serde_json::json!({"text": "Я иду домой."}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["translated"], "Би ыго гүцүй.");
        assert_eq!(body["source"], "Я иду домой.");
        assert_eq!(body["warnings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_translate_reverse() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(json_request(
                "POST",
                "/api/translate",
                serde_json::json!({"text": "Би шах", "direction": "sl-ru"}),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["translated"], "Я ты");
    }

    #[tokio::test]
    async fn test_translate_reports_store_warnings() {
        let response = test_app(MockStoreMode::ReadOnly)
            .oneshot(json_request(
                "POST",
                "/api/translate",
                serde_json::json!({"text": "новое слово"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["warnings"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_translate_blank_text() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(json_request(
                "POST",
                "/api/translate",
                serde_json::json!({"text": "   "}),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["translated"], "");
    }

    #[tokio::test]
    async fn test_translate_unknown_direction() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(json_request(
                "POST",
                "/api/translate",
                serde_json::json!({"text": "я", "direction": "en-fr"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_dictionary() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(
                Request::builder()
                    .uri("/api/dictionary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0]["source"], "я");
        assert_eq!(entries[0]["target"], "би");
    }

    #[tokio::test]
    async fn test_add_entry() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(json_request(
                "POST",
                "/api/dictionary",
                serde_json::json!({"source": "Кот", "target": "Мяу"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["source"], "кот");
        assert_eq!(body["target"], "мяу");
    }

    #[tokio::test]
    async fn test_add_entry_rejects_empty_word() {
        let response = test_app(MockStoreMode::Healthy)
            .oneshot(json_request(
                "POST",
                "/api/dictionary",
                serde_json::json!({"source": "", "target": "мяу"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_entry_store_down() {
        let response = test_app(MockStoreMode::Unavailable)
            .oneshot(json_request(
                "POST",
                "/api/dictionary",
                serde_json::json!({"source": "кот", "target": "мяу"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
