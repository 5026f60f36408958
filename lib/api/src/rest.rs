use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use qcat_core::{CategorizationResult, Categorizer, Category};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "Question Categorization Service";

/// One question per category, used by `GET /test`
pub const PROBE_QUESTIONS: [&str; 9] = [
    "Bu ürün hakkında yorum yapabilir misiniz?",
    "Özel bir sipariş vermek istiyorum",
    "Teknik destek alabilir miyim?",
    "Ürün hasarlı geldi",
    "Bu ürün orijinal mi?",
    "İade nasıl yapılır?",
    "Bu ürün stokta var mı?",
    "Hangi kargo firması kullanıyorsunuz?",
    "Siparişim ne zaman teslim edilecek?",
];

/// Shared, read-only state behind every handler
pub struct ApiState {
    pub categorizer: Arc<Categorizer>,
    /// When set, responses carry `is_high_similarity = confidence >= threshold`
    pub high_similarity_threshold: Option<f32>,
}

impl ApiState {
    pub fn new(categorizer: Arc<Categorizer>) -> Self {
        Self {
            categorizer,
            high_similarity_threshold: None,
        }
    }

    pub fn with_high_similarity_threshold(mut self, threshold: f32) -> Self {
        self.high_similarity_threshold = Some(threshold);
        self
    }

    fn is_high_similarity(&self, result: &CategorizationResult) -> Option<bool> {
        self.high_similarity_threshold
            .map(|threshold| result.confidence >= threshold)
    }
}

#[derive(Deserialize)]
struct CategorizeRequest {
    #[serde(default)]
    question: Option<String>,
}

#[derive(Serialize)]
struct CategorizeData {
    #[serde(flatten)]
    result: CategorizationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_high_similarity: Option<bool>,
}

#[derive(Serialize)]
struct ProbeResult {
    question: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct CategoryInfo {
    id: &'static str,
    name: &'static str,
    examples: usize,
}

fn failure(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "message": message.into(),
    })
}

fn round3(value: f32) -> f64 {
    (f64::from(value) * 1000.0).round() / 1000.0
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<ApiState>, host: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let state = state.clone();
            App::new()
                .wrap(cors)
                .configure(move |cfg| RestApi::configure(cfg, state))
        })
        .bind((host, port))?
        .run()
        .await
    }

    /// Register state and routes on an app
    pub fn configure(cfg: &mut web::ServiceConfig, state: Arc<ApiState>) {
        // Malformed bodies get the same envelope as a missing question.
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(failure(format!("Geçersiz istek: {}", err)));
            actix_web::error::InternalError::from_response(err, response).into()
        });

        cfg.app_data(web::Data::new(state))
            .app_data(json_config)
            .route("/", web::get().to(home))
            .route("/health", web::get().to(health))
            .route("/categories", web::get().to(list_categories))
            .route("/categorize", web::post().to(categorize))
            .route("/test", web::get().to(run_probes));
    }
}

async fn categorize(
    state: web::Data<Arc<ApiState>>,
    req: web::Json<CategorizeRequest>,
) -> ActixResult<HttpResponse> {
    let question = req
        .into_inner()
        .question
        .map(|q| q.trim().to_string())
        .unwrap_or_default();

    if question.is_empty() {
        return Ok(HttpResponse::BadRequest().json(failure("Soru parametresi gerekli")));
    }

    let shared = state.get_ref().clone();
    let outcome = web::block(move || shared.categorizer.categorize(&question)).await;

    match outcome {
        Ok(Ok(result)) => {
            let data = CategorizeData {
                is_high_similarity: state.is_high_similarity(&result),
                result,
            };
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": data,
            })))
        }
        Ok(Err(e)) => {
            error!("Categorization failed: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(failure(format!("Kategorizasyon hatası: {}", e))))
        }
        Err(e) => {
            error!("Categorization task failed: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(failure(format!("Kategorizasyon hatası: {}", e))))
        }
    }
}

async fn run_probes(state: web::Data<Arc<ApiState>>) -> ActixResult<HttpResponse> {
    let shared = state.get_ref().clone();
    let results = web::block(move || {
        PROBE_QUESTIONS
            .iter()
            .map(|&question| match shared.categorizer.categorize(question) {
                Ok(result) => ProbeResult {
                    question,
                    category: Some(result.category),
                    category_name: Some(result.category_name),
                    confidence: Some(round3(result.confidence)),
                    error: None,
                },
                Err(e) => {
                    warn!("Probe '{}' failed: {}", question, e);
                    ProbeResult {
                        question,
                        category: None,
                        category_name: None,
                        confidence: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect::<Vec<_>>()
    })
    .await?;

    info!("Ran {} probe questions", results.len());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "test_results": results,
    })))
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

async fn list_categories(state: web::Data<Arc<ApiState>>) -> ActixResult<HttpResponse> {
    let categories: Vec<CategoryInfo> = state
        .categorizer
        .categories()
        .map(|c| CategoryInfo {
            id: c.id(),
            name: c.display_name(),
            examples: c.examples().len(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "categories": categories,
    })))
}

async fn home(state: web::Data<Arc<ApiState>>) -> ActixResult<HttpResponse> {
    let categorizer = &state.categorizer;
    let ids: Vec<&'static str> = categorizer.categories().map(Category::id).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "Question Categorization API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Embedding based question categorization",
        "embedding_provider": categorizer.provider_name(),
        "embedding_model": categorizer.model(),
        "embedding_dimension": categorizer.dimension(),
        "high_similarity_threshold": state.high_similarity_threshold,
        "categories": ids,
        "endpoints": {
            "POST /categorize": "Categorize a question",
            "GET /categories": "List categories",
            "GET /test": "Run the built-in probe questions",
            "GET /health": "Health check",
            "GET /": "API description (this page)",
        },
        "usage_example": {
            "url": "POST /categorize",
            "request": { "question": "Bu ürün orijinal mi?" },
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use qcat_core::{EmbeddingError, EmbeddingProvider, Vector};
    use serde_json::{json, Value};

    /// Category axis for any verbatim example, spare axis otherwise.
    struct TableEmbedder;

    impl EmbeddingProvider for TableEmbedder {
        fn name(&self) -> &str {
            "table"
        }

        fn model(&self) -> &str {
            "table-v1"
        }

        fn dimension(&self) -> usize {
            Category::ALL.len() + 1
        }

        fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError> {
            let mut data = vec![0.0; self.dimension()];
            match Category::ALL.iter().position(|c| c.examples().contains(&text)) {
                Some(axis) => data[axis] = 1.0,
                None => data[Category::ALL.len()] = 1.0,
            }
            Ok(Vector::new(data))
        }
    }

    /// Builds centroids fine, then fails every live query.
    struct BrokenAfterInit;

    impl EmbeddingProvider for BrokenAfterInit {
        fn name(&self) -> &str {
            "broken"
        }

        fn model(&self) -> &str {
            "broken-v1"
        }

        fn dimension(&self) -> usize {
            2
        }

        fn embed_one(&self, _text: &str) -> Result<Vector, EmbeddingError> {
            Err(EmbeddingError::Request("model server down".to_string()))
        }

        fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vector>, EmbeddingError> {
            Ok(texts.iter().map(|_| Vector::new(vec![1.0, 0.0])).collect())
        }
    }

    fn state_with(provider: Arc<dyn EmbeddingProvider>) -> Arc<ApiState> {
        let categorizer = Arc::new(Categorizer::new(provider).unwrap());
        Arc::new(ApiState::new(categorizer))
    }

    macro_rules! app {
        ($state:expr) => {{
            let state = $state;
            actix_test::init_service(App::new().configure(move |cfg| RestApi::configure(cfg, state))).await
        }};
    }

    #[actix_web::test]
    async fn test_categorize_success() {
        let app = app!(state_with(Arc::new(TableEmbedder)));

        let req = actix_test::TestRequest::post()
            .uri("/categorize")
            .set_json(json!({ "question": "  Bu ürün stokta var mı?  " }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["category"], "stok");
        assert_eq!(body["data"]["category_name"], "stok");
        assert_eq!(body["data"]["method"], "embedding");
        assert_eq!(body["data"]["similarities"].as_object().unwrap().len(), 9);
        assert!(body["data"].get("is_high_similarity").is_none());
    }

    #[actix_web::test]
    async fn test_high_similarity_policy() {
        let categorizer = Arc::new(Categorizer::new(Arc::new(TableEmbedder)).unwrap());
        let state = Arc::new(ApiState::new(categorizer).with_high_similarity_threshold(0.7));
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/categorize")
            .set_json(json!({ "question": "Ürün hasarlı geldi" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["category"], "yanlis_hasarli");
        assert_eq!(body["data"]["is_high_similarity"], true);

        let req = actix_test::TestRequest::post()
            .uri("/categorize")
            .set_json(json!({ "question": "asdkjaslkdj random gibberish" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["is_high_similarity"], false);
    }

    #[actix_web::test]
    async fn test_missing_or_blank_question_is_bad_request() {
        let app = app!(state_with(Arc::new(TableEmbedder)));

        for payload in [json!({}), json!({ "question": "   " }), json!({ "question": null })] {
            let req = actix_test::TestRequest::post()
                .uri("/categorize")
                .set_json(payload)
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = actix_test::read_body_json(resp).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["message"], "Soru parametresi gerekli");
        }
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app!(state_with(Arc::new(TableEmbedder)));

        let req = actix_test::TestRequest::post()
            .uri("/categorize")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_provider_failure_is_server_error() {
        let app = app!(state_with(Arc::new(BrokenAfterInit)));

        let req = actix_test::TestRequest::post()
            .uri("/categorize")
            .set_json(json!({ "question": "Kargom nerede?" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Kategorizasyon hatası"));
    }

    #[actix_web::test]
    async fn test_probe_endpoint_reports_inline_errors() {
        let app = app!(state_with(Arc::new(BrokenAfterInit)));

        let req = actix_test::TestRequest::get().uri("/test").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(resp).await;
        let results = body["test_results"].as_array().unwrap();
        assert_eq!(results.len(), PROBE_QUESTIONS.len());
        assert!(results.iter().all(|r| r["error"].is_string()));
    }

    #[actix_web::test]
    async fn test_probe_endpoint() {
        let app = app!(state_with(Arc::new(TableEmbedder)));

        let req = actix_test::TestRequest::get().uri("/test").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        let results = body["test_results"].as_array().unwrap();
        assert_eq!(results.len(), 9);

        let stok = results
            .iter()
            .find(|r| r["question"] == "Bu ürün stokta var mı?")
            .unwrap();
        assert_eq!(stok["category"], "stok");
        assert!(stok["confidence"].as_f64().unwrap() > 0.9);
    }

    #[actix_web::test]
    async fn test_health_and_listing() {
        let app = app!(state_with(Arc::new(TableEmbedder)));

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());

        let req = actix_test::TestRequest::get().uri("/categories").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 9);
        assert_eq!(categories[0]["id"], "yorum");
        assert_eq!(categories[5]["name"], "İade ve değişim");

        let req = actix_test::TestRequest::get().uri("/").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["embedding_provider"], "table");
        assert_eq!(body["categories"].as_array().unwrap().len(), 9);
        assert!(body["high_similarity_threshold"].is_null());
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.85349), 0.853);
        assert_eq!(round3(1.0), 1.0);
    }
}
