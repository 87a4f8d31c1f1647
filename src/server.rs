use crate::{
    error::{StorageError, StudioError},
    models::{EditInstruction, GenerationRequest, ImageData, NewArtifact},
    orchestrator::Studio,
    storage::ArtifactStoreManager,
};
use actix_web::{
    http::StatusCode, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Request bodies carry base64 images, so the default 32 KiB limit is far too
/// small.
const JSON_LIMIT_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState {
    pub studio: Studio,
    pub store: ArtifactStoreManager,
}

#[derive(Debug, Deserialize)]
pub struct EditBody {
    pub image: ImageData,
    pub instruction: EditInstruction,
}

#[derive(Debug, Deserialize)]
pub struct EditTextBody {
    pub text: String,
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub image: ImageData,
    pub question: String,
}

#[derive(Debug, Serialize)]
struct ImageReply {
    image: ImageData,
}

impl ResponseError for StudioError {
    fn status_code(&self) -> StatusCode {
        match self {
            StudioError::Validation(_) => StatusCode::BAD_REQUEST,
            StudioError::Generation(_) => StatusCode::BAD_GATEWAY,
            StudioError::Storage(StorageError::Full(_)) => StatusCode::INSUFFICIENT_STORAGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected: {}", self);
        }
        HttpResponse::build(status).json(json!({ "error": self.user_message() }))
    }
}

async fn health(state: web::Data<AppState>) -> impl Responder {
    let storage = state.store.health_check().await.unwrap_or(false);
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "backend": state.studio.client().name(),
        "storage": storage,
    }))
}

async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerationRequest>,
) -> Result<HttpResponse, StudioError> {
    let set = state.studio.generate(&body).await?;
    Ok(HttpResponse::Ok().json(set))
}

async fn edit(
    state: web::Data<AppState>,
    body: web::Json<EditBody>,
) -> Result<HttpResponse, StudioError> {
    let image = state.studio.apply_edit(&body.image, &body.instruction).await?;
    Ok(HttpResponse::Ok().json(ImageReply { image }))
}

async fn edit_text(
    state: web::Data<AppState>,
    body: web::Json<EditTextBody>,
) -> Result<HttpResponse, StudioError> {
    let text = state.studio.edit_text(&body.text, &body.instruction).await?;
    Ok(HttpResponse::Ok().json(json!({ "text": text })))
}

async fn analyze(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeBody>,
) -> Result<HttpResponse, StudioError> {
    let answer = state.studio.analyze_image(&body.image, &body.question).await?;
    Ok(HttpResponse::Ok().json(json!({ "answer": answer })))
}

async fn list_artifacts(state: web::Data<AppState>) -> Result<HttpResponse, StudioError> {
    Ok(HttpResponse::Ok().json(state.store.list().await?))
}

async fn save_artifact(
    state: web::Data<AppState>,
    body: web::Json<NewArtifact>,
) -> Result<HttpResponse, StudioError> {
    let artifacts = state.store.save(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(artifacts))
}

async fn delete_artifact(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, StudioError> {
    Ok(HttpResponse::Ok().json(state.store.delete(&id).await?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT_BYTES))
        .route("/health", web::get().to(health))
        .route("/generate", web::post().to(generate))
        .route("/edit", web::post().to(edit))
        .route("/edit-text", web::post().to(edit_text))
        .route("/analyze", web::post().to(analyze))
        .route("/artifacts", web::get().to(list_artifacts))
        .route("/artifacts", web::post().to(save_artifact))
        .route("/artifacts/{id}", web::delete().to(delete_artifact));
}

pub async fn run(state: AppState, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(state);
    log::info!("🌐 Listening on http://127.0.0.1:{}", port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("127.0.0.1", port))?
        .run()
        .await
}
