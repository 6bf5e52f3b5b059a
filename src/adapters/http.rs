//! Inbound HTTP: the upload form and the `/upload_and_cut` endpoint.

use crate::application::orchestrator::OrchestratorService;
use crate::domain::media::VIDEO_FIELD;
use crate::domain::report::AggregatedReport;
use crate::error::{CutError, NO_VIDEO_FILE};
use crate::ports::{MediaProbe, SegmentRelay, SegmentTranscoder};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const UPLOAD_FORM: &str = r#"<!doctype html>
<html>
    <head>
        <title>Upload Video</title>
    </head>
    <body>
        <h1>Upload Video to Cut and Send</h1>
        <form action="/upload_and_cut" method="post" enctype="multipart/form-data">
            <input type="file" name="video">
            <input type="submit" value="Upload">
        </form>
    </body>
</html>
"#;

pub fn router<P, T, R>(service: Arc<OrchestratorService<P, T, R>>) -> Router
where
    P: MediaProbe + 'static,
    T: SegmentTranscoder + 'static,
    R: SegmentRelay + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/upload_and_cut", post(upload_and_cut::<P, T, R>))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn root() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

// Hands the first `video` file field to the orchestrator; other fields are skipped.
async fn upload_and_cut<P, T, R>(
    State(service): State<Arc<OrchestratorService<P, T, R>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AggregatedReport>, CutError>
where
    P: MediaProbe + 'static,
    T: SegmentTranscoder + 'static,
    R: SegmentRelay + 'static,
{
    let mut multipart =
        multipart.map_err(|rejection| CutError::ClientInput(rejection.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| CutError::ClientInput(err.body_text()))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        // a `video` part without a filename is a plain form value, not a file
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let report = service.handle_upload(&file_name, field).await?;
        return Ok(Json(report));
    }

    Err(CutError::ClientInput(NO_VIDEO_FILE.to_string()))
}

impl IntoResponse for CutError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
