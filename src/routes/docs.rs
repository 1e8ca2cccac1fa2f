use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Location of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/v1/openapi.json";

/// Swagger UI at `/docs`, reading the document served at [`OPENAPI_PATH`].
pub fn router() -> Router<SharedState> {
    SwaggerUi::new("/docs").url(OPENAPI_PATH, ApiDoc::openapi()).into()
}
