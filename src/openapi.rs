use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::gateway::handlers;

/// OpenAPI documentation for the proxy gateway
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tianqi Gateway",
        version = "0.1.0",
        description = "Same-origin relay for the 60s weather API. Bodies are relayed unchanged; upstream failures become a uniform 500 error object."
    ),
    paths(handlers::health, handlers::get_weather, handlers::get_forecast),
    tags(
        (name = "proxy", description = "Realtime weather and forecast relay"),
        (name = "gateway", description = "Gateway status")
    ),
    components(schemas(ErrorResponse))
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_proxy_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/weather"));
        assert!(doc.paths.paths.contains_key("/api/forecast"));
    }
}
