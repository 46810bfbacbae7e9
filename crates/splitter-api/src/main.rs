use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use splitter_core::{SplitError, SplitPlan, SplitRequest, SplitResult, Splitter};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Splitter API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Shopping List Splitter API");

    // Build application
    let app = Router::new()
        .route("/", get(serve_ui))
        .route("/api/health", get(health_check))
        .route("/api/split", post(split))
        .route("/api/generate/svg", post(generate_svg))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to port 3000");

    info!("API server listening on http://0.0.0.0:3000");
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app).await.expect("Server error");
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "splitter-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main split endpoint
async fn split(Json(request): Json<SplitRequest>) -> Result<Json<SplitResult>, AppError> {
    let group_count = match &request.plan {
        SplitPlan::Uniform {
            number_of_groups, ..
        } => *number_of_groups,
        SplitPlan::Tiered { group_specs } => group_specs.iter().map(|s| s.count).sum(),
    };
    info!(
        "Received split request with {} items for {} groups",
        request.items.len(),
        group_count
    );

    let splitter = Splitter::new(request)?;
    let result = splitter.split();

    info!(
        "Split complete: {} groups, {:.2} total excess",
        result.summary.group_count, result.summary.total_excess
    );

    Ok(Json(result))
}

/// Generate SVG visualization
async fn generate_svg(Json(result): Json<SplitResult>) -> Result<Response, AppError> {
    info!("Generating SVG for {} groups", result.groups.len());

    let svg = generate_svg_content(&result)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Generate SVG content from a split result
fn generate_svg_content(result: &SplitResult) -> Result<String, AppError> {
    use std::fmt::Write;

    let mut svg = String::new();
    let margin = 20.0;
    let column_width = 140.0;
    let column_spacing = 30.0;
    let chart_height = 400.0;

    let max_amount = result
        .groups
        .iter()
        .map(|g| g.total.max(g.target_amount))
        .fold(1.0, f64::max);
    let scale = chart_height / max_amount;

    let svg_width =
        (result.groups.len() as f64) * (column_width + column_spacing) + 2.0 * margin;
    let svg_height = chart_height + 2.0 * margin + 40.0;

    // SVG header
    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )
    .unwrap();

    // Background
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )
    .unwrap();

    let baseline = margin + chart_height;

    for (idx, group) in result.groups.iter().enumerate() {
        let x = margin + (idx as f64) * (column_width + column_spacing);

        // Draw column background
        writeln!(&mut svg, r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" stroke="#333" stroke-width="2"/>"##,
                 x, margin, column_width, chart_height).unwrap();

        // Draw group label
        writeln!(&mut svg, r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">Group {} — {:.2}</text>"##,
                 x, margin - 5.0, group.number, group.total).unwrap();

        // Draw stacked units, bottom up
        let mut y_cursor = baseline;
        for unit in &group.units {
            let height = (unit.value * scale).max(1.0);
            y_cursor -= height;

            writeln!(&mut svg, r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.7"/>"##,
                     x + 2.0, y_cursor, column_width - 4.0, height - 1.0).unwrap();

            let label = if unit.original_quantity > 1 {
                format!(
                    "{} ({}/{})",
                    unit.name, unit.unit_index, unit.original_quantity
                )
            } else {
                unit.name.clone()
            };

            writeln!(&mut svg, r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#fff" text-anchor="middle">{}</text>"##,
                     x + column_width / 2.0, y_cursor + height / 2.0 + 3.0, label).unwrap();
        }

        // Draw target line
        let target_y = baseline - group.target_amount * scale;
        writeln!(&mut svg, r##"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#E65100" stroke-width="2" stroke-dasharray="6 3"/>"##,
                 x, target_y, x + column_width, target_y).unwrap();
        writeln!(&mut svg, r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#E65100">target {:.2}</text>"##,
                 x + 2.0, target_y - 3.0, group.target_amount).unwrap();
    }

    // Summary
    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">"##,
        margin,
        svg_height - margin + 10.0
    )
    .unwrap();
    writeln!(
        &mut svg,
        r#"    Groups: {} | Excess: {:.2}"#,
        result.summary.group_count, result.summary.total_excess
    )
    .unwrap();
    writeln!(&mut svg, r#"  </text>"#).unwrap();

    writeln!(&mut svg, "</svg>").unwrap();

    Ok(svg)
}

/// Application error type
struct AppError(anyhow::Error);

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let message = self.0.to_string();
        let status = if message.contains("Invalid argument") {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(json!({
                "error": message,
            })),
        )
            .into_response()
    }
}

async fn serve_ui() -> impl IntoResponse {
    // Read the UI file
    match std::fs::read_to_string("web/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>Shopping List Splitter</title>
            </head>
            <body>
                <h1>Shopping List Splitter API</h1>
                <p>Web UI file not found. Please ensure web/index.html exists.</p>
                <h2>API Endpoints:</h2>
                <ul>
                    <li>GET /api/health - Health check</li>
                    <li>POST /api/split - Split a shopping list</li>
                    <li>POST /api/generate/svg - Generate SVG visualization</li>
                </ul>
            </body>
            </html>
        "#
            .to_string(),
        ),
    }
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
