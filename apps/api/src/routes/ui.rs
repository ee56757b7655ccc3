use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The single page: settings panel, application form, and result panels.
/// All dynamic data comes from the JSON API.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
