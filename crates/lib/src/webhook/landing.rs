//! Landing page and embedded static assets.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use include_dir::{include_dir, Dir};

static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Magic Mirror</title>
<link rel='stylesheet' href='/static/style.css'/>
</head>
<body>
<h1>Magic Mirror</h1>
<div id='mirror'><img src="/static/mirror.svg" alt="Magic Mirror"/></div>
</body>
</html>"#;

/// GET / returns the fixed landing page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => "text/css; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// GET /static/*path serves files compiled into the binary.
pub async fn static_asset(Path(path): Path<String>) -> Response {
    match STATIC_ASSETS.get_file(&path) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type_for(&path))],
            file.contents(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_links_embedded_assets() {
        for asset in ["style.css", "mirror.svg"] {
            assert!(INDEX_HTML.contains(&format!("/static/{}", asset)));
            assert!(STATIC_ASSETS.get_file(asset).is_some(), "{} not embedded", asset);
        }
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("style.css"), "text/css; charset=utf-8");
        assert_eq!(content_type_for("mirror.svg"), "image/svg+xml");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
