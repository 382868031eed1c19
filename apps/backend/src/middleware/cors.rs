use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` yields nothing usable.
const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Parse a comma-separated origin list, dropping blanks, "null" and anything
/// that is not an http(s) origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

/// CORS for the browser client. Credentials are allowed because the access
/// token travels as a cookie, which also rules out a wildcard origin.
pub fn cors_middleware() -> Cors {
    let origins = parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn keeps_valid_origins_only() {
        assert_eq!(
            parse_origins(" https://sharevites.web.app/ , null, ftp://x, http://localhost:5173"),
            vec!["https://sharevites.web.app", "http://localhost:5173"]
        );
    }

    #[test]
    fn falls_back_to_dev_origins() {
        assert_eq!(parse_origins("").len(), 2);
        assert_eq!(parse_origins("null,").len(), 2);
    }
}
