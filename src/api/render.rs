//! HTML pages for the link endpoints.
//!
//! Every value reaches the page through an askama template, so links and
//! upstream payloads are escaped on the way out.

use crate::link::Direction;
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;

/// Page showing a freshly issued link
#[derive(Template)]
#[template(path = "link.html")]
pub struct LinkView {
    pub link: String,
}

impl LinkView {
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }
}

/// Page shown after the inventory backend accepted an adjustment
#[derive(Template)]
#[template(path = "adjusted.html")]
pub struct AdjustedView {
    pub delta: &'static str,
    pub data: String,
}

impl AdjustedView {
    pub fn new(direction: Direction, data: &Value) -> Self {
        Self {
            delta: direction.signed_label(),
            data: pretty(data),
        }
    }
}

/// Page shown when the inventory backend failed or refused
#[derive(Template)]
#[template(path = "failure.html")]
pub struct FailureView {
    pub detail: String,
}

impl FailureView {
    pub fn new(detail: &Value) -> Self {
        Self {
            detail: pretty(detail),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render a template into an HTML response, falling back to a bare 500.
pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering error").into_response()
        }
    }
}
