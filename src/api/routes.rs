use crate::AppState;
use crate::api::render::{AdjustedView, FailureView, LinkView, render_template};
use crate::link::{
    IssueParams, LinkError, LinkRequest, PresentedLink, USAGE_MESSAGE, UsageError, verify_link,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Serialize, Deserialize)]
pub struct PingResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
}

fn usage_response(error: UsageError) -> Response {
    debug!(%error, "Rejected link request");
    (error.to_err_code(), USAGE_MESSAGE).into_response()
}

fn link_error_response(error: LinkError) -> Response {
    (error.to_err_code(), error.public_message()).into_response()
}

/// Base URL for generated links: configured public URL, else the request Host.
fn link_base(state: &AppState, headers: &HeaderMap) -> Result<String, UsageError> {
    if let Some(url) = &state.public_url {
        return Ok(url.clone());
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or(UsageError::MissingHost)?;
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|h| h.to_str().ok())
        .filter(|proto| matches!(*proto, "http" | "https"))
        .unwrap_or("http");

    Ok(format!("{scheme}://{host}"))
}

/// `GET /gen?vi=&d=&ttl=`: sign a link and render it.
pub async fn generate_link(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    params: Result<Query<IssueParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!(%rejection, "Unparseable link request");
            return (StatusCode::BAD_REQUEST, USAGE_MESSAGE).into_response();
        }
    };

    let request = match LinkRequest::parse(&params, state.default_ttl_secs) {
        Ok(request) => request,
        Err(error) => return usage_response(error),
    };
    let base = match link_base(&state, &headers) {
        Ok(base) => base,
        Err(error) => return usage_response(error),
    };
    let link = match request.issue(&state.signer, state.now()) {
        Ok(link) => link,
        Err(error) => return usage_response(error),
    };

    info!(
        target_id = %link.claims.target_id,
        direction = %link.claims.direction,
        expiry = link.claims.expiry,
        "Issued link"
    );
    render_template(LinkView::new(link.url(&base)))
}

/// `GET /adjust?vi=&d=&exp=&sig=`: verify a link and apply its adjustment.
///
/// Links are not single use: every valid redemption before expiry is
/// forwarded to the inventory backend.
pub async fn redeem_link(
    Extension(state): Extension<AppState>,
    params: Result<Query<PresentedLink>, QueryRejection>,
) -> Response {
    let presented = match params {
        Ok(Query(presented)) => presented,
        Err(rejection) => {
            debug!(%rejection, "Unparseable link");
            return link_error_response(LinkError::Invalid);
        }
    };

    let adjustment = match verify_link(&state.signer, &presented, state.now()) {
        Ok(adjustment) => adjustment,
        Err(error) => {
            debug!(%error, "Link rejected");
            return link_error_response(error);
        }
    };

    match state.adjuster.adjust(&adjustment).await {
        Ok(data) => render_template(AdjustedView::new(adjustment.direction, &data)),
        Err(err) => {
            error!(target_id = %adjustment.target_id, %err, "Inventory update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                render_template(FailureView::new(&err.detail())),
            )
                .into_response()
        }
    }
}

/// `GET /ping`: check the inventory backend is reachable.
#[axum::debug_handler]
pub async fn ping(Extension(state): Extension<AppState>) -> impl IntoResponse {
    match state.adjuster.ping().await {
        Ok(shop) => (
            StatusCode::OK,
            Json(PingResponse {
                ok: true,
                shop: Some(shop),
                err: None,
            }),
        ),
        Err(err) => {
            error!(%err, "Inventory API ping failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PingResponse {
                    ok: false,
                    shop: None,
                    err: Some(err.detail()),
                }),
            )
        }
    }
}
