use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use snip_core::{ListRange, ShortCode};

use crate::error::{AppError, Result};
use crate::model::{
    DeleteLinkResponse, HealthResponse, LinkResponse, ListParams, SourceRequest,
};
use crate::state::AppState;

/// What a `/shorts/{key}` path segment refers to.
#[derive(Debug, PartialEq, Eq)]
enum LinkKey {
    Id(u64),
    Code(ShortCode),
}

/// Keys made only of digits are ids; anything else must be a valid code.
fn parse_key(key: &str) -> Result<LinkKey> {
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        return parse_id(key).map(LinkKey::Id);
    }

    ShortCode::new(key)
        .map(LinkKey::Code)
        .map_err(|_| AppError::InvalidCode)
}

fn parse_id(key: &str) -> Result<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidId);
    }
    key.parse().map_err(|_| AppError::InvalidId)
}

/// Decodes a `{"source": ...}` body. The `Content-Type` header is not consulted.
fn source_from(body: std::result::Result<Bytes, BytesRejection>) -> Result<String> {
    let body = body.map_err(|_| AppError::InvalidPayload)?;
    let request: SourceRequest =
        serde_json::from_slice(&body).map_err(|_| AppError::InvalidPayload)?;
    Ok(request.source)
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_links_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<LinkResponse>>> {
    let params = params.map(|Query(params)| params).unwrap_or_default();
    let range = ListRange::parse(params.start.as_deref(), params.count.as_deref());

    let links = state.manager().list(range).await?;
    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let source = source_from(payload)?;

    let link = state.manager().create(source).await?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LinkResponse>> {
    let link = match parse_key(&key)? {
        LinkKey::Id(id) => state.manager().get(id).await?,
        LinkKey::Code(code) => state.manager().get_by_code(&code).await?,
    };

    Ok(Json(link.into()))
}

pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<LinkResponse>> {
    let id = parse_id(&key)?;
    let source = source_from(payload)?;

    let link = state.manager().update(id, source).await?;
    Ok(Json(link.into()))
}

pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteLinkResponse>> {
    let id = parse_id(&key)?;

    state.manager().delete(id).await?;
    Ok(Json(DeleteLinkResponse { result: "success" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_ids() {
        assert_eq!(parse_key("1").unwrap(), LinkKey::Id(1));
        assert_eq!(parse_key("0042").unwrap(), LinkKey::Id(42));
    }

    #[test]
    fn other_keys_are_codes() {
        assert_eq!(
            parse_key("aaaaaaaaaa").unwrap(),
            LinkKey::Code(ShortCode::new_unchecked("aaaaaaaaaa"))
        );
        assert_eq!(
            parse_key("a1_").unwrap(),
            LinkKey::Code(ShortCode::new_unchecked("a1_"))
        );
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(matches!(parse_key("-1"), Err(AppError::InvalidCode)));
        assert!(matches!(parse_key("a b"), Err(AppError::InvalidCode)));
        assert!(matches!(
            parse_key("99999999999999999999999"),
            Err(AppError::InvalidId)
        ));
    }

    #[test]
    fn source_is_decoded_from_raw_body() {
        let body = |raw: &'static str| Ok(Bytes::from_static(raw.as_bytes()));

        assert_eq!(source_from(body(r#"{"source":"http://a.b"}"#)).unwrap(), "http://a.b");
        assert_eq!(source_from(body("{}")).unwrap(), "");
        assert!(matches!(source_from(body("{not json")), Err(AppError::InvalidPayload)));
        assert!(matches!(source_from(body("")), Err(AppError::InvalidPayload)));
    }

    #[test]
    fn ids_must_be_unsigned_integers() {
        assert_eq!(parse_id("7").unwrap(), 7);
        assert!(matches!(parse_id("-1"), Err(AppError::InvalidId)));
        assert!(matches!(parse_id("+1"), Err(AppError::InvalidId)));
        assert!(matches!(parse_id("abc"), Err(AppError::InvalidId)));
        assert!(matches!(parse_id(""), Err(AppError::InvalidId)));
    }
}
