use crate::command::{CommandResponse, CommandStatus, ResponseMeta};
use crate::server_security::{AuthToken, AUTH_TOKEN_ENV};
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, Response as HttpResponse, StatusCode},
    response::Response,
};
use crag_protocol::{serialize_json, ErrorEnvelope};

pub(crate) fn is_authorized(headers: &HeaderMap, token: &AuthToken) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| token.matches_bearer(value))
}

pub(crate) fn error_response(code: &str, message: String) -> CommandResponse {
    let hint = match code {
        "unauthorized" => format!(
            "Admin actions need Authorization: Bearer <token> matching the server's {AUTH_TOKEN_ENV}."
        ),
        "invalid_request" => {
            "Send a JSON body like {\"action\":\"list_headlands\",\"payload\":{}}.".to_string()
        }
        _ => "Run the capabilities action to list what the server accepts.".to_string(),
    };

    CommandResponse {
        status: CommandStatus::Error,
        message: Some(message.clone()),
        error: Some(ErrorEnvelope::new(code, message).with_hint(hint)),
        hints: Vec::new(),
        next_actions: Vec::new(),
        data: serde_json::Value::Null,
        meta: ResponseMeta::default(),
    }
}

/// HTTP status for a handled command: the envelope carries the detail.
pub(crate) fn status_for(response: &CommandResponse) -> StatusCode {
    match response.error_code() {
        None => StatusCode::OK,
        Some("not_found") => StatusCode::NOT_FOUND,
        Some("conflict") => StatusCode::CONFLICT,
        Some("unauthorized") => StatusCode::UNAUTHORIZED,
        Some("internal") | Some("io") => StatusCode::INTERNAL_SERVER_ERROR,
        Some(_) => StatusCode::BAD_REQUEST,
    }
}

pub(crate) fn build_response(
    status: StatusCode,
    response: CommandResponse,
) -> Result<Response, StatusCode> {
    let bytes = serialize_json(&response)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    let mut builder = HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json");

    if status == StatusCode::UNAUTHORIZED {
        builder = builder.header("www-authenticate", "Bearer");
    }

    builder
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn authorization_header_is_checked() {
        let token = AuthToken::parse(Some("s3cret")).unwrap().unwrap();
        let mut headers = HeaderMap::new();
        assert!(!is_authorized(&headers, &token));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
        assert!(is_authorized(&headers, &token));
    }

    #[test]
    fn unauthorized_response_challenges_for_bearer() {
        let body = error_response("unauthorized", "Missing token".into());
        let status = status_for(&body);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let response = build_response(status, body).unwrap();
        assert_eq!(response.headers()["www-authenticate"], "Bearer");
    }
}
