// ============================================================================
// API ERROR - Único tipo de error para todas las llamadas del fetch agent
// ============================================================================

use std::fmt;

use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Fallo de transporte (sin respuesta HTTP)
    Network,
    Unauthorized,
    NotFound,
    /// Resto de 4xx
    Client,
    /// 5xx
    Server,
    /// Respuesta con cuerpo no parseable
    Decode,
    /// Rechazado localmente antes de enviar la request
    Validation,
    Csv,
    /// Fallo de DOM/descarga en el navegador
    Browser,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not-found",
            Self::Client => "client",
            Self::Server => "server",
            Self::Decode => "decode",
            Self::Validation => "validation",
            Self::Csv => "csv",
            Self::Browser => "browser",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
    /// Cuerpo JSON de error devuelto por el backend, si lo hubo
    pub payload: Option<Value>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn csv(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Csv, message)
    }

    pub fn browser(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Browser, message)
    }

    /// Clasificar una respuesta HTTP no exitosa
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Client,
            _ => ApiErrorKind::Server,
        };
        let payload = serde_json::from_str::<Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(|p| p.get("message").and_then(Value::as_str).map(str::to_string))
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self {
            kind,
            message,
            status: Some(status),
            payload,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

/// Resultado uniforme de toda llamada del fetch agent
pub type FetchResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(ApiError::from_status(401, "").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::from_status(404, "").kind, ApiErrorKind::NotFound);
        assert_eq!(ApiError::from_status(422, "").kind, ApiErrorKind::Client);
        assert_eq!(ApiError::from_status(503, "").kind, ApiErrorKind::Server);
    }

    #[test]
    fn keeps_backend_message_and_payload() {
        let error = ApiError::from_status(400, r#"{"message":"title must not be empty"}"#);
        assert_eq!(error.message, "title must not be empty");
        assert_eq!(error.status, Some(400));
        assert!(error.payload.is_some());

        let plain = ApiError::from_status(500, "boom");
        assert_eq!(plain.message, "boom");
        assert!(plain.payload.is_none());

        assert_eq!(ApiError::from_status(502, "  ").message, "HTTP 502");
    }
}
