// ============================================================================
// HTTP - Transporte (SOLO comunicación HTTP, sin lógica de negocio)
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use gloo_net::http::{Method as GlooMethod, RequestBuilder};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// "METHOD /path?k=v" sin encoding, para logs y tests
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.method, self.path);
        for (i, (key, value)) in self.query.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transporte HTTP. `?Send`: en WASM todo corre en un único hilo.
#[async_trait(?Send)]
pub trait HttpTransport {
    /// `Err` solo para fallos de red; cualquier status HTTP es `Ok`
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

/// Transporte del navegador (fetch vía gloo-net)
#[derive(Clone)]
pub struct GlooTransport {
    base_url: String,
}

impl GlooTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&url).method(method);
        if !request.query.is_empty() {
            builder = builder.query(
                request
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let prepared = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| format!("Serialization error: {}", e))?,
            None => builder
                .build()
                .map_err(|e| format!("Request build error: {}", e))?,
        };

        let response = prepared
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_query_in_order() {
        let request = HttpRequest::new(Method::Get, "/memberships")
            .query("email", "ana@example.org")
            .query("page", 2);
        assert_eq!(request.describe(), "GET /memberships?email=ana@example.org&page=2");
    }

    #[test]
    fn ok_covers_2xx_only() {
        assert!(HttpResponse { status: 204, body: String::new() }.ok());
        assert!(!HttpResponse { status: 302, body: String::new() }.ok());
        assert!(!HttpResponse { status: 401, body: String::new() }.ok());
    }
}
