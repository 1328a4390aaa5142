use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AuthenticationRequest {
    pub email: String,
    pub password: String,
}

/// El backend responde con el JWT, como objeto `{token}` o como string plano
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(untagged)]
pub enum AuthenticationResponse {
    Token { token: String },
    Raw(String),
}

impl AuthenticationResponse {
    pub fn token(&self) -> &str {
        match self {
            Self::Token { token } => token,
            Self::Raw(token) => token,
        }
    }
}
