//! Credentials and request decoration.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::http::HttpRequest;

/// Attaches credentials to an outgoing request.
pub trait Authenticator: Send + Sync + fmt::Debug {
    fn decorate(&self, request: &mut HttpRequest);
}

/// HTTP Basic authentication.
#[derive(Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl Authenticator for BasicAuth {
    fn decorate(&self, request: &mut HttpRequest) {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        request.set_header("authorization", format!("Basic {encoded}"));
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token authentication.
#[derive(Clone)]
pub struct TokenAuth {
    pub token: String,
}

impl Authenticator for TokenAuth {
    fn decorate(&self, request: &mut HttpRequest) {
        request.set_header("authorization", format!("Bearer {}", self.token));
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth").field("token", &"<redacted>").finish()
    }
}

/// The credential scheme a client is built with.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Token(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Credentials::Token(token.into())
    }

    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        match self {
            Credentials::Basic { username, password } => Arc::new(BasicAuth {
                username: username.clone(),
                password: password.clone(),
            }),
            Credentials::Token(token) => Arc::new(TokenAuth {
                token: token.clone(),
            }),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}
