//! Token validator: strips the bearer scheme and verifies the signature with
//! `jsonwebtoken` against a secret injected at construction.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use actionsock_core::error::{ActionSockError, Result};

use crate::config::{AuthConfig, TokenAlgorithm};

/// User object embedded in the token's `user` claim, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// `id` (or `_id`) when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
            .or_else(|| self.get("_id"))
            .and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<User> for Value {
    fn from(user: User) -> Self {
        Value::Object(user.0)
    }
}

/// Decoded claims. `exp` is enforced by the validator; the remaining
/// registered claims are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// String or array form, as issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl From<TokenAlgorithm> for Algorithm {
    fn from(alg: TokenAlgorithm) -> Self {
        match alg {
            TokenAlgorithm::HS256 => Algorithm::HS256,
            TokenAlgorithm::HS384 => Algorithm::HS384,
            TokenAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

/// Verifies bearer tokens. Construct once at startup, then share via Arc.
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Fails with a `Config` error when the secret is absent or empty.
    pub fn new(cfg: &AuthConfig, secret: Option<String>) -> Result<Self> {
        let secret = secret
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                ActionSockError::Config(format!("token secret {} is not set", cfg.secret_env))
            })?;

        let mut validation = Validation::new(cfg.algorithm.into());
        validation.leeway = cfg.leeway_secs;
        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(&[iss]);
        }
        match &cfg.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Read the secret from the environment variable named by `cfg.secret_env`.
    pub fn from_env(cfg: &AuthConfig) -> Result<Self> {
        Self::new(cfg, std::env::var(&cfg.secret_env).ok())
    }

    /// Verify `bearer` (optionally prefixed with `Bearer `) and return its claims.
    pub fn validate(&self, bearer: &str) -> Result<Claims> {
        let token = strip_scheme(bearer);
        if token.is_empty() {
            return Err(ActionSockError::InvalidToken("empty token".into()));
        }

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ActionSockError::InvalidToken("expired".into()),
                ErrorKind::InvalidSignature => {
                    ActionSockError::InvalidToken("signature mismatch".into())
                }
                _ => ActionSockError::InvalidToken(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

fn strip_scheme(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_prefix_is_optional_and_case_insensitive() {
        assert_eq!(strip_scheme("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_scheme("bearer   abc.def.ghi "), "abc.def.ghi");
        assert_eq!(strip_scheme("abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_scheme("Bearer"), "Bearer");
    }

    #[test]
    fn missing_or_blank_secret_is_a_config_error() {
        let cfg = AuthConfig::default();
        for secret in [None, Some(String::new()), Some("   ".to_string())] {
            let err = TokenValidator::new(&cfg, secret).unwrap_err();
            assert_eq!(err.client_code().as_str(), "CONFIG");
        }
    }

    #[test]
    fn user_id_falls_back_to_underscore_id() {
        let user: User = serde_json::from_value(serde_json::json!({ "_id": "u-7", "name": "ada" })).unwrap();
        assert_eq!(user.id(), Some("u-7"));
    }
}
