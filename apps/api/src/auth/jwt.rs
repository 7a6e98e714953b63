use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by identity-provider session tokens. `sub` is the external user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DecodeJwtError {
    #[error("session token has expired")]
    Expired,
    #[error("session token is invalid")]
    Invalid,
}

/// Verification material for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    decoding: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8], issuer: Option<String>) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
            issuer,
            audience: None,
        }
    }

    /// Requires tokens to name `audience` in `aud`. Without one, `aud` is not checked.
    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }
}

impl SessionClaims {
    pub fn decode(keys: &SessionKeys, token: &str) -> Result<Self, DecodeJwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        let mut required = vec!["exp"];
        if let Some(issuer) = &keys.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &keys.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        let token = token.replace(char::is_whitespace, "");
        match jsonwebtoken::decode::<SessionClaims>(&token, &keys.decoding, &validation) {
            Ok(data) if data.claims.sub.is_empty() => Err(DecodeJwtError::Invalid),
            Ok(data) => Ok(data.claims),
            Err(error) => match error.kind() {
                ErrorKind::ExpiredSignature => Err(DecodeJwtError::Expired),
                _ => Err(DecodeJwtError::Invalid),
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::testing::*;
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::from_secret(TEST_SECRET, None)
    }

    #[test]
    fn test_decode_valid_token() {
        let claims = SessionClaims::decode(&keys(), &token_for("user_123")).unwrap();
        assert_eq!(claims.sub, "user_123");
    }

    #[test]
    fn test_decode_strips_whitespace() {
        let token = token_for("user_123");
        let (head, tail) = token.split_at(10);
        let spaced = format!(" {head}\n {tail} ");
        assert!(SessionClaims::decode(&keys(), &spaced).is_ok());
    }

    #[test]
    fn test_decode_wrong_secret() {
        let token = mint(&claims_for("user_123"), b"another-secret");
        assert_eq!(
            SessionClaims::decode(&keys(), &token).unwrap_err(),
            DecodeJwtError::Invalid
        );
    }

    #[test]
    fn test_decode_expired() {
        let mut claims = claims_for("user_123");
        claims.exp = (Utc::now() - TimeDelta::hours(2)).timestamp();
        claims.nbf = None;
        let token = mint(&claims, TEST_SECRET);
        assert_eq!(
            SessionClaims::decode(&keys(), &token).unwrap_err(),
            DecodeJwtError::Expired
        );
    }

    #[test]
    fn test_decode_checks_issuer_when_configured() {
        let keys = SessionKeys::from_secret(TEST_SECRET, Some("https://auth.example".into()));

        let mut claims = claims_for("user_123");
        assert!(SessionClaims::decode(&keys, &mint(&claims, TEST_SECRET)).is_err());

        claims.iss = Some("https://auth.example".into());
        assert!(SessionClaims::decode(&keys, &mint(&claims, TEST_SECRET)).is_ok());
    }

    fn mint_with_aud(aud: &str) -> String {
        let mut claims = serde_json::to_value(claims_for("u1")).unwrap();
        claims["aud"] = serde_json::json!(aud);
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_ignores_audience_when_unconfigured() {
        let claims = SessionClaims::decode(&keys(), &mint_with_aud("editor")).unwrap();
        assert_eq!(claims.sub, "u1");
    }

    #[test]
    fn test_decode_checks_audience_when_configured() {
        let keys = keys().with_audience(Some("editor".into()));
        assert!(SessionClaims::decode(&keys, &mint_with_aud("editor")).is_ok());
        assert_eq!(
            SessionClaims::decode(&keys, &mint_with_aud("billing")).unwrap_err(),
            DecodeJwtError::Invalid
        );
        assert!(SessionClaims::decode(&keys, &token_for("u1")).is_err());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(SessionClaims::decode(&keys(), "not-a-jwt").is_err());
    }
}
