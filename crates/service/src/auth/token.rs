//! HS256 access/refresh token issuing and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    pub phone: String,
    /// Account token version at issue time.
    pub ver: i64,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::unauthenticated("malformed token subject"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(
            &cfg.jwt_secret,
            Duration::minutes(cfg.access_token_expire_minutes),
            Duration::days(cfg.refresh_token_expire_days),
        )
    }

    pub fn issue(&self, kind: TokenKind, account_id: Uuid, phone: &str, version: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenError("token lifetime out of range".into()))?;
        let claims = Claims {
            sub: account_id.to_string(),
            phone: phone.to_string(),
            ver: version,
            typ: kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn issue_pair(&self, account_id: Uuid, phone: &str, version: i64) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, account_id, phone, version)?,
            refresh_token: self.issue(TokenKind::Refresh, account_id, phone, version)?,
            token_type: "bearer".to_string(),
        })
    }

    /// Check signature, expiry and token kind. Every failure is `Unauthenticated`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::Unauthenticated(format!("invalid token: {e}")))?;
        if data.claims.typ != expected {
            return Err(AuthError::unauthenticated("wrong token type"));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret, Duration::minutes(30), Duration::days(90))
    }

    #[test]
    fn access_token_verifies_with_claims() {
        let iss = issuer("k1");
        let id = Uuid::new_v4();
        let t = iss.issue(TokenKind::Access, id, "13800000000", 3).unwrap();
        let c = iss.verify(&t, TokenKind::Access).unwrap();
        assert_eq!(c.account_id().unwrap(), id);
        assert_eq!(c.phone, "13800000000");
        assert_eq!(c.ver, 3);
        assert!(c.exp > c.iat);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let iss = issuer("k1");
        let pair = iss.issue_pair(Uuid::new_v4(), "13800000000", 0).unwrap();
        assert!(matches!(iss.verify(&pair.access_token, TokenKind::Refresh), Err(AuthError::Unauthenticated(_))));
        assert!(matches!(iss.verify(&pair.refresh_token, TokenKind::Access), Err(AuthError::Unauthenticated(_))));
        assert!(iss.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn forged_signature_is_rejected() {
        let t = issuer("k1").issue(TokenKind::Access, Uuid::new_v4(), "13800000000", 0).unwrap();
        assert!(matches!(issuer("k2").verify(&t, TokenKind::Access), Err(AuthError::Unauthenticated(_))));
        assert!(issuer("k1").verify("garbage.token.value", TokenKind::Access).is_err());
    }

    #[test]
    fn lifetime_past_calendar_range_is_an_error() {
        // 约 27 万年，超出 DateTime 可表示范围
        let iss = TokenIssuer::new("k1", Duration::days(100_000_000), Duration::days(90));
        let err = iss.issue(TokenKind::Access, Uuid::new_v4(), "13800000000", 0).unwrap_err();
        assert!(matches!(err, AuthError::TokenError(_)));
        assert!(iss.issue(TokenKind::Refresh, Uuid::new_v4(), "13800000000", 0).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let iss = TokenIssuer::new("k1", Duration::minutes(-5), Duration::days(1));
        let t = iss.issue(TokenKind::Access, Uuid::new_v4(), "13800000000", 0).unwrap();
        assert!(matches!(iss.verify(&t, TokenKind::Access), Err(AuthError::Unauthenticated(_))));
    }
}
