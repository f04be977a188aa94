//! Authorization gate: bearer token to [`Principal`].

use std::sync::Arc;

use tracing::debug;

use super::domain::Principal;
use super::errors::AuthError;
use super::token::{TokenIssuer, TokenKind};
use crate::account::repository::AccountRepository;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or_else(|| AuthError::unauthenticated("missing Authorization header"))?;
    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| AuthError::unauthenticated("invalid Authorization format (expect Bearer)"))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::unauthenticated("invalid Authorization format (expect Bearer)"));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::unauthenticated("empty bearer token"));
    }
    Ok(token)
}

#[derive(Clone)]
pub struct AuthGate {
    accounts: Arc<dyn AccountRepository>,
    tokens: TokenIssuer,
}

impl AuthGate {
    pub fn new(accounts: Arc<dyn AccountRepository>, tokens: TokenIssuer) -> Self { Self { accounts, tokens } }

    /// Decode an access token and resolve the caller.
    ///
    /// Bad signature, expiry, wrong token kind, unknown account or a stale
    /// token version are `Unauthenticated`; a disabled account is `Disabled`.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.tokens.verify(token, TokenKind::Access)?;
        let account_id = claims.account_id()?;
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AuthError::unauthenticated("account not found"))?;
        if !account.is_active {
            return Err(AuthError::Disabled);
        }
        if account.token_version != claims.ver {
            debug!(account_id = %account.id, token_ver = claims.ver, current_ver = account.token_version, "stale token");
            return Err(AuthError::unauthenticated("token has been revoked"));
        }
        Ok(Principal::new(account))
    }
}
