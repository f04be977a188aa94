use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::{AuthSession, LoginInput, RefreshInput};
use super::errors::AuthError;
use super::password::{verify_password, DUMMY_HASH};
use super::token::{TokenIssuer, TokenKind, TokenPair};
use crate::account::repository::AccountRepository;
use crate::business::repository::BusinessRepository;

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    business: Arc<dyn BusinessRepository>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, business: Arc<dyn BusinessRepository>, tokens: TokenIssuer) -> Self {
        Self { accounts, business, tokens }
    }

    /// Authenticate by phone and password and issue an access/refresh pair.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::account::{domain::CreateAccountInput, AccountService};
    /// use service::auth::{domain::LoginInput, token::TokenIssuer, AuthService};
    /// use service::mock::MockStore;
    /// let store = Arc::new(MockStore::default());
    /// let tokens = TokenIssuer::new("secret", chrono::Duration::minutes(30), chrono::Duration::days(90));
    /// let accounts = AccountService::new(store.clone(), store.clone());
    /// let input = CreateAccountInput { phone: "13800000000".into(), password: "secret1".into(), name: "Op".into(), department_ids: vec![], roles: vec!["waybill".into()] };
    /// tokio_test::block_on(accounts.create(input)).unwrap();
    /// let svc = AuthService::new(store.clone(), store, tokens);
    /// let session = tokio_test::block_on(svc.login(LoginInput { phone: "13800000000".into(), password: "secret1".into() })).unwrap();
    /// assert!(!session.has_initialized);
    /// assert_eq!(session.token_type, "bearer");
    /// ```
    #[instrument(skip(self, input), fields(phone = %input.phone))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let account = self.accounts.find_by_phone(input.phone.trim()).await?;
        let cred = match &account {
            Some(a) => self.accounts.get_credentials(a.id).await?,
            None => None,
        };
        let (Some(account), Some(cred)) = (account, cred) else {
            // 未知手机号同样做一次哈希校验，避免通过耗时区分账号是否存在
            verify_password(&input.password, DUMMY_HASH);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&input.password, &cred.password_hash) {
            warn!(account_id = %account.id, "login_rejected");
            return Err(AuthError::InvalidCredentials);
        }
        // 密码正确后才暴露禁用状态
        if !account.is_active {
            return Err(AuthError::Disabled);
        }

        let pair = self.tokens.issue_pair(account.id, &account.phone, account.token_version)?;
        let has_initialized = self.business.find_config(account.id).await?.is_some();
        info!(account_id = %account.id, "login_succeeded");
        Ok(AuthSession {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            has_initialized,
            permissions: account.roles,
        })
    }

    /// Exchange a refresh token for a new pair.
    #[instrument(skip(self, input))]
    pub async fn refresh(&self, input: RefreshInput) -> Result<TokenPair, AuthError> {
        let claims = self.tokens.verify(&input.refresh_token, TokenKind::Refresh)?;
        let account = self
            .accounts
            .find_by_id(claims.account_id()?)
            .await?
            .ok_or_else(|| AuthError::unauthenticated("account not found"))?;
        if !account.is_active {
            return Err(AuthError::Disabled);
        }
        if account.token_version != claims.ver {
            return Err(AuthError::unauthenticated("token has been revoked"));
        }
        info!(account_id = %account.id, "token_refreshed");
        self.tokens.issue_pair(account.id, &account.phone, account.token_version)
    }
}
