//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewApiToken,
        PgAuthRepository, Principal, TokenVerifier, build_verifier_input, format_api_token,
        generate_api_token_secret, parse_api_token,
    },
    domain::{tenants::records::TenantUuid, users::UserUuid},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    verifier: TokenVerifier,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, verifier: TokenVerifier) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            verifier,
        }
    }

    /// Issue a new API token for the given tenant.
    ///
    /// Tokens without a user act as tenant admins; tokens with one act as that customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the verifier cannot be keyed or the database insertion fails.
    #[tracing::instrument(
        name = "auth.service.issue_api_token",
        skip(self),
        fields(tenant_uuid = %tenant_uuid, admin = user_uuid.is_none()),
        err
    )]
    pub async fn issue_api_token(
        &self,
        tenant_uuid: TenantUuid,
        user_uuid: Option<UserUuid>,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let verifier_input = build_verifier_input(
            &token_uuid,
            version,
            &tenant_uuid,
            user_uuid.as_ref(),
            &secret,
        );

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                tenant_uuid,
                user_uuid,
                version,
                token_hash: self.verifier.hash(&verifier_input)?,
                expires_at,
            })
            .await?;

        info!(token_uuid = %metadata.uuid, "issued api token");

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        tenant_uuid: TenantUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self
            .repository
            .list_api_tokens_by_tenant(tenant_uuid)
            .await?)
    }

    /// Revoke one of `tenant`'s tokens. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(
        &self,
        tenant: TenantUuid,
        token_uuid: Uuid,
    ) -> Result<bool, AuthServiceError> {
        let revoked = self
            .repository
            .revoke_api_token(tenant, token_uuid)
            .await?
            .is_some();

        if revoked {
            info!(%tenant, %token_uuid, "revoked api token");
        }

        Ok(revoked)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let token = self
            .repository
            .find_active_api_token_by_uuid(parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier_input = build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.tenant_uuid,
            token.user_uuid.as_ref(),
            &parsed_token.secret,
        );

        if !self.verifier.verify(&verifier_input, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Auth success does not depend on this write.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await
        {
            debug!(%error, "failed to record api token use");
        }

        Ok(Principal {
            tenant: token.tenant_uuid,
            user: token.user_uuid,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves a raw bearer token to the tenant and, for customer tokens, the user it acts as.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotFound`] for unknown, revoked, expired, or malformed tokens.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}
