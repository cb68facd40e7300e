//! Token management for registry requests
//!
//! Requests are sent with whatever authorization is cached for their scope.
//! A `401` answer is resolved once from its challenge (bearer token or basic
//! credentials) and the request is retried with the new authorization.

use crate::cli::config::AuthConfig;
use crate::error::{RegistryError, Result};
use crate::error::handlers::NetworkErrorHandler;
use crate::logging::Logger;
use crate::registry::auth::{Auth, AuthChallenge};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
enum Authorization {
    Bearer(String),
    Basic,
}

/// Thread-safe per-scope authorization cache
#[derive(Debug, Clone)]
pub struct TokenManager {
    auth: Auth,
    credentials: Option<AuthConfig>,
    authorizations: Arc<RwLock<HashMap<String, Authorization>>>,
    output: Logger,
}

impl TokenManager {
    pub fn new(auth: Auth, credentials: Option<AuthConfig>, output: Logger) -> Self {
        Self {
            auth,
            credentials: credentials.filter(|c| !c.is_anonymous()),
            authorizations: Arc::new(RwLock::new(HashMap::new())),
            output,
        }
    }

    /// Scope string for repository access
    pub fn repository_scope(repository: &str, push: bool) -> String {
        if push {
            format!("repository:{}:pull,push", repository)
        } else {
            format!("repository:{}:pull", repository)
        }
    }

    fn cached(&self, scope: &str) -> Result<Option<Authorization>> {
        let guard = self.authorizations.read().map_err(|_| {
            RegistryError::Registry("Failed to acquire token read lock".to_string())
        })?;
        Ok(guard.get(scope).cloned())
    }

    fn store(&self, scope: &str, authorization: Authorization) -> Result<()> {
        let mut guard = self.authorizations.write().map_err(|_| {
            RegistryError::Registry("Failed to acquire token write lock".to_string())
        })?;
        guard.insert(scope.to_string(), authorization);
        Ok(())
    }

    fn authorize(
        &self,
        request: RequestBuilder,
        authorization: Option<&Authorization>,
    ) -> RequestBuilder {
        match (authorization, &self.credentials) {
            (Some(Authorization::Bearer(token)), _) => request.bearer_auth(token),
            (Some(Authorization::Basic), Some(credentials)) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            _ => request,
        }
    }

    /// Send a request once with the cached authorization for `scope`.
    pub async fn send_once(
        &self,
        request: RequestBuilder,
        scope: &str,
        context: &str,
    ) -> Result<Response> {
        let authorization = self.cached(scope)?;
        self.authorize(request, authorization.as_ref())
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, context))
    }

    /// Send a request, resolving one authentication challenge if the registry
    /// answers `401`. `build` must produce a fresh request for each attempt.
    pub async fn execute_with_retry<F>(
        &self,
        build: F,
        scope: &str,
        context: &str,
    ) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let response = self.send_once(build(), scope, context).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let challenge = response
            .headers()
            .get(reqwest::header::WWW_AUTHENTICATE)
            .and_then(|h| h.to_str().ok())
            .and_then(AuthChallenge::parse);

        let Some(challenge) = challenge else {
            self.output.detail(&format!("{}: 401 without a usable challenge", context));
            return Ok(response);
        };

        match &challenge {
            AuthChallenge::Basic => {
                if self.credentials.is_none() {
                    self.output.detail(&format!("{}: registry requires credentials", context));
                    return Ok(response);
                }
                self.output.detail("Registry uses basic authentication");
                self.store(scope, Authorization::Basic)?;
            }
            AuthChallenge::Bearer { .. } => {
                let token = self
                    .auth
                    .get_token(&challenge, scope, self.credentials.as_ref(), &self.output)
                    .await?;
                self.output.detail(&format!("Token obtained for scope {}", scope));
                self.store(scope, Authorization::Bearer(token))?;
            }
        }

        self.send_once(build(), scope, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_scope() {
        assert_eq!(TokenManager::repository_scope("team/app", false), "repository:team/app:pull");
        assert_eq!(
            TokenManager::repository_scope("team/app", true),
            "repository:team/app:pull,push"
        );
    }
}
