//! Authentication module for Docker registry access
//!
//! Registries answer unauthenticated requests with `401` and a
//! `WWW-Authenticate` challenge. `Basic` challenges are answered directly with
//! credentials; `Bearer` challenges point at a token service that issues a
//! token for the requested scope.

use crate::cli::config::AuthConfig;
use crate::error::{RegistryError, Result};
use crate::error::handlers::NetworkErrorHandler;
use crate::logging::Logger;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChallenge {
    Basic,
    Bearer {
        realm: String,
        service: Option<String>,
        scope: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    access_token: Option<String>,
    expires_in: Option<u64>,
}

impl AuthChallenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// Parameter values may be quoted and contain commas
    /// (`scope="repository:app:pull,push"`).
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, params_str) = header.split_once(' ').unwrap_or((header, ""));

        if scheme.eq_ignore_ascii_case("basic") {
            return Some(AuthChallenge::Basic);
        }
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        let params = Self::parse_params(params_str);
        let realm = params.get("realm")?.to_string();

        Some(AuthChallenge::Bearer {
            realm,
            service: params.get("service").map(|s| s.to_string()),
            scope: params.get("scope").map(|s| s.to_string()),
        })
    }

    fn parse_params(input: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let mut chars = input.chars().peekable();

        loop {
            while matches!(chars.peek(), Some(c) if *c == ',' || c.is_whitespace()) {
                chars.next();
            }

            let key: String = chars.by_ref().take_while(|c| *c != '=').collect();
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                break;
            }

            let mut value = String::new();
            if chars.peek() == Some(&'"') {
                chars.next();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '"' => break,
                        _ => value.push(c),
                    }
                }
            } else {
                while let Some(c) = chars.peek() {
                    if *c == ',' {
                        break;
                    }
                    value.push(*c);
                    chars.next();
                }
                value = value.trim().to_string();
            }

            params.insert(key, value);
        }

        params
    }
}

#[derive(Debug, Clone)]
pub struct Auth {
    client: Client,
}

impl Auth {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Request a bearer token from the challenge's realm.
    ///
    /// Credentials are sent with HTTP Basic when present; anonymous tokens are
    /// requested otherwise (public repositories on most registries).
    pub async fn get_token(
        &self,
        challenge: &AuthChallenge,
        fallback_scope: &str,
        credentials: Option<&AuthConfig>,
        output: &Logger,
    ) -> Result<String> {
        let AuthChallenge::Bearer { realm, service, scope } = challenge else {
            return Err(RegistryError::Auth(
                "Token requested for a non-bearer challenge".to_string(),
            ));
        };

        let mut url = url::Url::parse(realm)
            .map_err(|e| RegistryError::Auth(format!("Invalid token realm '{}': {}", realm, e)))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(service) = service {
                query.append_pair("service", service);
            }
            query.append_pair("scope", scope.as_deref().unwrap_or(fallback_scope));
        }

        output.detail(&format!("Requesting token from: {}", url));

        let mut request = self.client.get(url);
        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "token request"))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(RegistryError::Auth(format!(
                "Token request failed with status {}: {}",
                status, error_text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(format!("Failed to parse token response: {}", e)))?;

        if let Some(expires_in) = token_response.expires_in {
            output.detail(&format!("Token expires in {} seconds", expires_in));
        }

        token_response
            .token
            .or(token_response.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RegistryError::Auth("Token response contained no token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_challenge_with_comma_in_scope() {
        let header = concat!(
            r#"Bearer realm="https://auth.docker.io/token","#,
            r#"service="registry.docker.io","#,
            r#"scope="repository:library/nginx:pull,push""#
        );
        assert_eq!(
            AuthChallenge::parse(header),
            Some(AuthChallenge::Bearer {
                realm: "https://auth.docker.io/token".to_string(),
                service: Some("registry.docker.io".to_string()),
                scope: Some("repository:library/nginx:pull,push".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_bearer_without_scope() {
        let header =
            r#"Bearer realm="https://r.example.com/service/token", service="harbor-registry""#;
        let challenge = AuthChallenge::parse(header).unwrap();
        assert_eq!(
            challenge,
            AuthChallenge::Bearer {
                realm: "https://r.example.com/service/token".to_string(),
                service: Some("harbor-registry".to_string()),
                scope: None,
            }
        );
    }

    #[test]
    fn test_parse_basic_and_unknown() {
        assert_eq!(
            AuthChallenge::parse(r#"Basic realm="Registry Realm""#),
            Some(AuthChallenge::Basic)
        );
        assert_eq!(AuthChallenge::parse("Negotiate"), None);
        assert_eq!(AuthChallenge::parse(r#"Bearer service="x""#), None);
    }
}
