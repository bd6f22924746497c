// latchbot-server/src/secrets.rs

use async_trait::async_trait;
use latchbot_common::traits::transport_traits::SecretsProvider;
use latchbot_core::Error;

pub const BOT_USERNAME_KEY: &str = "BOT_USERNAME";
pub const BOT_OAUTH_KEY: &str = "BOT_OAUTH";

/// Reads secrets from the process environment (after `.env` has been loaded).
pub struct EnvSecretsProvider;

#[async_trait]
impl SecretsProvider for EnvSecretsProvider {
    async fn get_secret(&self, name: &str) -> Result<String, Error> {
        match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(Error::Secret(format!("{} is not set", name))),
        }
    }
}

/// Chat tokens are expected with an `oauth:` prefix; bare tokens get one.
pub fn normalize_oauth_token(token: &str) -> String {
    let token = token.trim();
    if token.starts_with("oauth:") {
        token.to_string()
    } else {
        format!("oauth:{}", token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_oauth_token() {
        assert_eq!(normalize_oauth_token("abc123"), "oauth:abc123");
        assert_eq!(normalize_oauth_token(" oauth:abc123 "), "oauth:abc123");
    }

    #[tokio::test]
    async fn test_missing_secret_is_an_error() {
        let provider = EnvSecretsProvider;
        let result = provider.get_secret("LATCHBOT_TEST_SURELY_UNSET_VARIABLE").await;
        assert!(matches!(result, Err(Error::Secret(_))));
    }
}
