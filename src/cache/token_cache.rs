use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::token::Token;

/// Single-slot token cache. Holds at most one token; every `set` replaces it.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<Option<Token>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached token with a newer issuance
    pub async fn set(&self, token: Token) {
        *self.inner.write().await = Some(token);
    }

    /// Current token, fresh or not
    pub async fn get(&self) -> Option<Token> {
        self.inner.read().await.clone()
    }

    /// Token only if it is still fresh with respect to `buffer_seconds`
    pub async fn get_fresh(&self, now: u64, buffer_seconds: u64) -> Option<Token> {
        self.inner
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_fresh(now, buffer_seconds))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let cache = TokenCache::new();
        assert!(cache.get().await.is_none());
        assert!(cache.get_fresh(0, 0).await.is_none());
    }

    #[tokio::test]
    async fn newest_token_overwrites_previous() {
        let cache = TokenCache::new();
        cache.set(Token::new("first".into(), 100)).await;
        cache.set(Token::new("second".into(), 200)).await;

        assert_eq!(cache.get().await, Some(Token::new("second".into(), 200)));
    }

    #[tokio::test]
    async fn clones_share_the_same_slot() {
        let cache = TokenCache::new();
        let other = cache.clone();
        other.set(Token::new("shared".into(), 500)).await;

        assert_eq!(cache.get_fresh(100, 30).await.map(|t| t.value), Some("shared".to_string()));
        assert!(cache.get_fresh(470, 30).await.is_none());
    }
}
