#[cfg(test)]
mod test {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::cache::token::Token;
    use crate::cache::token_cache::TokenCache;
    use crate::error::AuthError;
    use crate::helpers::time::now_u64;
    use crate::sources::oauth2::TokenProvider;
    use crate::tests::common::{
        build_reqwest_client, provider_config, token_provider, BASIC_AUTH, TOKEN_PATH,
    };

    async fn mock_token_ok<'a>(server: &'a MockServer, token: &str, expires_in: u64) -> httpmock::Mock<'a> {
        let token = token.to_owned();
        server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path(TOKEN_PATH)
                    .header("authorization", BASIC_AUTH)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body("grant_type=client_credentials");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": token,
                        "token_type": "bearer",
                        "expires_in": expires_in
                    }));
            })
            .await
    }

    #[tokio::test]
    async fn cached_token_is_served_without_exchange() {
        let server = MockServer::start_async().await;
        let mock = mock_token_ok(&server, "fresh-from-provider", 3600).await;
        let provider = token_provider(&server, 30);
        provider
            .cache()
            .set(Token::new("cached".into(), now_u64() + 100))
            .await;

        let token = provider.acquire_token().await.unwrap();

        assert_eq!(token, "cached");
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn token_inside_expiry_buffer_is_refreshed() {
        let server = MockServer::start_async().await;
        let mock = mock_token_ok(&server, "renewed", 3600).await;
        let provider = token_provider(&server, 30);
        provider
            .cache()
            .set(Token::new("about-to-expire".into(), now_u64() + 30))
            .await;

        let token = provider.acquire_token().await.unwrap();

        assert_eq!(token, "renewed");
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn successful_exchange_updates_cache() {
        let server = MockServer::start_async().await;
        let mock = mock_token_ok(&server, "abc", 3600).await;
        let provider = token_provider(&server, 30);

        let before = now_u64();
        let token = provider.acquire_token().await.unwrap();
        let after = now_u64();

        assert_eq!(token, "abc");
        let cached = provider.cache().get().await.expect("token cached");
        assert_eq!(cached.value, "abc");
        assert!(cached.exp_unix_ts >= before + 3600);
        assert!(cached.exp_unix_ts <= after + 3600);

        // second call is a cache hit
        assert_eq!(provider.acquire_token().await.unwrap(), "abc");
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn failed_exchange_keeps_valid_cached_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(503).body("maintenance");
            })
            .await;
        let provider = token_provider(&server, 30);
        let valid = Token::new("still-valid".into(), now_u64() + 600);
        provider.cache().set(valid.clone()).await;

        // an exchange that fails on its own never evicts the cached token
        let err = provider.exchange().await.unwrap_err();
        assert_eq!(err.status(), Some(503));

        assert_eq!(provider.acquire_token().await.unwrap(), "still-valid");
        assert_eq!(provider.cache().get().await, Some(valid));
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn non_success_status_is_auth_error_and_nothing_is_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(401)
                    .header("Content-Type", "application/json")
                    .body(r#"{"error":"invalid_client"}"#);
            })
            .await;
        let provider = token_provider(&server, 30);

        let err = provider.acquire_token().await.unwrap_err();

        assert_eq!(
            err,
            AuthError::Status {
                status: 401,
                body: r#"{"error":"invalid_client"}"#.to_string()
            }
        );
        assert_eq!(err.body(), Some(r#"{"error":"invalid_client"}"#));
        assert!(provider.cache().get().await.is_none());
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn stale_token_is_untouched_when_refresh_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(500).body("boom");
            })
            .await;
        let provider = token_provider(&server, 30);
        let stale = Token::new("stale".into(), now_u64() + 5);
        provider.cache().set(stale.clone()).await;

        let err = provider.acquire_token().await.unwrap_err();

        assert!(matches!(err, AuthError::Status { status: 500, .. }));
        assert_eq!(provider.cache().get().await, Some(stale));
    }

    #[tokio::test]
    async fn malformed_response_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "token_type": "bearer" }));
            })
            .await;
        let provider = token_provider(&server, 30);

        let err = provider.acquire_token().await.unwrap_err();

        assert!(matches!(err, AuthError::MalformedResponse(_)), "{:?}", err);
        assert!(provider.cache().get().await.is_none());
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({ "access_token": "late", "expires_in": 3600 }));
            })
            .await;
        let provider = token_provider(&server, 30).with_timeout(Duration::from_millis(300));

        let err = provider.acquire_token().await.unwrap_err();

        assert!(matches!(err, AuthError::Transport(_)), "{:?}", err);
        assert!(provider.cache().get().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_exchange() {
        let server = MockServer::start_async().await;
        let mock = mock_token_ok(&server, "shared", 3600).await;
        let provider = token_provider(&server, 30);

        let (a, b, c, d) = tokio::join!(
            provider.acquire_token(),
            provider.acquire_token(),
            provider.acquire_token(),
            provider.acquire_token(),
        );

        for token in [a, b, c, d] {
            assert_eq!(token.unwrap(), "shared");
        }
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn abandoned_caller_does_not_cancel_refresh() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .delay(Duration::from_millis(300))
                    .json_body(json!({ "access_token": "completed", "expires_in": 3600 }));
            })
            .await;
        let provider = token_provider(&server, 30);

        // caller gives up before the provider answers
        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), provider.acquire_token()).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(800)).await;
        let cached = provider.cache().get().await.expect("refresh completed");
        assert_eq!(cached.value, "completed");

        assert_eq!(provider.acquire_token().await.unwrap(), "completed");
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn lifetime_within_buffer_is_rejected_and_not_cached() {
        let server = MockServer::start_async().await;
        let mock = mock_token_ok(&server, "short-lived", 10).await;
        let provider = token_provider(&server, 30);
        assert_eq!(provider.buffer_seconds(), 30);

        let err = provider.acquire_token().await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)), "{:?}", err);
        assert!(provider.cache().get().await.is_none());

        // nothing usable was cached, so the next caller exchanges again
        assert!(provider.acquire_token().await.is_err());
        mock.assert_calls_async(2).await;
    }

    #[tokio::test]
    async fn lifetime_equal_to_buffer_is_rejected() {
        let server = MockServer::start_async().await;
        mock_token_ok(&server, "exactly-buffer", 30).await;
        let provider = token_provider(&server, 30);

        let err = provider.exchange().await.unwrap_err();

        assert!(matches!(err, AuthError::MalformedResponse(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn short_lifetime_keeps_previous_cached_token() {
        let server = MockServer::start_async().await;
        mock_token_ok(&server, "short-lived", 10).await;
        let provider = token_provider(&server, 30);
        let stale = Token::new("stale".into(), now_u64() + 20);
        provider.cache().set(stale.clone()).await;

        let err = provider.acquire_token().await.unwrap_err();

        assert!(matches!(err, AuthError::MalformedResponse(_)), "{:?}", err);
        assert_eq!(provider.cache().get().await, Some(stale));
    }

    #[tokio::test]
    async fn providers_sharing_a_cache_reuse_its_token() {
        let server = MockServer::start_async().await;
        let mock = mock_token_ok(&server, "shared-slot", 3600).await;
        let config = provider_config(&server, &server, 30);
        let cache = TokenCache::new();
        let first = TokenProvider::with_cache(build_reqwest_client(), &config, cache.clone());
        let second = TokenProvider::with_cache(build_reqwest_client(), &config, cache.clone());

        assert_eq!(first.acquire_token().await.unwrap(), "shared-slot");
        assert_eq!(second.acquire_token().await.unwrap(), "shared-slot");

        assert_eq!(cache.get().await.map(|token| token.value), Some("shared-slot".to_string()));
        mock.assert_calls_async(1).await;
    }
}
