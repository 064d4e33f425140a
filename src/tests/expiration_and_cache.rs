#[cfg(test)]
mod test {

    use std::time::Duration;

    use crate::cache::error::TokenError;
    use crate::cache::token_cache::{CacheSettings, TokenCache};
    use crate::helpers::time::ManualClock;
    use crate::cache::token::Credentials;
    use crate::tests::common::{credentials, issued, scripted_cache, ScriptedIssuer};

    #[tokio::test]
    async fn calls_within_validity_window_do_not_exchange_again() {
        let issuer = ScriptedIssuer::new(vec![issued("tok-A", 300)]);
        let clock = ManualClock::new(0);
        let cache = scripted_cache(&issuer, &clock, 60);

        for t in [0, 1, 100, 200, 239] {
            clock.set(t);
            assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        }
        assert_eq!(issuer.calls(), 1);
    }

    #[tokio::test]
    async fn token_expires_at_lifetime_minus_margin() {
        let issuer = ScriptedIssuer::new(vec![issued("tok-A", 120), issued("tok-B", 120)]);
        let clock = ManualClock::new(0);
        let cache = scripted_cache(&issuer, &clock, 60);

        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        clock.set(59);
        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        assert_eq!(issuer.calls(), 1);

        clock.set(60);
        assert_eq!(cache.get_token().await.unwrap().value, "tok-B");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn lifetime_within_margin_is_a_miss_on_the_next_call() {
        let issuer = ScriptedIssuer::new(vec![issued("tok-A", 60), issued("tok-B", 10), issued("tok-C", 300)]);
        let clock = ManualClock::new(1_000);
        let cache = scripted_cache(&issuer, &clock, 60);

        // the fetching call still gets its token once
        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        assert_eq!(cache.get_token().await.unwrap().value, "tok-B");
        assert_eq!(cache.get_token().await.unwrap().value, "tok-C");
        assert_eq!(cache.get_token().await.unwrap().value, "tok-C");
        assert_eq!(issuer.calls(), 3);
    }

    #[tokio::test]
    async fn malformed_response_is_not_cached_and_next_call_retries() {
        let issuer = ScriptedIssuer::new(vec![
            Err(TokenError::IssuerMalformedResponse { reason: "missing string field 'access_token'".into() }),
            issued("tok-A", 300),
        ]);
        let clock = ManualClock::new(0);
        let cache = scripted_cache(&issuer, &clock, 60);

        let err = cache.get_token().await.unwrap_err();
        assert!(matches!(err, TokenError::IssuerMalformedResponse { .. }));
        assert!(cache.peek().await.is_none());

        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_expired_token_and_fails_loudly() {
        let issuer = ScriptedIssuer::new(vec![
            issued("tok-A", 300),
            Err(TokenError::IssuerRejected { status: 503, body: "down".into() }),
            issued("tok-B", 300),
        ]);
        let clock = ManualClock::new(0);
        let cache = scripted_cache(&issuer, &clock, 60);

        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        clock.set(241);
        let err = cache.get_token().await.unwrap_err();
        assert!(matches!(err, TokenError::IssuerRejected { status: 503, .. }));
        // no stale fallback, and the old entry is left as it was
        assert_eq!(cache.peek().await.unwrap().value, "tok-A");

        assert_eq!(cache.get_token().await.unwrap().value, "tok-B");
        assert_eq!(issuer.calls(), 3);
    }

    #[tokio::test]
    async fn refresh_after_margin_returns_new_token() {
        let issuer = ScriptedIssuer::new(vec![issued("tok-A", 300), issued("tok-B", 300)]);
        let clock = ManualClock::new(0);
        let cache = scripted_cache(&issuer, &clock, 60);

        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        clock.set(239);
        assert_eq!(cache.get_token().await.unwrap().value, "tok-A");
        clock.set(241);
        assert_eq!(cache.get_token().await.unwrap().value, "tok-B");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn slow_issuer_times_out_as_unavailable() {
        let issuer = ScriptedIssuer::new(vec![issued("tok-A", 300)]).with_delay(Duration::from_millis(500));
        let settings = CacheSettings { safety_margin_seconds: 60, exchange_timeout: Duration::from_millis(50) };
        let cache = TokenCache::new(issuer.clone(), ManualClock::new(0), credentials(), settings).unwrap();

        let err = cache.get_token().await.unwrap_err();
        assert!(matches!(err, TokenError::IssuerUnavailable { .. }), "{err:?}");
        assert!(cache.peek().await.is_none());
    }

    #[tokio::test]
    async fn invalidate_only_drops_the_matching_token() {
        let issuer = ScriptedIssuer::new(vec![issued("tok-A", 300), issued("tok-B", 300)]);
        let clock = ManualClock::new(0);
        let cache = scripted_cache(&issuer, &clock, 60);

        cache.get_token().await.unwrap();
        assert!(!cache.invalidate_if("tok-other").await);
        assert!(cache.invalidate_if("tok-A").await);
        assert_eq!(cache.get_token().await.unwrap().value, "tok-B");
        assert_eq!(issuer.calls(), 2);
    }

    #[test]
    fn missing_credentials_are_a_configuration_error() {
        let issuer = ScriptedIssuer::default();
        for creds in [Credentials::new("", "secret1"), Credentials::new("id1", "  ")] {
            let err = TokenCache::new(issuer.clone(), ManualClock::new(0), creds, CacheSettings::default()).unwrap_err();
            assert!(matches!(err, TokenError::Configuration(_)));
        }
    }
}
