//! Tests for `Strategy` selection and `DeliveryResult` extraction.

use serde_json::json;
use url::Url;

use super::testing::{MockClient, RecordingSleeper, response};
use super::{Delivery, DeliveryResult, RetryPolicy, Strategy, WebhookDelivery};
use crate::config::{Auth, PayloadInputs, Retries, SecretString, ValidatedConfig, WebhookKind};
use crate::runner::testing::RecordingRunner;

fn config(auth: Auth, retries: Retries, proxy: Option<&str>) -> ValidatedConfig {
    ValidatedConfig {
        auth,
        payload: PayloadInputs::default(),
        retries,
        proxy: proxy.map(ToString::to_string),
        fail_on_error: true,
        verbose: false,
    }
}

fn token_auth() -> Auth {
    Auth::Token {
        token: SecretString::new("xoxb-token".to_string()),
        method: "chat.postMessage".to_string(),
        api: Url::parse("https://slack.com/api/").unwrap(),
    }
}

fn webhook_auth() -> Auth {
    Auth::Webhook {
        url: SecretString::new("https://hooks.slack.com/services/T/B/X".to_string()),
        kind: WebhookKind::IncomingWebhook,
    }
}

mod from_config {
    use super::*;

    #[test]
    fn token_auth_selects_token_mode_with_api_curve() {
        let runner = RecordingRunner::new();
        let strategy =
            Strategy::from_config(&config(token_auth(), Retries::Ten, None), &runner).unwrap();

        let Strategy::Token(delivery) = &strategy else {
            panic!("expected token mode");
        };
        assert_eq!(delivery.method(), "chat.postMessage");
        assert_eq!(strategy.retry_policy(), &RetryPolicy::api(Retries::Ten));
        assert!(runner.warnings().is_empty());
    }

    #[test]
    fn webhook_auth_selects_webhook_mode_with_webhook_curve() {
        let runner = RecordingRunner::new();
        let strategy =
            Strategy::from_config(&config(webhook_auth(), Retries::Rapid, None), &runner).unwrap();

        assert!(matches!(strategy, Strategy::Webhook(_)));
        assert_eq!(strategy.retry_policy(), &RetryPolicy::webhook(Retries::Rapid));
    }

    #[test]
    fn http_proxy_for_https_webhook_is_applied_quietly() {
        let runner = RecordingRunner::new();
        let result = Strategy::from_config(
            &config(webhook_auth(), Retries::Zero, Some("http://proxy.internal:3128")),
            &runner,
        );

        assert!(result.is_ok());
        assert!(runner.warnings().is_empty());
    }

    #[test]
    fn unusable_proxy_warns_and_falls_back() {
        let runner = RecordingRunner::new();
        let result = Strategy::from_config(
            &config(webhook_auth(), Retries::Zero, Some("::not a proxy::")),
            &runner,
        );

        assert!(result.is_ok());
        let warnings = runner.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with(
            "Failed to configure the HTTPS proxy agent so using default configurations"
        ));
    }

    #[test]
    fn unusable_proxy_in_token_mode_also_falls_back() {
        let runner = RecordingRunner::new();
        let result =
            Strategy::from_config(&config(token_auth(), Retries::Zero, Some("nope")), &runner);

        assert!(result.is_ok());
        assert_eq!(runner.warnings().len(), 1);
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn strategy_forwards_to_chosen_mode() {
        let client = MockClient::new(vec![response(200, "ok")]);
        let strategy = Strategy::Webhook(
            WebhookDelivery::new(client.clone(), "https://hooks.slack.com/services/T/B/X")
                .unwrap(),
        )
        .with_sleeper(RecordingSleeper::default());

        let result = strategy.post(&json!({"text": "hi"})).await.unwrap();

        assert_eq!(result.response, json!("ok"));
        assert_eq!(client.calls(), 1);
    }
}

mod results {
    use super::*;

    #[test]
    fn api_response_with_string_channel() {
        let result = DeliveryResult::from_api_response(json!({
            "ok": true, "channel": "C1", "ts": "1.1"
        }));

        assert_eq!(result.channel_id.as_deref(), Some("C1"));
        assert_eq!(result.ts.as_deref(), Some("1.1"));
        assert_eq!(result.thread_ts, None);
    }

    #[test]
    fn api_response_with_channel_object() {
        let result = DeliveryResult::from_api_response(json!({
            "ok": true, "channel": {"id": "C2", "is_channel": true}
        }));

        assert_eq!(result.channel_id.as_deref(), Some("C2"));
    }

    #[test]
    fn api_response_without_ids() {
        let result = DeliveryResult::from_api_response(json!({"ok": true, "channel": null}));

        assert!(result.ok);
        assert_eq!(result.channel_id, None);
        assert_eq!(result.thread_ts, None);
        assert_eq!(result.ts, None);
    }

    #[test]
    fn thread_ts_comes_from_message() {
        let result = DeliveryResult::from_api_response(json!({
            "ok": true, "thread_ts": "ignored", "message": {"thread_ts": "9.9"}
        }));

        assert_eq!(result.thread_ts.as_deref(), Some("9.9"));
    }

    #[test]
    fn webhook_response_has_no_ids() {
        let result = DeliveryResult::from_webhook_response(json!("ok"));

        assert!(result.ok);
        assert_eq!(result.response, json!("ok"));
        assert_eq!(result.channel_id, None);
    }
}
