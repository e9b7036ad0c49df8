//! Tests for `ContentResolver`.

use std::path::PathBuf;

use serde_json::json;

use super::{ContentError, ContentResolver};
use crate::config::PayloadInputs;
use crate::runner::{Environment, TriggerContext};

fn env() -> Environment {
    [("JOB_STATUS", "success"), ("GITHUB_SHA", "abc123")]
        .into_iter()
        .collect()
}

fn trigger() -> TriggerContext {
    let mut context = TriggerContext::with_payload(json!({
        "head_commit": {"message": "Fix flaky test", "id": "abc123"},
        "forced": false,
    }));
    context.event_name = "push".to_string();
    context
}

fn inline(text: &str) -> PayloadInputs {
    PayloadInputs {
        inline: Some(text.to_string()),
        ..PayloadInputs::default()
    }
}

mod sources {
    use super::*;

    #[tokio::test]
    async fn no_source_uses_trigger_payload_verbatim() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver.resolve(&PayloadInputs::default()).await.unwrap();

        assert_eq!(content, context.payload);
    }

    #[tokio::test]
    async fn inline_source() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver
            .resolve(&inline(r#""text": "hi", "channel": "C0123""#))
            .await
            .unwrap();

        assert_eq!(content, json!({"text": "hi", "channel": "C0123"}));
    }

    #[tokio::test]
    async fn file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.yml");
        std::fs::write(&path, "text: from a file\n").unwrap();
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver
            .resolve(&PayloadInputs {
                file_path: Some(path),
                ..PayloadInputs::default()
            })
            .await
            .unwrap();

        assert_eq!(content, json!({"text": "from a file"}));
    }

    #[tokio::test]
    async fn both_sources_fail() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let err = resolver
            .resolve(&PayloadInputs {
                inline: Some("{}".to_string()),
                file_path: Some(PathBuf::from("payload.json")),
                ..PayloadInputs::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::AmbiguousSource));
        assert_eq!(
            err.to_string(),
            "Invalid input! Just the payload or payload file path is required."
        );
    }
}

mod post_processing {
    use super::*;

    #[tokio::test]
    async fn templating_sees_env_and_github() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver
            .resolve(&PayloadInputs {
                templated: true,
                ..inline(
                    r#"{"text": "${{ env.JOB_STATUS }}: ${{ github.payload.head_commit.message }} (${{ github.eventName }})"}"#,
                )
            })
            .await
            .unwrap();

        assert_eq!(
            content,
            json!({"text": "success: Fix flaky test (push)"})
        );
    }

    #[tokio::test]
    async fn expressions_are_kept_without_templating() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver
            .resolve(&inline(r#"{"text": "${{ env.JOB_STATUS }}"}"#))
            .await
            .unwrap();

        assert_eq!(content, json!({"text": "${{ env.JOB_STATUS }}"}));
    }

    #[tokio::test]
    async fn flattening_after_templating() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver
            .resolve(&PayloadInputs {
                templated: true,
                delimiter: Some("_".to_string()),
                ..inline(r#"{"build": {"sha": "${{ env.GITHUB_SHA }}", "passed": true}}"#)
            })
            .await
            .unwrap();

        assert_eq!(
            content,
            json!({"build_sha": "abc123", "build_passed": "true"})
        );
    }

    #[tokio::test]
    async fn trigger_payload_can_be_flattened() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let content = resolver
            .resolve(&PayloadInputs {
                delimiter: Some(".".to_string()),
                ..PayloadInputs::default()
            })
            .await
            .unwrap();

        assert_eq!(
            content,
            json!({
                "head_commit.message": "Fix flaky test",
                "head_commit.id": "abc123",
                "forced": "false",
            })
        );
    }

    #[test]
    fn template_context_shape() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env);

        let data = resolver.template_context();

        assert_eq!(data["env"]["JOB_STATUS"], "success");
        assert_eq!(data["github"]["eventName"], "push");
        assert_eq!(data["github"]["payload"]["forced"], false);
    }
}

mod custom_templater {
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;
    use crate::content::Templater;

    /// Uppercases every template and keeps each context it was given.
    #[derive(Debug, Default)]
    struct Shouting {
        contexts: Mutex<Vec<Value>>,
    }

    impl Templater for Shouting {
        fn render(
            &self,
            template: &str,
            context: &Value,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            self.contexts.lock().unwrap().push(context.clone());
            Ok(template.to_uppercase())
        }
    }

    #[tokio::test]
    async fn injected_templater_renders_string_leaves() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env).with_templater(Shouting::default());
        let inputs = PayloadInputs {
            templated: true,
            ..inline(r#"{"text": "status ${{ env.JOB_STATUS }}", "count": 3, "draft": false, "thread": null}"#)
        };

        let content = resolver.resolve(&inputs).await.unwrap();

        assert_eq!(
            content,
            json!({"text": "STATUS {{ ENV.JOB_STATUS }}", "count": 3, "draft": false, "thread": null})
        );
    }

    #[tokio::test]
    async fn injected_templater_receives_env_and_github() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env).with_templater(Shouting::default());
        let inputs = PayloadInputs {
            templated: true,
            ..inline(r#"{"text": "hi"}"#)
        };

        resolver.resolve(&inputs).await.unwrap();

        let contexts = resolver.templater.contexts.lock().unwrap();
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0]["env"]["JOB_STATUS"], "success");
        assert_eq!(contexts[0]["github"]["eventName"], "push");
    }

    #[tokio::test]
    async fn injected_templater_is_skipped_when_templating_is_off() {
        let (env, context) = (env(), trigger());
        let resolver = ContentResolver::new(&context, &env).with_templater(Shouting::default());

        let content = resolver.resolve(&inline(r#"{"text": "hi"}"#)).await.unwrap();

        assert_eq!(content, json!({"text": "hi"}));
        assert!(resolver.templater.contexts.lock().unwrap().is_empty());
    }
}
