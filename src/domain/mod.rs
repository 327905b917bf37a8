//! Domain layer: strong types with validation and invariants (no I/O).

pub mod attribute;
pub mod audience;
mod request;
mod response;
mod validation;
mod value;

pub use attribute::{AttributeSelector, AttributeValue, Operator};
pub use audience::{LeafKey, Selector};
pub use request::{AndroidOverride, DeviceType, DeviceTypes, IosOverride, Notification, Push};
pub use response::{ApiFailure, PushResponse};
pub use validation::ValidationError;
pub use value::{AppKey, BearerToken, MasterSecret};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::audience::{all, and, ios_channel, not, tag};
    use super::*;

    #[test]
    fn app_key_rejects_empty() {
        assert!(matches!(
            AppKey::new("   "),
            Err(ValidationError::Empty {
                field: AppKey::FIELD
            })
        ));
    }

    #[test]
    fn master_secret_rejects_empty_and_hides_value() {
        assert!(matches!(
            MasterSecret::new(""),
            Err(ValidationError::Empty {
                field: MasterSecret::FIELD
            })
        ));
        let secret = MasterSecret::new("s3cret").unwrap();
        assert!(!format!("{secret:?}").contains("s3cret"));
    }

    #[test]
    fn bearer_token_is_trimmed() {
        let token = BearerToken::new(" abc ").unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[test]
    fn notification_alert_rejects_blank_text() {
        assert!(matches!(
            Notification::alert(" "),
            Err(ValidationError::Empty { field: "alert" })
        ));
    }

    #[test]
    fn push_requires_some_notification_content() {
        let err = Push::new(all(), Notification::default(), DeviceTypes::All).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "notification"
            }
        );

        let ios_only = Notification::default().with_ios(IosOverride {
            badge: Some(1),
            ..Default::default()
        });
        assert!(Push::new(all(), ios_only, DeviceTypes::All).is_ok());
    }

    #[test]
    fn device_types_list_must_not_be_empty() {
        assert!(matches!(
            DeviceTypes::only(Vec::new()),
            Err(ValidationError::Empty {
                field: DeviceTypes::FIELD
            })
        ));
        let types = DeviceTypes::only(vec![DeviceType::Ios, DeviceType::Android]).unwrap();
        assert_eq!(serde_json::to_value(&types).unwrap(), json!(["ios", "android"]));
        assert_eq!(serde_json::to_value(DeviceTypes::All).unwrap(), json!("all"));
    }

    #[test]
    fn push_keeps_audience_as_built() {
        let audience = and([
            ios_channel("074E84A2-9ED9-4EEE-9CA4-CC597BFDBEF3").unwrap(),
            not(tag("muted")),
        ]);
        let push = Push::new(
            audience.clone(),
            Notification::alert("hi").unwrap(),
            DeviceTypes::All,
        )
        .unwrap();
        assert_eq!(push.audience(), &audience);
        assert_eq!(
            push.audience().to_json(),
            json!({
                "and": [
                    { "ios_channel": "074e84a2-9ed9-4eee-9ca4-cc597bfdbef3" },
                    { "not": { "tag": "muted" } }
                ]
            })
        );
    }
}
