use serde::Serialize;

use crate::domain::audience::Selector;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Ios,
    Android,
    Amazon,
    Wns,
    Web,
    Sms,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTypes {
    All,
    List(Vec<DeviceType>),
}

impl DeviceTypes {
    pub const FIELD: &'static str = "device_types";

    /// Restrict delivery to the given platforms. The list must not be empty.
    pub fn only(types: Vec<DeviceType>) -> Result<Self, ValidationError> {
        if types.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self::List(types))
    }
}

impl Serialize for DeviceTypes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::List(types) => types.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IosOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AndroidOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Notification payload: a cross-platform alert plus optional platform overrides.
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ios: Option<IosOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    android: Option<AndroidOverride>,
}

impl Notification {
    pub const ALERT_FIELD: &'static str = "alert";
    pub const FIELD: &'static str = "notification";

    /// Create a notification with a cross-platform alert.
    ///
    /// The text must be non-empty after trimming; the original text is kept.
    pub fn alert(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::ALERT_FIELD,
            });
        }
        Ok(Self {
            alert: Some(text),
            ..Default::default()
        })
    }

    pub fn with_ios(mut self, ios: IosOverride) -> Self {
        self.ios = Some(ios);
        self
    }

    pub fn with_android(mut self, android: AndroidOverride) -> Self {
        self.android = Some(android);
        self
    }

    fn is_empty(&self) -> bool {
        self.alert.is_none() && self.ios.is_none() && self.android.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A push request: who receives it, what they see, and on which platforms.
pub struct Push {
    audience: Selector,
    notification: Notification,
    device_types: DeviceTypes,
}

impl Push {
    pub fn new(
        audience: Selector,
        notification: Notification,
        device_types: DeviceTypes,
    ) -> Result<Self, ValidationError> {
        if notification.is_empty() {
            return Err(ValidationError::Empty {
                field: Notification::FIELD,
            });
        }
        Ok(Self {
            audience,
            notification,
            device_types,
        })
    }

    pub fn audience(&self) -> &Selector {
        &self.audience
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn device_types(&self) -> &DeviceTypes {
        &self.device_types
    }
}
