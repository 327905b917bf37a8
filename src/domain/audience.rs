//! Audience selectors: leaf builders and boolean combinators.

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::domain::attribute::AttributeSelector;
use crate::domain::validation::ValidationError;

static UUID_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID pattern is valid")
});
static DEVICE_TOKEN_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{64}$").expect("device token pattern is valid"));
static NUMERIC_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("numeric pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Field name of a single-key leaf selector.
pub enum LeafKey {
    IosChannel,
    AndroidChannel,
    AmazonChannel,
    Apid,
    Channel,
    OpenChannel,
    Wns,
    DeviceToken,
    Tag,
    Alias,
    Segment,
    NamedUser,
    SubscriptionList,
    StaticList,
    SmsSender,
}

impl LeafKey {
    /// JSON key used by the API for this selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IosChannel => "ios_channel",
            Self::AndroidChannel => "android_channel",
            Self::AmazonChannel => "amazon_channel",
            Self::Apid => "apid",
            Self::Channel => "channel",
            Self::OpenChannel => "open_channel",
            Self::Wns => "wns",
            Self::DeviceToken => "device_token",
            Self::Tag => "tag",
            Self::Alias => "alias",
            Self::Segment => "segment",
            Self::NamedUser => "named_user",
            Self::SubscriptionList => "subscription_lists",
            Self::StaticList => "static_list",
            Self::SmsSender => "sms_sender",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An audience selector tree.
///
/// Selectors can only be built by the functions in this module (and the
/// attribute builders), so every leaf value has passed its format check and
/// normalization. They serialize to the JSON shape expected in the `audience`
/// field of a push request.
///
/// ```compile_fail
/// use airship::audience::Selector;
///
/// let unchecked = Selector(Default::default());
/// ```
pub struct Selector(Node);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    All,
    Leaf { key: LeafKey, value: String },
    TagGroup { group: String, tag: String },
    SmsId { msisdn: String, sender: String },
    Attribute(AttributeSelector),
    And(Vec<Selector>),
    Or(Vec<Selector>),
    Not(Box<Selector>),
}

impl Selector {
    /// Convert into a plain JSON tree.
    pub fn to_json(&self) -> Value {
        match &self.0 {
            Node::All => Value::from("all"),
            Node::Leaf { key, value } => {
                let mut map = Map::new();
                map.insert(key.as_str().to_owned(), Value::from(value.as_str()));
                Value::Object(map)
            }
            Node::TagGroup { group, tag } => json!({ "group": group, "tag": tag }),
            Node::SmsId { msisdn, sender } => {
                json!({ "sms_id": { "sender": sender, "msisdn": msisdn } })
            }
            Node::Attribute(attribute) => attribute.to_json(),
            Node::And(children) => json!({ "and": children_json(children) }),
            Node::Or(children) => json!({ "or": children_json(children) }),
            Node::Not(child) => json!({ "not": child.to_json() }),
        }
    }

    /// Key and normalized value of a single-key leaf selector.
    pub fn leaf(&self) -> Option<(LeafKey, &str)> {
        match &self.0 {
            Node::Leaf { key, value } => Some((*key, value.as_str())),
            _ => None,
        }
    }

    /// Children of an `and`/`or` selector, or the single child of `not`.
    pub fn children(&self) -> &[Selector] {
        match &self.0 {
            Node::And(children) | Node::Or(children) => children,
            Node::Not(child) => std::slice::from_ref(child.as_ref()),
            _ => &[],
        }
    }

    fn leaf_of(key: LeafKey, value: String) -> Self {
        Self(Node::Leaf { key, value })
    }
}

fn children_json(children: &[Selector]) -> Vec<Value> {
    children.iter().map(Selector::to_json).collect()
}

impl From<AttributeSelector> for Selector {
    fn from(value: AttributeSelector) -> Self {
        Self(Node::Attribute(value))
    }
}

impl Serialize for Selector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

fn uuid_leaf(key: LeafKey, uuid: &str) -> Result<Selector, ValidationError> {
    let trimmed = uuid.trim();
    if !UUID_FORMAT.is_match(trimmed) {
        return Err(ValidationError::InvalidIdentifier {
            field: key.as_str(),
            expected: "a UUID",
            input: uuid.to_owned(),
        });
    }
    Ok(Selector::leaf_of(key, trimmed.to_lowercase()))
}

fn numeric(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if NUMERIC_FORMAT.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            field,
            expected: "numeric",
            input: value.to_owned(),
        })
    }
}

/// Select every device (broadcast).
pub fn all() -> Selector {
    Selector(Node::All)
}

/// Select a single iOS channel.
pub fn ios_channel(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::IosChannel, uuid)
}

/// Select a single Android channel.
pub fn android_channel(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::AndroidChannel, uuid)
}

/// Select a single Amazon channel.
pub fn amazon_channel(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::AmazonChannel, uuid)
}

/// Select a single Android APID.
pub fn apid(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::Apid, uuid)
}

/// Select a single channel of any device type.
pub fn channel(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::Channel, uuid)
}

/// Select a single open channel.
pub fn open_channel(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::OpenChannel, uuid)
}

/// Select a single Windows channel.
pub fn wns(uuid: &str) -> Result<Selector, ValidationError> {
    uuid_leaf(LeafKey::Wns, uuid)
}

/// Select a single iOS device token.
///
/// Tokens are stored upper-cased by the service, unlike channel UUIDs.
pub fn device_token(token: &str) -> Result<Selector, ValidationError> {
    let trimmed = token.trim();
    if !DEVICE_TOKEN_FORMAT.is_match(trimmed) {
        return Err(ValidationError::InvalidIdentifier {
            field: LeafKey::DeviceToken.as_str(),
            expected: "64 hexadecimal characters",
            input: token.to_owned(),
        });
    }
    Ok(Selector::leaf_of(LeafKey::DeviceToken, trimmed.to_uppercase()))
}

/// Select an SMS sender. The value must consist of digits only.
pub fn sms_sender(sender: impl Into<String>) -> Result<Selector, ValidationError> {
    let sender = sender.into();
    numeric(LeafKey::SmsSender.as_str(), &sender)?;
    Ok(Selector::leaf_of(LeafKey::SmsSender, sender))
}

/// Select an SMS recipient (MSISDN) for a given sender.
pub fn sms_id(
    msisdn: impl Into<String>,
    sender: impl Into<String>,
) -> Result<Selector, ValidationError> {
    let msisdn = msisdn.into();
    let sender = sender.into();
    numeric("msisdn", &msisdn)?;
    numeric("sender", &sender)?;
    Ok(Selector(Node::SmsId { msisdn, sender }))
}

pub fn tag(value: impl Into<String>) -> Selector {
    Selector::leaf_of(LeafKey::Tag, value.into())
}

/// Select a tag within a tag group.
pub fn tag_group(group: impl Into<String>, tag: impl Into<String>) -> Selector {
    Selector(Node::TagGroup {
        group: group.into(),
        tag: tag.into(),
    })
}

pub fn alias(value: impl Into<String>) -> Selector {
    Selector::leaf_of(LeafKey::Alias, value.into())
}

pub fn segment(value: impl Into<String>) -> Selector {
    Selector::leaf_of(LeafKey::Segment, value.into())
}

pub fn named_user(value: impl Into<String>) -> Selector {
    Selector::leaf_of(LeafKey::NamedUser, value.into())
}

/// Select a subscription list (`subscription_lists` on the wire).
pub fn subscription_list(list_id: impl Into<String>) -> Selector {
    Selector::leaf_of(LeafKey::SubscriptionList, list_id.into())
}

pub fn static_list(list_id: impl Into<String>) -> Selector {
    Selector::leaf_of(LeafKey::StaticList, list_id.into())
}

/// Select devices matching every child. Nesting is kept as given.
pub fn and(children: impl IntoIterator<Item = Selector>) -> Selector {
    Selector(Node::And(children.into_iter().collect()))
}

/// Select devices matching at least one child.
pub fn or(children: impl IntoIterator<Item = Selector>) -> Selector {
    Selector(Node::Or(children.into_iter().collect()))
}

/// Select devices not matching `child`.
pub fn not(child: Selector) -> Selector {
    Selector(Node::Not(Box::new(child)))
}
