//! Attribute selectors: conditions over a named device or user attribute.
//!
//! Each attribute type has a rule table mapping the operators it accepts to
//! the companion fields those operators require.

use std::str::FromStr;

use crate::domain::audience::Selector;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    IsEmpty,
    Before,
    After,
    Range,
    Equals,
    Contains,
    Less,
    Greater,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsEmpty => "is_empty",
            Self::Before => "before",
            Self::After => "after",
            Self::Range => "range",
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::Less => "less",
            Self::Greater => "greater",
        }
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "is_empty" => Self::IsEmpty,
            "before" => Self::Before,
            "after" => Self::After,
            "range" => Self::Range,
            "equals" => Self::Equals,
            "contains" => Self::Contains,
            "less" => Self::Less,
            "greater" => Self::Greater,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Nothing,
    Value,
    ValueAndPrecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Any,
    Text,
    Number,
}

struct AttributeRules {
    name: &'static str,
    operators: &'static [&'static str],
    rules: &'static [(Operator, Requirement)],
    value_kind: ValueKind,
}

const DATE: AttributeRules = AttributeRules {
    name: "date",
    operators: &["is_empty", "before", "after", "range", "equals"],
    rules: &[
        (Operator::IsEmpty, Requirement::Nothing),
        (Operator::Before, Requirement::ValueAndPrecision),
        (Operator::After, Requirement::ValueAndPrecision),
        (Operator::Range, Requirement::Value),
        (Operator::Equals, Requirement::ValueAndPrecision),
    ],
    value_kind: ValueKind::Any,
};

// `is_empty` still takes a typed value for text and number attributes.
const TEXT: AttributeRules = AttributeRules {
    name: "text",
    operators: &["equals", "contains", "less", "greater", "is_empty"],
    rules: &[
        (Operator::Equals, Requirement::Value),
        (Operator::Contains, Requirement::Value),
        (Operator::Less, Requirement::Value),
        (Operator::Greater, Requirement::Value),
        (Operator::IsEmpty, Requirement::Value),
    ],
    value_kind: ValueKind::Text,
};

const NUMBER: AttributeRules = AttributeRules {
    value_kind: ValueKind::Number,
    name: "number",
    ..TEXT
};

impl AttributeRules {
    fn parse(&self, operator: &str) -> Result<(Operator, Requirement), ValidationError> {
        let invalid = || ValidationError::InvalidOperator {
            attribute_type: self.name,
            operator: operator.to_owned(),
            allowed: self.operators,
        };
        let parsed = operator.parse::<Operator>().map_err(|()| invalid())?;
        self.rules
            .iter()
            .copied()
            .find(|(op, _)| *op == parsed)
            .ok_or_else(invalid)
    }

    fn check_value(&self, value: &AttributeValue) -> Result<(), ValidationError> {
        match (self.value_kind, value) {
            (ValueKind::Any, _)
            | (ValueKind::Text, AttributeValue::Text(_))
            | (ValueKind::Number, AttributeValue::Number(_)) => Ok(()),
            (ValueKind::Text, _) => Err(ValidationError::InvalidValueType {
                expected: "a string",
            }),
            (ValueKind::Number, _) => Err(ValidationError::InvalidValueType {
                expected: "an integer",
            }),
        }
    }

    fn build(
        &self,
        attribute: String,
        operator: &str,
        precision: Option<String>,
        value: Option<AttributeValue>,
    ) -> Result<AttributeSelector, ValidationError> {
        let (operator, requirement) = self.parse(operator)?;
        let missing = |parameter| ValidationError::MissingParameter {
            parameter,
            operator: operator.as_str(),
        };

        let (value, precision) = match requirement {
            Requirement::Nothing => (None, None),
            Requirement::Value => (Some(value.ok_or_else(|| missing("value"))?), None),
            Requirement::ValueAndPrecision => {
                let value = value.ok_or_else(|| missing("value"))?;
                let precision = precision.ok_or_else(|| missing("precision"))?;
                (Some(value), Some(precision))
            }
        };
        if let Some(value) = value.as_ref() {
            self.check_value(value)?;
        }

        Ok(AttributeSelector {
            attribute,
            operator,
            value,
            precision,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Comparison value of an attribute selector.
pub enum AttributeValue {
    Text(String),
    Number(i64),
    /// Structured value, e.g. a date range `{"start": .., "end": ..}`.
    Json(serde_json::Value),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<serde_json::Value> for AttributeValue {
    /// JSON strings and integers map onto [`AttributeValue::Text`] and
    /// [`AttributeValue::Number`]; anything else stays structured.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => Self::Number(integer),
                None => Self::Json(serde_json::Value::Number(number)),
            },
            other => Self::Json(other),
        }
    }
}

impl AttributeValue {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::from(text.as_str()),
            Self::Number(number) => serde_json::Value::from(*number),
            Self::Json(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    attribute: String,
    operator: Operator,
    value: Option<AttributeValue>,
    precision: Option<String>,
}

impl AttributeSelector {
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> Option<&AttributeValue> {
        self.value.as_ref()
    }

    pub fn precision(&self) -> Option<&str> {
        self.precision.as_deref()
    }

    /// `{"attribute", "operator"}` plus whichever of `value`/`precision` is set.
    pub(crate) fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("attribute".to_owned(), self.attribute.as_str().into());
        map.insert("operator".to_owned(), self.operator.as_str().into());
        if let Some(value) = self.value.as_ref() {
            map.insert("value".to_owned(), value.to_json());
        }
        if let Some(precision) = self.precision.as_deref() {
            map.insert("precision".to_owned(), precision.into());
        }
        serde_json::Value::Object(map)
    }
}

/// Select on an attribute with a DATE schema type.
///
/// `range` needs `value`; `before`, `after` and `equals` need both `value`
/// and `precision`; `is_empty` needs neither and ignores them.
pub fn date_attribute(
    attribute: impl Into<String>,
    operator: &str,
    precision: Option<String>,
    value: Option<AttributeValue>,
) -> Result<Selector, ValidationError> {
    DATE.build(attribute.into(), operator, precision, value)
        .map(Selector::from)
}

/// Select on an attribute with a TEXT schema type. `value` must be a string.
pub fn text_attribute(
    attribute: impl Into<String>,
    operator: &str,
    value: impl Into<AttributeValue>,
) -> Result<Selector, ValidationError> {
    TEXT.build(attribute.into(), operator, None, Some(value.into()))
        .map(Selector::from)
}

/// Select on an attribute with an INTEGER schema type. `value` must be an integer.
pub fn number_attribute(
    attribute: impl Into<String>,
    operator: &str,
    value: impl Into<AttributeValue>,
) -> Result<Selector, ValidationError> {
    NUMBER
        .build(attribute.into(), operator, None, Some(value.into()))
        .map(Selector::from)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn date_range_requires_value_and_omits_precision() {
        let err = date_attribute("last_opened", "range", None, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                parameter: "value",
                operator: "range",
            }
        );

        let range = json!({ "start": "2020-01-01", "end": "2020-02-01" });
        let selector = date_attribute(
            "last_opened",
            "range",
            Some("days".to_owned()),
            Some(range.clone().into()),
        )
        .unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "attribute": "last_opened", "operator": "range", "value": range })
        );
    }

    #[test]
    fn date_before_requires_precision() {
        let err =
            date_attribute("last_opened", "before", None, Some("2020-01-01".into())).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                parameter: "precision",
                operator: "before",
            }
        );

        let err = date_attribute("last_opened", "after", Some("date".to_owned()), None)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingParameter {
                parameter: "value",
                ..
            }
        ));

        let selector = date_attribute(
            "last_opened",
            "before",
            Some("date".to_owned()),
            Some("2020-01-01".into()),
        )
        .unwrap();
        assert_eq!(
            selector.to_json(),
            json!({
                "attribute": "last_opened",
                "operator": "before",
                "value": "2020-01-01",
                "precision": "date"
            })
        );
    }

    #[test]
    fn date_is_empty_emits_no_companion_fields() {
        let selector = date_attribute(
            "birthday",
            "is_empty",
            Some("years".to_owned()),
            Some("2020".into()),
        )
        .unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "attribute": "birthday", "operator": "is_empty" })
        );
    }

    #[test]
    fn date_rejects_text_only_operators() {
        let err = date_attribute("last_opened", "contains", None, None).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidOperator {
                attribute_type: "date",
                ..
            }
        ));
    }

    #[test]
    fn text_attribute_validates_operator_and_type() {
        let err = text_attribute("campaign", "bogus_op", "x").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOperator { .. }));

        let err = text_attribute("campaign", "before", "x").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOperator { .. }));

        let err = text_attribute("campaign", "equals", 5).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidValueType {
                expected: "a string"
            }
        );

        let selector = text_attribute("campaign", "contains", "spring").unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "attribute": "campaign", "operator": "contains", "value": "spring" })
        );
    }

    #[test]
    fn text_is_empty_still_requires_a_string() {
        assert!(text_attribute("campaign", "is_empty", "").is_ok());
        assert!(matches!(
            text_attribute("campaign", "is_empty", json!(null)),
            Err(ValidationError::InvalidValueType { .. })
        ));
    }

    #[test]
    fn number_attribute_requires_integer() {
        let err = number_attribute("score", "greater", "5").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidValueType {
                expected: "an integer"
            }
        );

        let err = number_attribute("score", "after", 5).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidOperator {
                attribute_type: "number",
                ..
            }
        ));

        let selector = number_attribute("score", "greater", 5).unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "attribute": "score", "operator": "greater", "value": 5 })
        );
    }

    #[test]
    fn json_strings_and_integers_count_as_typed_values() {
        let selector = text_attribute("campaign", "equals", json!("spring")).unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "attribute": "campaign", "operator": "equals", "value": "spring" })
        );

        let selector = number_attribute("score", "greater", json!(5)).unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "attribute": "score", "operator": "greater", "value": 5 })
        );

        assert!(matches!(
            number_attribute("score", "greater", json!(5.5)),
            Err(ValidationError::InvalidValueType { .. })
        ));
        assert_eq!(
            AttributeValue::from(json!({ "start": "2020-01-01" })),
            AttributeValue::Json(json!({ "start": "2020-01-01" }))
        );
    }
}
