use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidIdentifier {
        field: &'static str,
        expected: &'static str,
        input: String,
    },
    InvalidOperator {
        attribute_type: &'static str,
        operator: String,
        allowed: &'static [&'static str],
    },
    MissingParameter {
        parameter: &'static str,
        operator: &'static str,
    },
    InvalidValueType {
        expected: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidIdentifier {
                field,
                expected,
                input,
            } => write!(f, "{field} value must be {expected}, got {input:?}"),
            Self::InvalidOperator {
                attribute_type,
                operator,
                allowed,
            } => write!(
                f,
                "invalid {attribute_type} attribute operator {operator:?}; must be one of: {}",
                allowed.join(", ")
            ),
            Self::MissingParameter {
                parameter,
                operator,
            } => write!(
                f,
                "{parameter} must be included when using the '{operator}' operator"
            ),
            Self::InvalidValueType { expected } => write!(f, "value must be {expected}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "alert" };
        assert_eq!(err.to_string(), "alert must not be empty");

        let err = ValidationError::InvalidIdentifier {
            field: "ios_channel",
            expected: "a UUID",
            input: "nope".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "ios_channel value must be a UUID, got \"nope\""
        );

        let err = ValidationError::InvalidIdentifier {
            field: "sms_sender",
            expected: "numeric",
            input: "12a".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "sms_sender value must be numeric, got \"12a\""
        );

        let err = ValidationError::InvalidOperator {
            attribute_type: "text",
            operator: "bogus".to_owned(),
            allowed: &["equals", "contains"],
        };
        assert_eq!(
            err.to_string(),
            "invalid text attribute operator \"bogus\"; must be one of: equals, contains"
        );

        let err = ValidationError::MissingParameter {
            parameter: "precision",
            operator: "before",
        };
        assert_eq!(
            err.to_string(),
            "precision must be included when using the 'before' operator"
        );

        let err = ValidationError::InvalidValueType {
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "value must be an integer");
    }
}
