use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Airship application key, used as the basic-auth user name.
///
/// Invariant: non-empty after trimming.
pub struct AppKey(String);

impl AppKey {
    pub const FIELD: &'static str = "app_key";

    /// Create a validated [`AppKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Airship master secret, used as the basic-auth password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct MasterSecret(String);

impl MasterSecret {
    pub const FIELD: &'static str = "master_secret";

    /// Create a validated [`MasterSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret(***)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// OAuth-style bearer token.
///
/// Invariant: non-empty after trimming.
pub struct BearerToken(String);

impl BearerToken {
    pub const FIELD: &'static str = "bearer_token";

    /// Create a validated [`BearerToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}
