//! Account holders.

use crate::record::Record;
use folio_codec::{CodecResult, Fields};
use serde::Serialize;
use std::fmt;

/// Opaque credential string produced by an external hashing component.
///
/// Stored and returned verbatim. `Debug` never prints the value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The stored value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if no credential is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A registered account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountHolder {
    /// Unique identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Opaque credential.
    #[serde(skip_serializing)]
    pub credential: Credential,
    /// Administrative privileges.
    pub is_admin: bool,
}

impl AccountHolder {
    /// Creates an account holder.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        credential: impl Into<Credential>,
        is_admin: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            credential: credential.into(),
            is_admin,
        }
    }
}

impl Record for AccountHolder {
    const KIND: &'static str = "account holder";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.credential.as_str().to_owned(),
            self.is_admin.to_string(),
        ]
    }

    fn from_fields(fields: &Fields) -> CodecResult<Self> {
        Ok(Self {
            id: fields.string(0),
            name: fields.string(1),
            email: fields.string(2),
            phone: fields.string(3),
            credential: Credential::new(fields.string(4)),
            is_admin: fields.flag(5),
        })
    }
}
