//! Typed records appended to the document store.
//!
//! DESIGN
//! ======
//! Each form gets its own validated record type instead of an open mapping.
//! The enum tag travels over the wire so the server can re-validate before it
//! writes anything.

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Collection every record is appended to.
pub const RECORDS_COLLECTION: &str = "datos";

pub const MAX_NAME_CHARS: usize = 120;
pub const MAX_AGE: u32 = 150;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("name is required")]
    EmptyName,
    #[error("name must be at most {MAX_NAME_CHARS} characters")]
    NameTooLong,
    #[error("age must be between 0 and {MAX_AGE}")]
    AgeOutOfRange,
}

/// Name + age entry submitted from the dashboard form.
///
/// Deserialization goes through [`ContactRecord::new`], so a record read off
/// the wire is trimmed and validated like one built in code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContact")]
pub struct ContactRecord {
    name: String,
    age: u32,
}

#[derive(Deserialize)]
struct RawContact {
    name: String,
    age: u32,
}

impl TryFrom<RawContact> for ContactRecord {
    type Error = RecordError;

    fn try_from(raw: RawContact) -> Result<Self, Self::Error> {
        Self::new(&raw.name, raw.age)
    }
}

impl ContactRecord {
    /// # Errors
    ///
    /// Returns a [`RecordError`] when the trimmed name is empty or too long,
    /// or the age is above [`MAX_AGE`].
    pub fn new(name: &str, age: u32) -> Result<Self, RecordError> {
        let record = Self { name: name.trim().to_owned(), age };
        record.validate()?;
        Ok(record)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    fn validate(&self) -> Result<(), RecordError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RecordError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(RecordError::NameTooLong);
        }
        if self.age > MAX_AGE {
            return Err(RecordError::AgeOutOfRange);
        }
        Ok(())
    }
}

/// Every record shape the application writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Contact(ContactRecord),
}

impl Record {
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Contact(_) => RECORDS_COLLECTION,
        }
    }

    /// Re-check invariants before a write.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`RecordError`].
    pub fn validate(&self) -> Result<(), RecordError> {
        match self {
            Self::Contact(contact) => contact.validate(),
        }
    }

    /// Document fields as stored, without the `kind` tag.
    #[must_use]
    pub fn fields(&self) -> Map<String, Value> {
        match self {
            Self::Contact(contact) => {
                let mut fields = Map::new();
                fields.insert("name".to_owned(), Value::from(contact.name.clone()));
                fields.insert("age".to_owned(), Value::from(contact.age));
                fields
            }
        }
    }
}

/// Append-only document store. No identifier or read-back is exposed.
#[async_trait(?Send)]
pub trait DocumentStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record is invalid or the store rejects it.
    async fn append(&self, record: &Record) -> Result<(), StoreError>;
}
