use serde::{Deserialize, Serialize};
use std::fmt::{Display, Error, Formatter};

/// Entities exposed through the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Category,
    Product,
    User,
}

impl EntityType {
    /// Display name used in error messages
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Product => "Product",
            Self::User => "User",
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.name())
    }
}

/// Operation enum representing different actions that can be performed on resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Create a resource
    Create,
    /// Write/Update a resource
    Write,
    /// Delete a resource
    Delete,
}

impl Operation {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }

    /// Create-time rules apply `required` checks
    #[inline]
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}
