// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model loading operations

use crate::EntityId;
use thiserror::Error;

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while loading a model
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input is not a STEP physical file
    #[error("Invalid IFC format: {0}")]
    InvalidFormat(String),

    /// Failed to parse the header section
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Failed to parse an entity
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// Entity not found in the index
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ParseError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        ParseError::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: EntityId, msg: impl Into<String>) -> Self {
        ParseError::EntityParse(id, msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        ParseError::Other(msg.into())
    }
}
