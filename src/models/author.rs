//! Author model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Author document. (name, country) is the natural key; `id` is the generated
/// identifier clients address the author by.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Author {
    #[serde(default)]
    pub id: String,
    // Defaulted so a stub created by an image upsert still decodes.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "Author name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Author country must not be empty"))]
    pub country: String,
    pub image: Option<String>,
}

/// Set author image request (upsert by id)
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAuthorImage {
    pub id: String,
    pub image: String,
}

/// Author listing query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AuthorQuery {
    /// Exact author name to look up; omit to list all authors.
    pub name: Option<String>,
}
