//! Book model and related types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

/// Book formats. Everything except `Ebook` is a physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Ebook,
    Hardcover,
    Paperback,
}

impl BookFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookFormat::Ebook => "ebook",
            BookFormat::Hardcover => "hardcover",
            BookFormat::Paperback => "paperback",
        }
    }
}

impl std::fmt::Display for BookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book document. (title, author_id) is the natural key. The author reference
/// is weak: deleting an author does not cascade. `qty` is a signed count,
/// deliberately unclamped; only the circulation workflow should move it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub format: BookFormat,
    #[serde(default)]
    pub qty: i64,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Book title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "author_id must not be empty"))]
    pub author_id: String,
    pub format: BookFormat,
    #[serde(default)]
    pub qty: i64,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Signed delta applied to a book's quantity
#[derive(Debug, Deserialize, ToSchema)]
pub struct QtyDelta {
    pub delta: i64,
}

/// Book search query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookQuery {
    /// Case-insensitive substring to match against titles.
    pub search: Option<String>,
}
