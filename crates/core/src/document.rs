//! Document domain types.
//!
//! A [`Document`] is the unit the retrieval pipeline ranks and quotes from.
//! Documents belong to a case (by opaque id) and carry a category label that
//! is informational for humans and a weak relevance signal for the ranker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The filing category of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentCategory {
    Pleading,
    Contract,
    Correspondence,
    Affidavit,
    Motion,
}

impl DocumentCategory {
    /// All categories, in display order.
    pub const ALL: [DocumentCategory; 5] = [
        Self::Pleading,
        Self::Contract,
        Self::Correspondence,
        Self::Affidavit,
        Self::Motion,
    ];

    /// The human-readable label, as shown in context headers and matched by
    /// the ranker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pleading => "Pleading",
            Self::Contract => "Contract",
            Self::Correspondence => "Correspondence",
            Self::Affidavit => "Affidavit",
            Self::Motion => "Motion",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown document category: {s}"))
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique, stable identifier
    pub id: String,

    /// Display name (usually the uploaded file name)
    pub name: String,

    /// Owning case (opaque, never resolved by retrieval)
    pub case_id: String,

    /// Filing category
    #[serde(rename = "type")]
    pub category: DocumentCategory,

    /// Full text content
    pub content: String,

    /// When the document was uploaded
    #[serde(default = "Utc::now")]
    pub upload_date: DateTime<Utc>,
}

impl Document {
    /// Create a new document with a fresh `doc-<uuid>` id.
    pub fn new(
        name: impl Into<String>,
        case_id: impl Into<String>,
        category: DocumentCategory,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Self::generate_id(),
            name: name.into(),
            case_id: case_id.into(),
            category,
            content: content.into(),
            upload_date: Utc::now(),
        }
    }

    /// Replace the generated id with a caller-chosen one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Generate a document id of the form `doc-<uuid>`.
    pub fn generate_id() -> String {
        format!("doc-{}", Uuid::new_v4())
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: DocumentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(case_id) = patch.case_id {
            self.case_id = case_id;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}

/// A partial update to a [`Document`]. `None` fields are left untouched.
///
/// The id and upload date are immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<DocumentCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
