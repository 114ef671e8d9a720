//! Wire types for the Notion query and block-children endpoints.
use serde::Deserialize;
use serde_json::{Map, Value};

/// One row of a Notion database. Properties stay as raw JSON so that a
/// property of an unsupported type degrades that one field instead of
/// failing the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct QueryDatabaseResp {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlockChildrenResp {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error body Notion returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Tagged union over the property types the extractor understands.
/// Decoded per-property from `Page::properties`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Title {
        #[serde(default)]
        title: Vec<RichTextItem>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextItem>,
    },
    Email {
        email: Option<String>,
    },
    Url {
        url: Option<String>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Number {
        number: Option<f64>,
    },
    Date {
        date: Option<DateSpan>,
    },
    Files {
        #[serde(default)]
        files: Vec<FileRef>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateSpan {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

/// A file entry of a files property: externally hosted or Notion hosted.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileRef {
    External { external: ExternalFile },
    File { file: HostedFile },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostedFile {
    pub url: String,
}

impl FileRef {
    pub fn url(&self) -> &str {
        match self {
            FileRef::External { external } => &external.url,
            FileRef::File { file } => &file.url,
        }
    }
}
