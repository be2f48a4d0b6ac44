use serde::{Deserialize, Serialize};

use super::ids::{FileId, GraphId, ResourceId};

/// A file the backend stores on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file: FileId,
    pub filename: String,
}

/// A freshly allocated file together with where its bytes must be PUT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub file: FileId,
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
}

/// A roadmap graph shared with the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    pub object: GraphId,
}

/// Name of the file that holds a resource's free-text content.
pub fn content_filename(resource: &ResourceId) -> String {
    format!("resource-{}.md", resource)
}
