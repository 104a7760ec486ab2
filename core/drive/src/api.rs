//! Drive API types and the trait seam used by operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drivectl_common::Result;

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Drive file metadata as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID.
    pub id: String,
    /// File name.
    pub name: String,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Parent folder IDs.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Created time.
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    /// Browser link to the file.
    #[serde(default)]
    pub web_view_link: Option<String>,
    /// Trashed status.
    #[serde(default)]
    pub trashed: bool,
}

impl DriveFile {
    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// One page of a folder listing, with an explicit continuation token.
#[derive(Debug, Clone)]
pub struct FolderPage {
    /// Folders on this page.
    pub folders: Vec<DriveFile>,
    /// Token for the next page, if any.
    pub next_page_token: Option<String>,
}

/// The remote file API as seen by the operations.
///
/// Implemented by [`crate::DriveClient`] for the real service and by
/// [`crate::FakeDrive`] for tests.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Find a non-trashed file by exact name, optionally scoped to a parent
    /// folder. Absence is `Ok(None)`, not an error. When several files share
    /// the name, the first listing result is returned.
    async fn find_file(&self, name: &str, parent_id: Option<&str>)
        -> Result<Option<DriveFile>>;

    /// Create a new file with the given content and, if supplied, a sole
    /// parent folder.
    async fn create_file(
        &self,
        name: &str,
        parent_id: Option<&str>,
        data: Vec<u8>,
    ) -> Result<DriveFile>;

    /// Replace the content of an existing file, optionally reassigning its
    /// parents in the same call.
    async fn update_file(
        &self,
        file_id: &str,
        data: Vec<u8>,
        add_parent: Option<&str>,
        remove_parents: &[String],
    ) -> Result<DriveFile>;

    /// List folders, one page at a time, ordered by name.
    async fn list_folders(&self, page_token: Option<&str>) -> Result<FolderPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_file_is_folder() {
        let folder = DriveFile {
            id: "1".to_string(),
            name: "folder".to_string(),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: vec![],
            created_time: None,
            web_view_link: None,
            trashed: false,
        };
        assert!(folder.is_folder());

        let file = DriveFile {
            id: "2".to_string(),
            name: "file.txt".to_string(),
            mime_type: Some("text/plain".to_string()),
            parents: vec![],
            created_time: None,
            web_view_link: None,
            trashed: false,
        };
        assert!(!file.is_folder());
    }

    #[test]
    fn test_drive_file_wire_format() {
        let json = r#"{
            "id": "abc123",
            "name": "test.txt",
            "mimeType": "text/plain",
            "parents": ["root"],
            "createdTime": "2026-01-01T00:00:00Z",
            "webViewLink": "https://drive.google.com/file/d/abc123/view"
        }"#;

        let file: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "abc123");
        assert_eq!(file.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(file.parents, vec!["root".to_string()]);
        assert!(file.web_view_link.is_some());
        assert!(!file.trashed);
    }

    #[test]
    fn test_drive_file_minimal_wire_format() {
        // Listing responses only carry the requested fields.
        let json = r#"{"id": "f1", "name": "docs"}"#;
        let file: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.name, "docs");
        assert!(file.parents.is_empty());
        assert!(file.created_time.is_none());
    }
}
