//! In-memory Drive API double for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use drivectl_common::{Error, Result};

use crate::api::{DriveApi, DriveFile, FolderPage, FOLDER_MIME_TYPE};

/// One recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find {
        name: String,
        parent_id: Option<String>,
    },
    Create {
        name: String,
        parent_id: Option<String>,
    },
    Update {
        file_id: String,
        add_parent: Option<String>,
        remove_parents: Vec<String>,
    },
    ListFolders,
}

/// In-memory Drive API.
///
/// Holds files in insertion order and records every call, so tests can
/// assert which remote operations an upsert performed. All state is lost
/// on drop.
#[derive(Default)]
pub struct FakeDrive {
    files: Mutex<Vec<DriveFile>>,
    calls: Mutex<Vec<Call>>,
    fail_find: bool,
}

impl FakeDrive {
    /// Create an empty fake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fake whose find step always fails.
    pub fn with_failing_find() -> Self {
        Self {
            fail_find: true,
            ..Self::default()
        }
    }

    /// Seed a regular file.
    pub fn add_file(&self, id: &str, name: &str, parents: &[&str]) {
        self.files.lock().unwrap().push(DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: Some("application/octet-stream".to_string()),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            created_time: Some(Utc::now()),
            web_view_link: Some(format!("https://drive.google.com/file/d/{}/view", id)),
            trashed: false,
        });
    }

    /// Seed a folder.
    pub fn add_folder(&self, id: &str, name: &str) {
        self.files.lock().unwrap().push(DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: vec![],
            created_time: Some(Utc::now()),
            web_view_link: None,
            trashed: false,
        });
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded write calls (create and update only).
    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. } | Call::Update { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn find_file(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<DriveFile>> {
        self.record(Call::Find {
            name: name.to_string(),
            parent_id: parent_id.map(String::from),
        });

        if self.fail_find {
            return Err(Error::Network("injected find failure".to_string()));
        }

        let files = self.files.lock().unwrap();
        let found = files
            .iter()
            .find(|f| {
                !f.trashed
                    && f.name == name
                    && parent_id.map_or(true, |p| f.parents.iter().any(|fp| fp == p))
            })
            .cloned();

        Ok(found)
    }

    async fn create_file(
        &self,
        name: &str,
        parent_id: Option<&str>,
        _data: Vec<u8>,
    ) -> Result<DriveFile> {
        self.record(Call::Create {
            name: name.to_string(),
            parent_id: parent_id.map(String::from),
        });

        let mut files = self.files.lock().unwrap();
        let id = format!("file-{}", files.len() + 1);

        let file = DriveFile {
            id: id.clone(),
            name: name.to_string(),
            mime_type: Some("application/octet-stream".to_string()),
            parents: parent_id.map(String::from).into_iter().collect(),
            created_time: Some(Utc::now()),
            web_view_link: Some(format!("https://drive.google.com/file/d/{}/view", id)),
            trashed: false,
        };

        files.push(file.clone());
        Ok(file)
    }

    async fn update_file(
        &self,
        file_id: &str,
        _data: Vec<u8>,
        add_parent: Option<&str>,
        remove_parents: &[String],
    ) -> Result<DriveFile> {
        self.record(Call::Update {
            file_id: file_id.to_string(),
            add_parent: add_parent.map(String::from),
            remove_parents: remove_parents.to_vec(),
        });

        let mut files = self.files.lock().unwrap();
        let file = files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| Error::NotFound(format!("No file with id {}", file_id)))?;

        file.parents.retain(|p| !remove_parents.contains(p));
        if let Some(parent) = add_parent {
            file.parents.push(parent.to_string());
        }

        Ok(file.clone())
    }

    async fn list_folders(&self, _page_token: Option<&str>) -> Result<FolderPage> {
        self.record(Call::ListFolders);

        let files = self.files.lock().unwrap();
        let folders = files
            .iter()
            .filter(|f| f.is_folder() && !f.trashed)
            .cloned()
            .collect();

        Ok(FolderPage {
            folders,
            next_page_token: None,
        })
    }
}
