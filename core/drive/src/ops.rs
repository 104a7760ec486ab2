//! Upload (with upsert) and folder-listing operations.

use std::path::Path;

use drivectl_common::{Error, Result};

use crate::api::{DriveApi, DriveFile};

/// Upload a local file, updating an existing remote file of the same name
/// when one exists.
///
/// The target name defaults to the basename of `local_path`. The search is
/// find-or-none, scoped to `folder_id` when given; when several remote
/// files share the name, the first listing result is taken. A found file
/// has its content replaced, and when its parents are not exactly the
/// requested `folder_id` the same call removes all prior parents and adds
/// the target. Without a match a new file is created with `folder_id` as
/// its sole parent.
///
/// A failed search is treated as absence by policy (favor-create): the
/// error is logged and the upload proceeds as a create.
///
/// # Errors
/// - Local file unreadable
/// - Remote create/update failure
pub async fn upload(
    api: &dyn DriveApi,
    local_path: &Path,
    name: Option<&str>,
    folder_id: Option<&str>,
) -> Result<DriveFile> {
    let name = match name {
        Some(name) => name.to_string(),
        None => local_path
            .file_name()
            .ok_or_else(|| {
                Error::InvalidInput(format!("No file name in path: {}", local_path.display()))
            })?
            .to_string_lossy()
            .into_owned(),
    };

    let data = tokio::fs::read(local_path).await?;

    let existing = match api.find_file(&name, folder_id).await {
        Ok(found) => found,
        Err(e) => {
            // Favor-create policy: a failed search counts as "not found".
            tracing::warn!("Search for existing '{}' failed, treating as absent: {}", name, e);
            None
        }
    };

    let file = match existing {
        Some(existing) => {
            tracing::debug!(id = %existing.id, "Updating existing file '{}'", name);

            let (add_parent, remove_parents) = match folder_id {
                Some(folder) if existing.parents != [folder] => {
                    (Some(folder), existing.parents.clone())
                }
                _ => (None, Vec::new()),
            };

            api.update_file(&existing.id, data, add_parent, &remove_parents)
                .await
                .map_err(|e| Error::Upload(format!("Failed to update '{}': {}", name, e)))?
        }
        None => {
            tracing::debug!("Creating new file '{}'", name);

            api.create_file(&name, folder_id, data)
                .await
                .map_err(|e| Error::Upload(format!("Failed to create '{}': {}", name, e)))?
        }
    };

    Ok(file)
}

/// List folders, sorted ascending by name.
///
/// Takes the first page only (at most 100 entries); the client API exposes
/// the continuation token for callers that need to go further.
///
/// # Errors
/// - Remote listing failure
pub async fn list_folders(api: &dyn DriveApi) -> Result<Vec<DriveFile>> {
    let page = api
        .list_folders(None)
        .await
        .map_err(|e| Error::List(format!("Failed to list folders: {}", e)))?;

    if page.next_page_token.is_some() {
        tracing::debug!("More folders exist beyond the first page");
    }

    let mut folders = page.folders;
    folders.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeDrive};
    use std::io::Write;
    use std::path::PathBuf;

    fn write_local_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"local content").unwrap();
        path
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::new();
        drive.add_file("existing-id", "X", &[]);

        let result = upload(&drive, &path, Some("X"), None).await.unwrap();

        assert_eq!(result.id, "existing-id");
        assert_eq!(
            drive.write_calls(),
            vec![Call::Update {
                file_id: "existing-id".to_string(),
                add_parent: None,
                remove_parents: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn test_upsert_creates_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::new();

        let result = upload(&drive, &path, Some("X"), None).await.unwrap();

        assert_eq!(result.name, "X");
        assert_eq!(
            drive.write_calls(),
            vec![Call::Create {
                name: "X".to_string(),
                parent_id: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_name_defaults_to_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "testfile.txt");

        let drive = FakeDrive::new();

        let result = upload(&drive, &path, None, None).await.unwrap();

        assert_eq!(result.name, "testfile.txt");
        assert!(result.parents.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_folder_as_sole_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "report.pdf");

        let drive = FakeDrive::new();

        let result = upload(&drive, &path, None, Some("folder-1")).await.unwrap();

        assert_eq!(result.parents, vec!["folder-1".to_string()]);
    }

    #[tokio::test]
    async fn test_update_without_reassignment_when_parent_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::new();
        drive.add_file("f1", "X", &["folder-1"]);

        let result = upload(&drive, &path, Some("X"), Some("folder-1"))
            .await
            .unwrap();

        assert_eq!(result.id, "f1");
        assert_eq!(
            drive.write_calls(),
            vec![Call::Update {
                file_id: "f1".to_string(),
                add_parent: None,
                remove_parents: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn test_parent_reassignment_removes_all_prior_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::new();
        drive.add_file("f1", "X", &["new-folder", "old-2"]);

        let result = upload(&drive, &path, Some("X"), Some("new-folder"))
            .await
            .unwrap();

        assert_eq!(
            drive.write_calls(),
            vec![Call::Update {
                file_id: "f1".to_string(),
                add_parent: Some("new-folder".to_string()),
                remove_parents: vec!["new-folder".to_string(), "old-2".to_string()],
            }]
        );
        // Remove-then-add nets out to the target as sole parent.
        assert_eq!(result.parents, vec!["new-folder".to_string()]);
    }

    #[tokio::test]
    async fn test_scoped_search_misses_file_in_other_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::new();
        drive.add_file("f1", "X", &["elsewhere"]);

        // The search is scoped to the target folder, so a same-named file
        // under a different parent is not an upsert match.
        let result = upload(&drive, &path, Some("X"), Some("folder-1"))
            .await
            .unwrap();

        assert_ne!(result.id, "f1");
        assert_eq!(
            drive.write_calls(),
            vec![Call::Create {
                name: "X".to_string(),
                parent_id: Some("folder-1".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_find_failure_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::with_failing_find();

        let result = upload(&drive, &path, Some("X"), None).await.unwrap();

        assert_eq!(result.name, "X");
        assert_eq!(
            drive.write_calls(),
            vec![Call::Create {
                name: "X".to_string(),
                parent_id: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_exactly_one_write_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_local_file(dir.path(), "X");

        let drive = FakeDrive::new();
        drive.add_file("f1", "X", &[]);

        upload(&drive, &path, Some("X"), None).await.unwrap();
        assert_eq!(drive.write_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_local_file_is_error() {
        let drive = FakeDrive::new();
        let result = upload(&drive, Path::new("/nonexistent/file.txt"), None, None).await;
        assert!(result.is_err());
        // No remote write was attempted.
        assert!(drive.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_folders_sorted_by_name() {
        let drive = FakeDrive::new();
        drive.add_folder("id-b", "beta");
        drive.add_folder("id-a", "alpha");
        drive.add_folder("id-c", "gamma");

        let folders = list_folders(&drive).await.unwrap();

        let names: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_list_folders_excludes_files() {
        let drive = FakeDrive::new();
        drive.add_folder("id-a", "docs");
        drive.add_file("id-f", "notes.txt", &[]);

        let folders = list_folders(&drive).await.unwrap();

        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "docs");
    }

    #[tokio::test]
    async fn test_list_folders_empty() {
        let drive = FakeDrive::new();
        let folders = list_folders(&drive).await.unwrap();
        assert!(folders.is_empty());
    }
}
