//! Google Drive file access for drivectl.
//!
//! This crate provides:
//! - A thin Drive v3 HTTP client authenticated with a bearer token
//! - The `DriveApi` trait as the seam between operations and the remote API
//! - The upload-with-upsert and folder-listing operations
//! - An in-memory API double for testing

pub mod api;
pub mod client;
pub mod fake;
pub mod ops;

pub use api::{DriveApi, DriveFile, FolderPage, FOLDER_MIME_TYPE};
pub use client::DriveClient;
pub use fake::FakeDrive;
pub use ops::{list_folders, upload};
