//! Google Drive v3 API client.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use drivectl_common::{Error, Result};

use crate::api::{DriveApi, DriveFile, FolderPage, FOLDER_MIME_TYPE};

/// Google Drive API base URL.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
/// Google Drive upload API base URL.
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Metadata fields requested on every file response.
const FILE_FIELDS: &str = "id,name,mimeType,parents,createdTime,webViewLink,trashed";

/// Page size for folder listings.
const FOLDER_PAGE_SIZE: &str = "100";

/// Response from listing files.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Build the `q` expression for a find-by-name search. Both the name and
/// the parent ID come from user input and get quote-escaped.
fn search_query(name: &str, parent_id: Option<&str>) -> String {
    let mut query = format!("name = '{}' and trashed = false", escape_query_term(name));
    if let Some(parent) = parent_id {
        query.push_str(&format!(" and '{}' in parents", escape_query_term(parent)));
    }
    query
}

fn escape_query_term(term: &str) -> String {
    term.replace('\'', "\\'")
}

/// Drive API client authenticated with a bearer token.
pub struct DriveClient {
    http: Client,
    access_token: String,
}

impl DriveClient {
    /// Create a new Drive client from an access token.
    ///
    /// # Errors
    /// - HTTP client construction failure
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent("drivectl/0.1")
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            access_token: access_token.into(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Handle API response with error checking.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::Network(format!("Failed to parse response: {}", e)))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(Error::Auth("Invalid or expired token".to_string()))
        } else if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound("Resource not found".to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Network(format!("API error: {} - {}", status, body)))
        }
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn find_file(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<DriveFile>> {
        let url = format!("{}/files", DRIVE_API_BASE);

        let query = search_query(name, parent_id);
        let fields = format!("files({})", FILE_FIELDS);

        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .query(&[
                ("q", query.as_str()),
                ("fields", fields.as_str()),
                ("pageSize", "1"),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to find file: {}", e)))?;

        let list_response: FileListResponse = self.handle_response(response).await?;
        Ok(list_response.files.into_iter().next())
    }

    async fn create_file(
        &self,
        name: &str,
        parent_id: Option<&str>,
        data: Vec<u8>,
    ) -> Result<DriveFile> {
        let url = format!("{}/files?uploadType=multipart", DRIVE_UPLOAD_BASE);

        let mut metadata = serde_json::json!({ "name": name });
        if let Some(parent) = parent_id {
            metadata["parents"] = serde_json::json!([parent]);
        }

        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| Error::Serialization(format!("Failed to serialize metadata: {}", e)))?;

        // Multipart/related body: JSON metadata part, then raw content part.
        let boundary = "drivectl_boundary";
        let mut body = Vec::new();

        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.extend_from_slice(metadata_json.as_bytes());
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{}--", boundary).as_bytes());

        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .header(
                header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .query(&[("fields", FILE_FIELDS)])
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to create file: {}", e)))?;

        self.handle_response(response).await
    }

    async fn update_file(
        &self,
        file_id: &str,
        data: Vec<u8>,
        add_parent: Option<&str>,
        remove_parents: &[String],
    ) -> Result<DriveFile> {
        let url = format!("{}/files/{}?uploadType=media", DRIVE_UPLOAD_BASE, file_id);

        let mut request = self
            .http
            .patch(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .query(&[("fields", FILE_FIELDS)]);

        // Parent reassignment rides on the same update call.
        if let Some(parent) = add_parent {
            request = request.query(&[("addParents", parent)]);
        }
        if !remove_parents.is_empty() {
            request = request.query(&[("removeParents", remove_parents.join(",").as_str())]);
        }

        let response = request
            .body(data)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to update file: {}", e)))?;

        self.handle_response(response).await
    }

    async fn list_folders(&self, page_token: Option<&str>) -> Result<FolderPage> {
        let url = format!("{}/files", DRIVE_API_BASE);

        let query = format!("mimeType = '{}' and trashed = false", FOLDER_MIME_TYPE);
        let fields = format!("nextPageToken, files({})", FILE_FIELDS);

        let mut request = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .query(&[
                ("q", query.as_str()),
                ("fields", fields.as_str()),
                ("pageSize", FOLDER_PAGE_SIZE),
                ("orderBy", "name"),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to list folders: {}", e)))?;

        let list_response: FileListResponse = self.handle_response(response).await?;

        Ok(FolderPage {
            folders: list_response.files,
            next_page_token: list_response.next_page_token,
        })
    }
}
