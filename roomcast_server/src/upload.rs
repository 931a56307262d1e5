//! File upload endpoint: accepts a multipart file tagged by room name and
//! persists it to the local content store.
//!
//! Uploads are independent of the signaling core; an upload failure never
//! affects any session or registry state.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use serde::Serialize;
use tracing::{error, info};

use crate::error::UploadError;
use crate::handler::AppState;

/// Success body returned to the uploader.
#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub message: &'static str,
    pub filename: String,
}

/// `POST /upload/{room_id}` - store a recorded file for a room.
pub async fn upload_file(
    Path(room_id): Path<String>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceipt>, UploadError> {
    let receipt = store_file(&room_id, &mut multipart, &state).await;
    if let Err(err) = &receipt {
        error!(room = %room_id, error = %err, "file upload failed");
    }
    receipt.map(Json)
}

async fn store_file(
    room_id: &str,
    multipart: &mut Multipart,
    state: &AppState,
) -> Result<UploadReceipt, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(file_name_component)
            .unwrap_or_else(|| "upload.bin".to_string());
        let contents = field.bytes().await?;

        let path = state
            .config
            .upload_dir
            .join(format!("{room_id}-{filename}"));
        tokio::fs::write(&path, &contents).await?;
        info!(path = %path.display(), bytes = contents.len(), "file uploaded");

        return Ok(UploadReceipt {
            message: "file uploaded",
            filename,
        });
    }
    Err(UploadError::MissingFile)
}

/// Reduce a client-supplied filename to its final path component.
fn file_name_component(raw: &str) -> String {
    FsPath::new(raw)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string())
}
