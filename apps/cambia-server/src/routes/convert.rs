//! Conversion route
//!
//! POST /convert accepts multipart form data with repeated `files` parts and
//! one `targetFormat` field. The whole request is processed synchronously:
//! uploads are stored, the router picks an operation, the operation runs in a
//! blocking task, and the response carries the download URL.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::convert::{self, InputKind, Operation, RouteError, TargetFormat};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage;

/// One `files` part pulled out of the multipart body.
struct UploadedPart {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    pub download_url: String,
}

/// POST /convert
pub async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>> {
    let mut parts: Vec<UploadedPart> = Vec::new();
    let mut target_format: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("files") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await?;
                parts.push(UploadedPart {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("targetFormat") => {
                target_format = Some(field.text().await?);
            }
            _ => {}
        }
    }

    // Zero files is rejected before the router is ever consulted.
    if parts.is_empty() {
        return Err(AppError::NoFilesProvided);
    }

    let target_str = target_format.ok_or_else(|| {
        AppError::UnsupportedConversion("No target format provided.".to_string())
    })?;
    let target = TargetFormat::parse(&target_str).ok_or_else(|| {
        AppError::UnsupportedConversion(format!("Unknown target format: {}", target_str))
    })?;

    // Classify and route before any file I/O, so unsupported pairs never
    // touch the disk.
    let mut kinds = Vec::with_capacity(parts.len());
    for part in &parts {
        let kind = InputKind::detect(part.content_type.as_deref(), &part.file_name)
            .ok_or_else(|| {
                AppError::UnsupportedConversion(format!(
                    "Unsupported input type: {}",
                    part.file_name
                ))
            })?;
        kinds.push(kind);
    }

    let operation = convert::route(&kinds, target).map_err(|e| match e {
        RouteError::NoFiles => AppError::NoFilesProvided,
        other => AppError::UnsupportedConversion(other.to_string()),
    })?;

    let config = state.config();
    let mut stored = Vec::with_capacity(parts.len());
    for part in &parts {
        stored.push(storage::store_upload(
            &config.storage.upload_dir,
            &part.file_name,
            &part.data,
        )?);
    }

    let output_name = match operation {
        Operation::MergeImagesToPdf => storage::merged_file_name(),
        _ => storage::output_file_name(&stored[0].original_name, target),
    };
    let output_path = config.storage.download_dir.join(&output_name);
    let input_paths: Vec<PathBuf> = stored.iter().map(|s| s.path.clone()).collect();

    tracing::info!(
        ?operation,
        files = input_paths.len(),
        output = %output_name,
        "Running conversion"
    );

    // Conversions are CPU-bound library calls; keep them off the async
    // workers.
    let produced = tokio::task::spawn_blocking(move || {
        convert::execute(operation, &input_paths, &output_path)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Conversion task failed: {}", e)))??;

    tracing::info!(path = %produced.display(), "Conversion complete");

    Ok(Json(ConvertResponse {
        success: true,
        download_url: format!("/downloads/{}", output_name),
    }))
}
