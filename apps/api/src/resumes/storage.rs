use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Characters of extracted text kept for the review queue.
pub const PREVIEW_CHARS: usize = 2000;

const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn resume_key(student_id: Uuid, submission_id: Uuid) -> String {
    format!("resumes/{student_id}/{submission_id}.pdf")
}

/// Checks that an upload is a non-empty PDF within the size limit.
pub fn validate_pdf(file_name: &str, data: &[u8], max_bytes: usize) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "file exceeds the {max_bytes} byte limit"
        )));
    }
    if !file_name.to_lowercase().ends_with(".pdf") || !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("only PDF resumes are accepted".to_string()));
    }
    Ok(())
}

pub async fn upload_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    data: Bytes,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(())
}

/// Removes an uploaded resume whose submission row could not be recorded.
pub async fn delete_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;

    info!("Deleted orphaned resume s3://{bucket}/{key}");
    Ok(())
}

/// Extracts a text preview from a PDF on a blocking thread.
///
/// Extraction failures degrade to `None`; an unreadable PDF can still be reviewed.
pub async fn extract_preview(data: Bytes) -> Option<String> {
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match result {
        Ok(Ok(text)) => Some(truncate_preview(&text)).filter(|p| !p.is_empty()),
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("spawn_blocking failed during PDF extraction: {e}");
            None
        }
    }
}

/// Collapses whitespace runs and keeps at most `PREVIEW_CHARS` characters.
pub fn truncate_preview(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}
