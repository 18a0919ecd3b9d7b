use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};
use tempfile::TempPath;

/// Staged uploads are created with this prefix; the sweeper only touches such files.
const STAGED_PREFIX: &str = "upload-";
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("malformed multipart body: {0}")]
    Multipart(String),
    #[error("field `{field}` exceeds the {limit} byte limit")]
    TooLarge { field: String, limit: usize },
    #[error("field `{0}` is not valid UTF-8")]
    InvalidText(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A file field written to the temp directory. The file is removed when this is dropped.
#[derive(Debug)]
pub struct StagedFile {
    pub file_name: Option<String>,
    pub size: u64,
    path: TempPath,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lower-cased extension of the client-supplied file name, if it looks sane.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let ext = Path::new(name).extension()?.to_str()?;
        if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Text fields and staged files of one multipart request.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, StagedFile>,
}

impl UploadForm {
    /// Trimmed text value; empty strings count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Untrimmed value, present even when empty.
    pub fn raw_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&StagedFile> {
        self.files.get(name)
    }
}

/// Reads every field of `payload`. Fields carrying a file name are streamed to
/// `upload_dir`; everything else is kept as text.
pub async fn read_upload_form(
    mut payload: Multipart,
    upload_dir: &Path,
    max_file_bytes: usize,
) -> Result<UploadForm, UploadError> {
    std::fs::create_dir_all(upload_dir)?;
    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        if let Some(file_name) = file_name {
            let mut staged = tempfile::Builder::new()
                .prefix(STAGED_PREFIX)
                .tempfile_in(upload_dir)?;
            let mut size = 0usize;

            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
                size += data.len();
                if size > max_file_bytes {
                    return Err(UploadError::TooLarge { field: name, limit: max_file_bytes });
                }
                staged.write_all(&data)?;
            }
            staged.flush()?;

            form.files.insert(
                name,
                StagedFile {
                    file_name: Some(file_name),
                    size: size as u64,
                    path: staged.into_temp_path(),
                },
            );
        } else {
            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
                bytes.extend_from_slice(&data);
                if bytes.len() > MAX_TEXT_FIELD_BYTES {
                    return Err(UploadError::TooLarge { field: name, limit: MAX_TEXT_FIELD_BYTES });
                }
            }
            let value = String::from_utf8(bytes).map_err(|_| UploadError::InvalidText(name.clone()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Deletes staged files in `dir` older than `max_age`. Returns how many were removed.
pub fn sweep_stale_uploads(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let is_staged = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(STAGED_PREFIX));
        if !is_staged {
            continue;
        }

        let age = entry
            .metadata()?
            .modified()?
            .elapsed()
            .unwrap_or_default();
        if age >= max_age && std::fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Runs [`sweep_stale_uploads`] every `interval` on the blocking pool.
pub fn spawn_upload_sweeper(dir: PathBuf, interval: Duration) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let target = dir.clone();
            match tokio::task::spawn_blocking(move || sweep_stale_uploads(&target, interval)).await {
                Ok(Ok(removed)) => tracing::info!(removed, dir = %dir.display(), "swept stale uploads"),
                Ok(Err(e)) => tracing::warn!(error = %e, "upload sweep failed"),
                Err(e) => tracing::error!(error = %e, "upload sweep task panicked"),
            }
        }
    });
}
