//! Post image uploads: extension allow-list, filename sanitation and
//! synchronous persistence into the public upload directory.

use std::fs;
use std::path::Path;

use actix_multipart::form::tempfile::TempFile;
use thiserror::Error;

/// Image types accepted for post covers.
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to store uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reduce a client-supplied filename to a safe basename: directory
/// components are dropped, whitespace becomes underscores, and anything
/// outside `[A-Za-z0-9._-]` is removed. Leading dots are stripped so a name
/// cannot hide as a dotfile.
pub fn sanitize_filename(name: &str) -> String {
    let basename = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = basename
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Store an uploaded image under `upload_dir`, returning the sanitized
/// filename to persist. Mirrors the form's leniency: a missing, empty or
/// non-image file is skipped (`None`) rather than rejected.
pub fn save_post_image(
    image: Option<TempFile>,
    upload_dir: &Path,
) -> Result<Option<String>, UploadError> {
    let Some(image) = image else {
        return Ok(None);
    };
    if image.size == 0 {
        return Ok(None);
    }
    let Some(original_name) = image.file_name.as_deref() else {
        return Ok(None);
    };

    let filename = sanitize_filename(original_name);
    if filename.is_empty() || !has_allowed_extension(&filename) {
        log::warn!("Skipping upload with disallowed filename: {original_name}");
        return Ok(None);
    }

    fs::create_dir_all(upload_dir)?;
    let destination = upload_dir.join(&filename);
    // copy rather than rename: the temp file may sit on another filesystem
    fs::copy(image.file.path(), &destination)?;

    Ok(Some(filename))
}
