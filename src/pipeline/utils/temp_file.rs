use std::path::{Path, PathBuf};
use log::{debug, warn};
use uuid::Uuid;

/// An upload written to the temp directory. The file is removed when the guard drops.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    pub async fn persist(temp_dir: &Path, extension: Option<&str>, im_bytes: &[u8]) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(temp_dir).await?;

        let mut file_name = Uuid::new_v4().to_string();
        if let Some(ext) = extension.filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric())) {
            file_name.push('.');
            file_name.push_str(ext);
        }
        let guard = TempImage { path: temp_dir.join(file_name) };

        tokio::fs::write(&guard.path, im_bytes).await?;
        debug!("stored upload at {:?}", guard.path);
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(_) => debug!("removed {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove temp file {:?}: {e}", self.path),
        }
    }
}

/// Extension of an uploaded file name, lowercased.
pub fn upload_extension(file_name: Option<&str>) -> Option<String> {
    file_name
        .map(Path::new)
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
