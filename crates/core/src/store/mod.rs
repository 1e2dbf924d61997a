// Persistence: global state slot, scope resolution, request CRUD.

pub mod locator;
pub mod requests;
pub mod scope;
pub mod state;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub use locator::{locate, locate_and_remove};
pub use requests::RequestStore;
pub use scope::{Location, ScopeResolver};
pub use state::GlobalState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to create directory `{}`: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to encode `{}`: {source}", path.display())]
    Encode { path: PathBuf, source: serde_json::Error },
}

/// Read a file, treating "not found" as `None`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read { path: path.to_path_buf(), source }),
    }
}

/// Replace `path` with `bytes` via a sibling temp file and rename, creating
/// parent directories first.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| StoreError::CreateDir { path: parent.to_path_buf(), source })?;
    }

    let tmp_path = temp_path_for(path);
    let write_err = |source| StoreError::Write { path: path.to_path_buf(), source };

    let result = async {
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_data().await?;
        drop(file);
        fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(write_err(source));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("store");
    path.with_file_name(format!(".{file_name}.tmp.{}", Uuid::new_v4().simple()))
}
