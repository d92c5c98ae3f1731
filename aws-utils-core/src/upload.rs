//! Upload a file or a whole directory tree into an object store bucket.
//!
//! An upload runs in two phases:
//!   - **Plan**: stat the root, walk the tree and derive one [`UploadTask`] per file
//!     (destination key and content type). The whole plan exists before anything is sent.
//!   - **Dispatch**: every task is started at once and driven concurrently on the
//!     caller's task. All uploads are allowed to finish; the first failure to arrive
//!     becomes the result of the whole operation.
//!
//! Keys are `prefix + relative path` with `/` separators. The prefix is prepended
//! verbatim, so a prefix meant as a "folder" must carry its own trailing `/`.
//!
//! Fan-out is unbounded: a tree with N files opens N file handles at once.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::contract::{ObjectStore, PutObject};
use crate::error::{Error, Result};

/// Content type used for unknown or missing extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Scope of one upload call.
#[derive(Debug, Clone)]
pub struct UploadRoot {
    /// File or directory to upload.
    pub path: PathBuf,
    pub bucket: String,
    /// Canned ACL applied to every object (e.g. `public-read`).
    pub acl: String,
    pub prefix: Option<String>,
}

/// A single file scheduled for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub source_path: PathBuf,
    pub destination_key: String,
    pub content_type: &'static str,
}

/// Keys uploaded by a successful call, sorted.
#[derive(Debug, Default, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
}

/// Maps the lowercase file extension to a content type.
///
/// The extension is whatever follows the last `.` of the file name, so dotfiles
/// such as `.png` count as having one.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("ts") => "application/typescript",
        Some("gif") => "image/gif",
        Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

pub fn destination_key(prefix: Option<&str>, relative: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{relative}"),
        None => relative.to_string(),
    }
}

/// Object keys are strings; a name that is not valid UTF-8 has no faithful key.
fn utf8_name<'a>(path: &Path, name: &'a OsStr) -> Result<&'a str> {
    name.to_str().ok_or_else(|| {
        error!(path = %path.display(), "File name is not valid UTF-8");
        Error::filesystem(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
        )
    })
}

/// `/`-joined path of `file` relative to `root`.
fn relative_key(root: &Path, file: &Path) -> Result<String> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let parts = relative
        .components()
        .map(|component| utf8_name(file, component.as_os_str()))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

/// Builds the full upload plan for `root` without sending anything.
///
/// Fails with [`Error::Filesystem`] if the root, or any directory or entry below it,
/// cannot be read.
pub async fn plan_uploads(root: &UploadRoot) -> Result<Vec<UploadTask>> {
    let metadata = tokio::fs::metadata(&root.path).await.map_err(|e| {
        error!(error = ?e, path = %root.path.display(), "Failed to stat upload root");
        Error::filesystem(&root.path, e)
    })?;

    if !metadata.is_dir() {
        let name = root.path.file_name().unwrap_or(root.path.as_os_str());
        let base_name = utf8_name(&root.path, name)?;
        debug!(path = %root.path.display(), "Upload root is a single file");
        return Ok(vec![UploadTask {
            source_path: root.path.clone(),
            destination_key: destination_key(root.prefix.as_deref(), base_name),
            content_type: content_type(&root.path),
        }]);
    }

    let files = collect_files(&root.path).await?;
    let mut tasks: Vec<UploadTask> = files
        .into_iter()
        .map(|file| {
            let relative = relative_key(&root.path, &file)?;
            Ok(UploadTask {
                destination_key: destination_key(root.prefix.as_deref(), &relative),
                content_type: content_type(&file),
                source_path: file,
            })
        })
        .collect::<Result<_>>()?;
    tasks.sort_by(|a, b| a.destination_key.cmp(&b.destination_key));

    debug!(
        root = %root.path.display(),
        count = tasks.len(),
        "Planned directory upload"
    );
    Ok(tasks)
}

/// Walks `root` with an explicit work-list and returns every file below it.
///
/// Directory entries are not followed through symlinks; a symlink is kept only
/// when it points at a regular file.
async fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
            error!(error = ?e, path = %dir.display(), "Failed to list directory");
            Error::filesystem(&dir, e)
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::filesystem(&dir, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::filesystem(&path, e))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            } else if file_type.is_symlink() {
                let target = tokio::fs::metadata(&path).await.map_err(|e| {
                    error!(error = ?e, path = %path.display(), "Failed to resolve symlink");
                    Error::filesystem(&path, e)
                })?;
                if target.is_file() {
                    files.push(path);
                } else {
                    warn!(path = %path.display(), "Skipping symlink that does not point at a file");
                }
            } else {
                debug!(path = %path.display(), "Skipping special file");
            }
        }
    }

    Ok(files)
}

type UploadedCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Uploads files and directory trees through an [`ObjectStore`].
pub struct DirectoryUploader<S> {
    store: S,
    on_uploaded: Option<UploadedCallback>,
}

impl<S: ObjectStore> DirectoryUploader<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            on_uploaded: None,
        }
    }

    /// Registers a callback invoked with the key of each object once it is stored.
    pub fn on_uploaded<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_uploaded = Some(Box::new(callback));
        self
    }

    /// Uploads `root` and resolves once every object is stored.
    ///
    /// If any upload fails the call fails with the first error observed, after the
    /// remaining in-flight uploads have finished.
    pub async fn upload(&self, root: &UploadRoot) -> Result<UploadReport> {
        info!(
            path = %root.path.display(),
            bucket = %root.bucket,
            prefix = ?root.prefix,
            "Starting upload"
        );

        let tasks = plan_uploads(root).await?;

        let mut in_flight: FuturesUnordered<_> = tasks
            .iter()
            .map(|task| self.upload_task(root, task))
            .collect();

        let mut uploaded = Vec::with_capacity(tasks.len());
        let mut first_error: Option<Error> = None;

        while let Some(outcome) = in_flight.next().await {
            match outcome {
                Ok(key) => uploaded.push(key),
                Err(e) => {
                    error!(error = %e, "Upload failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            error!(
                succeeded = uploaded.len(),
                total = tasks.len(),
                "Upload finished with failures"
            );
            return Err(e);
        }

        uploaded.sort();
        info!(count = uploaded.len(), bucket = %root.bucket, "Upload complete");
        Ok(UploadReport { uploaded })
    }

    async fn upload_task(&self, root: &UploadRoot, task: &UploadTask) -> Result<String> {
        let body = tokio::fs::File::open(&task.source_path)
            .await
            .map_err(|e| Error::filesystem(&task.source_path, e))?;

        let request = PutObject {
            bucket: root.bucket.clone(),
            key: task.destination_key.clone(),
            acl: root.acl.clone(),
            content_type: task.content_type.to_string(),
            body,
        };

        self.store
            .put_object(request)
            .await
            .map_err(|source| Error::Upload {
                key: task.destination_key.clone(),
                source,
            })?;

        info!(key = %task.destination_key, bucket = %root.bucket, "Uploaded object");
        if let Some(callback) = &self.on_uploaded {
            callback(&task.destination_key);
        }
        Ok(task.destination_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_uses_lowercase_extension() {
        assert_eq!(content_type(Path::new("x.png")), "image/png");
        assert_eq!(content_type(Path::new("dir/INDEX.HTML")), "text/html");
        assert_eq!(content_type(Path::new("a/b.min.js")), "application/javascript");
        assert_eq!(content_type(Path::new("x.unknown")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type(Path::new("x")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type(Path::new("dir/.png")), "image/png");
        assert_eq!(content_type(Path::new("assets.css/readme")), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn prefix_is_prepended_verbatim() {
        assert_eq!(destination_key(Some("p"), "adir/4.ts"), "padir/4.ts");
        assert_eq!(destination_key(Some("site/"), "1.html"), "site/1.html");
        assert_eq!(destination_key(None, "1.html"), "1.html");
    }

    #[test]
    fn relative_key_joins_with_forward_slashes() {
        let root = Path::new("/tmp/root");
        let file = root.join("a").join("b").join("c.css");
        assert_eq!(relative_key(root, &file).unwrap(), "a/b/c.css");
    }
}
