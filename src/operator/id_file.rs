//! Container identity resolution from ID files.
//!
//! Engines can write a new container's ID to a file at creation time (for
//! example `docker run --cidfile`). The caller may only know that file's
//! location relative to the job's working directory, or only a glob for it
//! when several attempts left several files behind. Every candidate ID is
//! checked against the live container list before it is trusted.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::context::Interruption;
use super::{OperationContext, Operator, OperatorResult};
use crate::engine::ContainerRuntime;

impl<R: ContainerRuntime> Operator<R> {
    /// Resolve the live container whose ID is stored in the file at `path`.
    ///
    /// A relative `path` is taken relative to `dir`. If no file exists at the
    /// resulting path it is expanded as a glob (`?` matches one character
    /// other than a separator, `*` any run of them), and matches are tried in
    /// sorted order until one holds the ID of a live container. Unreadable or
    /// stale matches are skipped.
    ///
    /// Returns `Ok(None)` when the file's ID is not a live container, or when
    /// no glob match yields one. File content that is not valid UTF-8 is
    /// treated the same way.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::Io` when the file at the exact path cannot be
    /// read, `OperatorError::Pattern` when the glob is malformed, list errors
    /// from [`Self::current_containers`], and `Cancelled` /
    /// `DeadlineExceeded` when `ctx` interrupts resolution.
    pub async fn container_id_by_path(
        &self,
        ctx: &OperationContext,
        path: &Utf8Path,
        dir: &Utf8Path,
    ) -> OperatorResult<Option<String>, R> {
        let id_path = absolutize(path, dir);

        if id_path.exists() {
            return self.verified_id_from_file(ctx, &id_path).await;
        }

        self.verified_id_from_glob(ctx, &id_path).await
    }

    /// Read the ID file at `id_path` and return its ID if it is live.
    async fn verified_id_from_file(
        &self,
        ctx: &OperationContext,
        id_path: &Utf8Path,
    ) -> OperatorResult<Option<String>, R> {
        ctx.check().map_err(Interruption::into_error)?;

        let Ok(content) = String::from_utf8(read_id_file(id_path)?) else {
            tracing::debug!(path = %id_path, "id file content is not UTF-8");
            return Ok(None);
        };
        let candidate = content.strip_suffix('\n').unwrap_or(&content);

        if self.is_live(ctx, candidate).await? {
            return Ok(Some(String::from(candidate)));
        }

        tracing::debug!(path = %id_path, candidate, "id file does not name a live container");
        Ok(None)
    }

    /// Try every path matching `pattern` until one names a live container.
    async fn verified_id_from_glob(
        &self,
        ctx: &OperationContext,
        pattern: &Utf8Path,
    ) -> OperatorResult<Option<String>, R> {
        let matches: Vec<Utf8PathBuf> = glob::glob(pattern.as_str())?
            .filter_map(|entry| match entry {
                Ok(matched) => Utf8PathBuf::from_path_buf(matched)
                    .inspect_err(|path| {
                        tracing::debug!(path = %path.display(), "skipping non-UTF-8 glob entry");
                    })
                    .ok(),
                Err(error) => {
                    tracing::debug!(error = %error, "skipping unreadable glob entry");
                    None
                }
            })
            .collect();

        for candidate_path in &matches {
            match self.verified_id_from_file(ctx, candidate_path).await {
                Ok(Some(id)) => return Ok(Some(id)),
                Ok(None) => {}
                Err(error) if error.is_interruption() => return Err(error),
                Err(error) => {
                    tracing::warn!(
                        path = %candidate_path,
                        error = %error,
                        "skipping id file candidate"
                    );
                }
            }
        }

        Ok(None)
    }
}

/// Join a relative `path` onto `dir`; absolute paths are returned unchanged.
fn absolutize(path: &Utf8Path, dir: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Read the raw bytes of an ID file.
///
/// Symlinks are resolved first, so the file is opened where `exists()` saw
/// it, through a handle on the resolved parent directory.
fn read_id_file(id_path: &Utf8Path) -> std::io::Result<Vec<u8>> {
    let resolved = id_path.canonicalize_utf8()?;
    let file_name = resolved.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{id_path} does not name a file"),
        )
    })?;
    let parent = resolved.parent().unwrap_or_else(|| Utf8Path::new("/"));

    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name)
}
