//! Filesystem-backed [`ImageStore`] serving under `/uploads`.

use std::{future::Future, path::PathBuf};

use roster_core::image::ImageStore;
use uuid::Uuid;

const URL_PREFIX: &str = "/uploads/";

/// Stores profile images as randomly named files in a local directory.
pub struct LocalImageStore {
  dir: PathBuf,
}

impl LocalImageStore {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir }
  }
}

impl ImageStore for LocalImageStore {
  fn store(
    &self,
    bytes: Vec<u8>,
    extension: &str,
  ) -> impl Future<Output = Option<String>> + Send + '_ {
    let name = format!("{}.{extension}", Uuid::new_v4());
    let path = self.dir.join(&name);
    async move {
      match tokio::fs::write(&path, bytes).await {
        Ok(()) => Some(format!("{URL_PREFIX}{name}")),
        Err(e) => {
          tracing::warn!("failed to write image {path:?}: {e}");
          None
        }
      }
    }
  }

  fn delete<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = ()> + Send + 'a {
    async move {
      // Only touch files this store handed out; external URLs pass through.
      let Some(name) = url.strip_prefix(URL_PREFIX) else {
        return;
      };
      // A path separator in the remainder means the URL is not one of ours.
      if name.contains('/') || name.contains("..") {
        return;
      }
      let path = self.dir.join(name);
      if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("failed to remove image {path:?}: {e}");
      }
    }
  }
}
