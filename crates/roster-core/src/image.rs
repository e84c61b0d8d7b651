//! The `ImageStore` capability — an opaque external collaborator.
//!
//! Image storage failures are never fatal to the enclosing person operation:
//! `store` degrades to `None` (logged by the implementation) and `delete`
//! must ignore URLs it does not recognise as its own.

use std::future::Future;

/// Abstraction over wherever profile images live (local disk, a CDN, …).
pub trait ImageStore: Send + Sync {
  /// Persist raw image bytes and return a URL for them, or `None` on
  /// failure. `extension` is a file-type hint like `"png"`.
  fn store(
    &self,
    bytes: Vec<u8>,
    extension: &str,
  ) -> impl Future<Output = Option<String>> + Send + '_;

  /// Remove a previously stored image. Must be a no-op for URLs that do not
  /// belong to this store (e.g. externally hosted images).
  fn delete<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = ()> + Send + 'a;
}
