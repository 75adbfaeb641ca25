//! Archive signature test used during boundary detection.

use crate::error::{FsError, Result};
use crate::vfs::Vfs;
use log::trace;

/// Check that the content at `selector` opens as a ZIP archive.
///
/// The end of central directory record decides, not the first bytes, so
/// archives with leading data (self-extracting stubs, shell wrappers) are
/// accepted.
pub fn check_zip_archive<V: Vfs + ?Sized>(vfs: &V, selector: &str) -> Result<()> {
    let stream = vfs.open(selector)?;
    zip::ZipArchive::new(stream).map_err(|_| FsError::Format(selector.to_string()))?;
    Ok(())
}

/// Whether the content at `selector` is a ZIP archive. Failures of any kind
/// are reported as `false`.
pub fn is_zip_archive<V: Vfs + ?Sized>(vfs: &V, selector: &str) -> bool {
    match check_zip_archive(vfs, selector) {
        Ok(()) => true,
        Err(e) => {
            trace!("{} rejected as archive: {}", selector, e);
            false
        }
    }
}
