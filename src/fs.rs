//! File system utilities.

use filetime::FileTime;
use std::fs;
use std::io;
use std::path::Path;

/// Whether `dest` must be (re)written from `source`.
///
/// True when `dest` is absent or strictly older than `source`. Equal
/// modification times count as up to date.
pub fn needs_copy(source: &Path, dest: &Path) -> io::Result<bool> {
    let dest_meta = match fs::metadata(dest) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let source_modified = fs::metadata(source)?.modified()?;

    Ok(source_modified > dest_meta.modified()?)
}

/// Copy a file and carry its access and modification times over to the copy.
pub fn copy_preserving_times(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest)?;

    let meta = fs::metadata(source)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
}
