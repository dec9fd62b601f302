//! Filesystem helpers built on `cap-std` and `camino`.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

use crate::CliError;

/// Open a UTF-8 file path for reading using ambient authority.
pub(crate) fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create (or truncate) the file at `path` inside its existing parent.
pub(crate) fn create_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    let (dir, name) = open_parent(path)?;
    dir.create(name)
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_database(path: &Utf8Path) -> Result<(), CliError> {
    let is_file = open_parent(path).and_then(|(dir, name)| dir.metadata(name));
    match is_file {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(CliError::DatabaseNotFile {
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingDatabase {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectDatabase {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}
