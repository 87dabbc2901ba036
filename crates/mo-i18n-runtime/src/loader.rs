use std::fs;
use std::path::{Path, PathBuf};

use mo_i18n_core::Catalog;

use crate::error::{RuntimeError, RuntimeResult};

/// Catalog file name fixed by the reference layout.
const CATALOG_FILE: &str = "messages.mo";

/// Resolves the catalog file for a locale under `base`:
/// `base/<locale>.utf8/LC_MESSAGES/messages.mo`. The scheme is fixed,
/// not configurable per call.
pub fn catalog_path(base: &Path, locale: &str) -> PathBuf {
    base.join(format!("{locale}.utf8"))
        .join("LC_MESSAGES")
        .join(CATALOG_FILE)
}

/// Reads and decodes one catalog file. The file is read in a single
/// pass; the handle is scoped to the read and released on every exit
/// path.
pub fn load_catalog(path: &Path) -> RuntimeResult<Catalog> {
    if !path.is_file() {
        return Err(RuntimeError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(Catalog::decode(&bytes)?)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{catalog_path, load_catalog};
    use crate::error::RuntimeError;

    #[test]
    fn builds_fixed_catalog_path() {
        let path = catalog_path(Path::new("/srv/locale"), "bg_BG");
        assert_eq!(
            path,
            Path::new("/srv/locale/bg_BG.utf8/LC_MESSAGES/messages.mo")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_catalog(Path::new("/nonexistent/messages.mo")).expect_err("missing");
        assert!(matches!(err, RuntimeError::NotFound(_)));
    }
}
