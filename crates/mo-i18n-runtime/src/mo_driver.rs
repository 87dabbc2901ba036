use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mo_i18n_core::Catalog;

use crate::config::Config;
use crate::driver::Driver;
use crate::error::{RuntimeError, RuntimeResult};
use crate::loader::{catalog_path, load_catalog};

/// Binary-catalog driver with a per-locale catalog cache.
///
/// A locale's catalog is built on its first lookup and stays resident
/// for the driver's lifetime; the backing file is never re-read, even
/// if it changes on disk. Callers that need fresh data build a new
/// driver. A missing file caches an empty catalog, so every later
/// lookup for that locale is an instant identity fallback.
pub struct MoDriver {
    base_path: PathBuf,
    locale: String,
    catalogs: Mutex<BTreeMap<String, Arc<Catalog>>>,
}

impl MoDriver {
    pub fn new(base_path: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            locale: locale.into(),
            catalogs: Mutex::new(BTreeMap::new()),
        }
    }

    /// Builds a driver from a loaded [`Config`], defaulting the locale
    /// from the process environment when the config leaves it unset.
    pub fn from_config(config: &Config) -> Self {
        let locale = config
            .locale
            .clone()
            .unwrap_or_else(crate::config::system_locale);
        Self::new(config.path.clone(), locale)
    }

    /// Returns the cached catalog for `locale`, building it on the
    /// first request. The map lock is held across the fill, so at most
    /// one parse runs at a time and concurrent callers see either
    /// nothing or a completed catalog.
    ///
    /// A file that exists but fails to decode surfaces its structural
    /// error to this first caller; an empty catalog is cached in its
    /// place, so subsequent lookups degrade to identity rather than
    /// re-reading a file known to be bad.
    fn catalog_for(&self, locale: &str) -> RuntimeResult<Arc<Catalog>> {
        let mut catalogs = self
            .catalogs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(catalog) = catalogs.get(locale) {
            return Ok(Arc::clone(catalog));
        }

        let path = catalog_path(&self.base_path, locale);
        let built = match load_catalog(&path) {
            Ok(catalog) => Ok(catalog),
            Err(RuntimeError::NotFound(_)) => Ok(Catalog::empty()),
            Err(err) => Err(err),
        };
        match built {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                catalogs.insert(locale.to_string(), Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(err) => {
                catalogs.insert(locale.to_string(), Arc::new(Catalog::empty()));
                Err(err)
            }
        }
    }
}

impl Driver for MoDriver {
    fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_string();
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn set_path(&mut self, dir: &Path) {
        self.base_path = dir.to_path_buf();
    }

    fn lookup(&self, message: &str) -> RuntimeResult<String> {
        let catalog = self.catalog_for(&self.locale)?;
        Ok(catalog.lookup(message).to_string())
    }

    fn lookup_plural(&self, singular: &str, plural: &str, n: i64) -> RuntimeResult<String> {
        let catalog = self.catalog_for(&self.locale)?;
        Ok(catalog.lookup_plural(singular, plural, n).to_string())
    }

    fn metadata(&self, locale: &str, name: &str, default: &str) -> RuntimeResult<String> {
        let catalog = self.catalog_for(locale)?;
        Ok(catalog.metadata(name).unwrap_or(default).to_string())
    }
}
