use std::path::Path;

use crate::error::RuntimeResult;

/// Capability surface of a translation backend.
///
/// The reference system ships two implementations behind this seam: a
/// binary-catalog driver ([`MoDriver`](crate::MoDriver)) and a driver
/// delegating to the host's own translation facility. Callers hold a
/// `dyn Driver` and never depend on which one answers.
pub trait Driver {
    /// Switches the active locale for subsequent lookups.
    fn set_locale(&mut self, locale: &str);

    /// The active locale.
    fn locale(&self) -> &str;

    /// Sets the root directory the per-locale catalogs live under.
    ///
    /// The directory is not validated. A path that does not exist
    /// makes every locale resolve to an empty catalog, the same as a
    /// missing catalog file.
    fn set_path(&mut self, dir: &Path);

    /// Translates `message`, returning it unchanged when the active
    /// locale has no translation for it.
    fn lookup(&self, message: &str) -> RuntimeResult<String>;

    /// Translates a count-dependent message, selecting the plural form
    /// the locale's rule picks for `n`.
    fn lookup_plural(&self, singular: &str, plural: &str, n: i64) -> RuntimeResult<String>;

    /// Reads a catalog header field for `locale`, or `default` when the
    /// catalog does not carry it.
    fn metadata(&self, locale: &str, name: &str, default: &str) -> RuntimeResult<String>;
}
