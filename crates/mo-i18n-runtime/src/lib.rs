#![forbid(unsafe_code)]

mod config;
mod driver;
mod error;
mod loader;
mod mo_driver;

pub use crate::config::{Config, system_locale};
pub use crate::driver::Driver;
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::loader::{catalog_path, load_catalog};
pub use crate::mo_driver::MoDriver;

pub use mo_i18n_core::{Catalog, CoreError, PluralExpr};
