#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod catalog;
mod error;
mod mo;
mod plural;

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult};
pub use mo::{
    HEADER_LEN, MIN_FILE_LEN, MO_MAGIC, MoHeader, OffsetEntry, parse_header, parse_offset_table,
    read_entry,
};
pub use plural::{BinaryOp, PluralExpr, UnaryOp, parse_plural_forms};
