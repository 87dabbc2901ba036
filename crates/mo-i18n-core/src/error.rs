use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The catalog input had no bytes at all.
    Empty,
    /// The catalog input was shorter than the minimum viable file.
    TooSmall(usize),
    /// The magic word did not match the catalog format.
    BadMagic(u32),
    /// An offset table or entry pointed outside the input.
    BadOffset(u32),
    /// A plural-rule declaration did not follow the rule grammar.
    BadPluralRule(&'static str),
    /// A plural rule divided by zero during evaluation.
    DivisionByZero,
}

pub type CoreResult<T> = Result<T, CoreError>;

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Empty => write!(f, "catalog is empty"),
            CoreError::TooSmall(len) => write!(f, "catalog too small: {len} bytes"),
            CoreError::BadMagic(magic) => write!(f, "bad catalog magic: {magic:#010x}"),
            CoreError::BadOffset(offset) => write!(f, "offset out of bounds: {offset}"),
            CoreError::BadPluralRule(message) => write!(f, "bad plural rule: {message}"),
            CoreError::DivisionByZero => write!(f, "plural rule divided by zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
