use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::plural::{PluralExpr, parse_plural_forms};
use crate::{CoreResult, parse_header, parse_offset_table, read_entry};

/// Metadata field carrying the plural-rule declaration.
const PLURAL_FORMS_FIELD: &str = "Plural-Forms";

/// A decoded catalog for one locale: message key to ordered plural
/// forms, the `Key: Value` header fields, and the plural rule in force.
///
/// Immutable after decoding, so a shared reference is safe to query
/// from any number of threads.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: BTreeMap<String, Vec<String>>,
    metadata: BTreeMap<String, String>,
    rule: PluralExpr,
}

impl Catalog {
    /// A catalog with no translations and the default two-form rule.
    /// Every lookup through it is an identity fallback.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            metadata: BTreeMap::new(),
            rule: PluralExpr::default_rule(),
        }
    }

    /// Decodes a whole catalog from its binary file contents.
    ///
    /// The original entry may carry context segments after the first
    /// NUL; only the first segment becomes the lookup key, matching the
    /// reference decoder. A malformed `Plural-Forms` declaration does
    /// not fail the catalog, it falls back to the default rule.
    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let header = parse_header(bytes)?;
        let trans_table = parse_offset_table(bytes, header.trans_offset, header.count)?;
        let orig_table = parse_offset_table(bytes, header.orig_offset, header.count)?;

        let mut entries = BTreeMap::new();
        for (orig_entry, trans_entry) in orig_table.into_iter().zip(trans_table) {
            let orig = read_entry(bytes, orig_entry)?;
            let trans = read_entry(bytes, trans_entry)?;
            let key = match orig.split(|byte| *byte == 0).next() {
                Some(first) => decode_text(first),
                None => String::new(),
            };
            let forms: Vec<String> = trans.split(|byte| *byte == 0).map(decode_text).collect();
            entries.insert(key, forms);
        }

        let metadata = match entries.remove("") {
            Some(forms) => parse_metadata(forms.first().map(String::as_str).unwrap_or("")),
            None => BTreeMap::new(),
        };

        let rule = metadata
            .get(PLURAL_FORMS_FIELD)
            .and_then(|value| parse_plural_forms(value).ok())
            .unwrap_or_else(PluralExpr::default_rule);

        Ok(Self {
            entries,
            metadata,
            rule,
        })
    }

    /// Returns the primary translation for `message`, or `message`
    /// itself when the catalog has no non-empty translation for it.
    pub fn lookup<'a>(&'a self, message: &'a str) -> &'a str {
        match self.entries.get(message).and_then(|forms| forms.first()) {
            Some(form) if !form.is_empty() => form,
            _ => message,
        }
    }

    /// Returns the plural form selected by the catalog's rule for `n`.
    ///
    /// Preference order: the non-empty form at the rule-selected index,
    /// then the non-empty form at index 0, then `singular` when
    /// `n == 1` and `plural` otherwise. Never fails; a rule that
    /// evaluates to an error or a negative index degrades to the
    /// default two-form choice.
    pub fn lookup_plural<'a>(&'a self, singular: &'a str, plural: &'a str, n: i64) -> &'a str {
        let index = match self.rule.eval(n) {
            Ok(index) if index >= 0 => index as usize,
            _ => usize::from(n != 1),
        };

        if let Some(forms) = self.entries.get(singular) {
            if let Some(form) = forms.get(index) {
                if !form.is_empty() {
                    return form;
                }
            }
            if let Some(form) = forms.first() {
                if !form.is_empty() {
                    return form;
                }
            }
        }

        if n == 1 { singular } else { plural }
    }

    /// Reads a header field such as `Language` or `Plural-Forms`.
    pub fn metadata(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    pub fn rule(&self) -> &PluralExpr {
        &self.rule
    }

    /// Number of translatable messages (the header entry excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Catalog payloads are conventionally UTF-8 but never validated by the
/// reference decoder; undecodable bytes are replaced rather than
/// rejected.
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parses the `"Name: Value"` lines of the empty-key header entry.
/// Blank lines are skipped; a line without a colon stores an empty
/// value under the whole trimmed line.
fn parse_metadata(block: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    for line in block.lines() {
        if line.is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                metadata.insert(name.trim().to_string(), value.trim().to_string());
            }
            None => {
                metadata.insert(line.trim().to_string(), String::new());
            }
        }
    }
    metadata
}
