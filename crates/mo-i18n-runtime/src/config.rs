use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RuntimeResult;

/// Driver configuration: where the catalogs live and, optionally, the
/// starting locale. An unset locale falls back to the process
/// environment, mirroring the reference constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Config {
    pub fn from_file(path: &Path) -> RuntimeResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Locale taken from the environment in POSIX precedence order:
/// `LC_ALL`, `LC_MESSAGES`, `LANG`, then `"C"`. A charset suffix such
/// as `.UTF-8` is stripped since the catalog layout appends its own.
pub fn system_locale() -> String {
    locale_from(|name| std::env::var(name).ok())
}

fn locale_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    for name in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Some(value) = lookup(name) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                let locale = match trimmed.split_once('.') {
                    Some((locale, _charset)) => locale,
                    None => trimmed,
                };
                return locale.to_string();
            }
        }
    }
    String::from("C")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{Config, locale_from};

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("mo_i18n_config_{nanos}"));
        fs::create_dir_all(&path).expect("dir");
        path
    }

    #[test]
    fn loads_config_from_json() {
        let root = temp_dir();
        let file = root.join("i18n.json");
        fs::write(&file, r#"{"path": "/srv/locale", "locale": "bg_BG"}"#).expect("write");

        let config = Config::from_file(&file).expect("config");
        assert_eq!(config.path, PathBuf::from("/srv/locale"));
        assert_eq!(config.locale.as_deref(), Some("bg_BG"));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn locale_is_optional() {
        let root = temp_dir();
        let file = root.join("i18n.json");
        fs::write(&file, r#"{"path": "/srv/locale"}"#).expect("write");

        let config = Config::from_file(&file).expect("config");
        assert_eq!(config.locale, None);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn rejects_malformed_json() {
        let root = temp_dir();
        let file = root.join("i18n.json");
        fs::write(&file, "{not json").expect("write");
        assert!(Config::from_file(&file).is_err());
        fs::remove_dir_all(&root).ok();
    }

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| String::from(*value))
        }
    }

    #[test]
    fn lc_all_takes_precedence() {
        let locale = locale_from(env(&[
            ("LC_ALL", "bg_BG"),
            ("LC_MESSAGES", "de_DE"),
            ("LANG", "fr_FR"),
        ]));
        assert_eq!(locale, "bg_BG");
    }

    #[test]
    fn lc_messages_beats_lang() {
        let locale = locale_from(env(&[("LC_MESSAGES", "de_DE"), ("LANG", "fr_FR")]));
        assert_eq!(locale, "de_DE");
    }

    #[test]
    fn lang_is_the_last_variable_tried() {
        let locale = locale_from(env(&[("LANG", "fr_FR")]));
        assert_eq!(locale, "fr_FR");
    }

    #[test]
    fn charset_suffix_is_stripped() {
        let locale = locale_from(env(&[("LC_ALL", "bg_BG.UTF-8")]));
        assert_eq!(locale, "bg_BG");
    }

    #[test]
    fn blank_values_fall_through() {
        let locale = locale_from(env(&[("LC_ALL", "  "), ("LANG", "fr_FR")]));
        assert_eq!(locale, "fr_FR");
    }

    #[test]
    fn unset_environment_defaults_to_c() {
        assert_eq!(locale_from(env(&[])), "C");
    }
}
