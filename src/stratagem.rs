//! Stratagem records: a display name plus the directional key sequence that calls it in.
//! Loaded once from the JSON data file; the caller is expected to have sorted it already.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::keymap;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Stratagem {
    pub name: String,
    /// Each character is one key symbol (`w`, `a`, `s`, `d`).
    pub sequence: String,
}

impl Stratagem {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Stratagem {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.sequence.chars()
    }
}

/// Reads the stratagem list. Any failure here aborts the run.
pub fn load_stratagems(path: &Path) -> Result<Vec<Stratagem>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stratagem data: {}", path.display()))?;
    parse_stratagems(&text).with_context(|| format!("Malformed stratagem data: {}", path.display()))
}

pub fn parse_stratagems(text: &str) -> Result<Vec<Stratagem>> {
    let stratagems: Vec<Stratagem> = serde_json::from_str(text)?;
    Ok(stratagems)
}

/// Strict mode check: every symbol must have a keycode.
pub fn ensure_known_symbols(stratagems: &[Stratagem]) -> Result<()> {
    for stratagem in stratagems {
        if let Some(symbol) = stratagem.symbols().find(|c| keymap::key_code(*c).is_none()) {
            bail!(
                "Stratagem '{}' uses key symbol '{}' which has no keycode (sequence: '{}')",
                stratagem.name,
                symbol,
                stratagem.sequence
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_preserves_order() {
        let text = r#"[
            {"name": "Reinforce", "sequence": "wsdaw"},
            {"name": "Eagle Strafing Run", "sequence": "wdd"}
        ]"#;
        let stratagems = parse_stratagems(text).unwrap();
        assert_eq!(stratagems.len(), 2);
        assert_eq!(stratagems[0], Stratagem::new("Reinforce", "wsdaw"));
        assert_eq!(stratagems[1].name, "Eagle Strafing Run");
        assert_eq!(stratagems[1].symbols().collect::<Vec<_>>(), vec!['w', 'd', 'd']);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_stratagems("{not json").is_err());
        assert!(parse_stratagems(r#"[{"name": "No sequence"}]"#).is_err());
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let temp = TempDir::new().expect("temp dir");
        let err = load_stratagems(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read stratagem data"));
    }

    #[test]
    fn test_load_reads_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("data.json");
        fs::write(&path, r#"[{"name": "Resupply", "sequence": "sswd"}]"#).expect("write data");
        let stratagems = load_stratagems(&path).unwrap();
        assert_eq!(stratagems, vec![Stratagem::new("Resupply", "sswd")]);
    }

    #[test]
    fn test_strict_check_flags_unknown_symbol() {
        let ok = vec![Stratagem::new("Resupply", "sswd")];
        assert!(ensure_known_symbols(&ok).is_ok());

        let bad = vec![Stratagem::new("Odd", "wq")];
        let err = ensure_known_symbols(&bad).unwrap_err();
        assert!(err.to_string().contains("'q'"));
    }
}
