//! Combination rule tables.
//!
//! Rules are authored as TOML, one table per first parent:
//!
//! ```toml
//! [Joy]
//! Anger = "Pride"
//! "Nervous Excitement" = "Thrill"
//!
//! [Pride]
//! Joy = "Triumph"
//! ```
//!
//! File order is significant: the builder applies rules exactly in the
//! order they are written, and a later rule for an already-used pair wins.

use std::path::Path;

use crate::error::{EmocraftError, Result};

/// The rule table shipped with the crate.
const EMBEDDED_RULES: &str = include_str!("../data/combinations.toml");

/// One authored rule: `first + second → child`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Parent whose table the rule appears under.
    pub first: String,
    /// The other parent.
    pub second: String,
    /// Resulting emotion.
    pub child: String,
}

impl Rule {
    /// Create a rule.
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            child: child.into(),
        }
    }

    /// `X + X → X`, which is a configuration slip rather than a rule.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second && self.second == self.child
    }
}

/// Ordered list of combination rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Parse a rule table from TOML.
    ///
    /// # Errors
    /// Returns [`EmocraftError::RuleTable`] if the TOML is invalid, a top-level
    /// entry is not a table, a value is not a string, or a name is empty.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(toml_str).map_err(|e| EmocraftError::RuleTable(e.to_string()))?;

        let mut rules = Vec::new();
        for (first, combos) in &table {
            let combos = combos.as_table().ok_or_else(|| {
                EmocraftError::RuleTable(format!("[{first}] must be a table of combinations"))
            })?;
            for (second, child) in combos {
                let child = child.as_str().ok_or_else(|| {
                    EmocraftError::RuleTable(format!("{first} + {second} must map to a string"))
                })?;
                if first.is_empty() || second.is_empty() || child.is_empty() {
                    return Err(EmocraftError::RuleTable(format!(
                        "empty emotion name in rule {first:?} + {second:?} = {child:?}"
                    )));
                }
                rules.push(Rule::new(first.as_str(), second.as_str(), child));
            }
        }
        Ok(Self { rules })
    }

    /// Load a rule table from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The rule table compiled into the crate.
    ///
    /// # Errors
    /// Returns [`EmocraftError::RuleTable`] if the embedded data is malformed.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_RULES)
    }

    /// Build a table directly from `(first, second, child)` triples.
    pub fn from_rules<I, A, B, C>(rules: I) -> Self
    where
        I: IntoIterator<Item = (A, B, C)>,
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(a, b, c)| Rule::new(a, b, c))
                .collect(),
        }
    }

    /// Rules in authored order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_authored_order() {
        let table = RuleTable::from_toml(
            r#"
            [Pride]
            Joy = "Triumph"

            [Joy]
            Anger = "Pride"
            "Nervous Excitement" = "Thrill"
            "#,
        )
        .expect("valid toml");

        let triples: Vec<_> = table
            .rules()
            .iter()
            .map(|r| (r.first.as_str(), r.second.as_str(), r.child.as_str()))
            .collect();
        assert_eq!(
            triples,
            vec![
                ("Pride", "Joy", "Triumph"),
                ("Joy", "Anger", "Pride"),
                ("Joy", "Nervous Excitement", "Thrill"),
            ]
        );
    }

    #[test]
    fn rejects_non_table_entries() {
        let err = RuleTable::from_toml(r#"Joy = "Pride""#);
        assert!(matches!(err, Err(EmocraftError::RuleTable(_))));
    }

    #[test]
    fn rejects_non_string_children() {
        let err = RuleTable::from_toml("[Joy]\nAnger = 3\n");
        assert!(matches!(err, Err(EmocraftError::RuleTable(_))));
    }

    #[test]
    fn rejects_empty_names() {
        let err = RuleTable::from_toml("[Joy]\nAnger = \"\"\n");
        assert!(matches!(err, Err(EmocraftError::RuleTable(_))));
    }

    #[test]
    fn embedded_table_loads() {
        let table = RuleTable::embedded().expect("embedded rules parse");
        assert!(table.len() > 500);
        assert!(
            table
                .rules()
                .iter()
                .any(|r| r.first == "Joy" && r.second == "Anger" && r.child == "Pride")
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "[Joy]\nAnger = \"Pride\"\n").expect("write rules");
        let table = RuleTable::from_file(&path).expect("load rules");
        assert_eq!(table.rules(), &[Rule::new("Joy", "Anger", "Pride")]);
    }

    #[test]
    fn degenerate_rules() {
        assert!(Rule::new("Joy", "Joy", "Joy").is_degenerate());
        assert!(!Rule::new("Joy", "Joy", "Elation").is_degenerate());
    }
}
