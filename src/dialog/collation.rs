//! Alias collation for fuzzy token equality

use std::collections::HashMap;

/// Immutable alias → canonical mapping owned by one machine type.
///
/// Lookups are case-insensitive and one level deep: an alias never resolves
/// through another alias.
#[derive(Debug, Clone, Default)]
pub struct Collation {
    aliases: HashMap<String, String>,
}

impl Collation {
    /// Build from `(canonical, aliases)` pairs.
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        let mut aliases = HashMap::new();
        for (canonical, names) in entries {
            let canonical = canonical.to_lowercase();
            for alias in *names {
                aliases.insert(alias.to_lowercase(), canonical.clone());
            }
        }
        Self { aliases }
    }

    /// Case-folded canonical form of `token`
    pub fn canonical(&self, token: &str) -> String {
        let folded = token.to_lowercase();
        match self.aliases.get(&folded) {
            Some(canonical) => canonical.clone(),
            None => folded,
        }
    }

    pub fn similar(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }
}
