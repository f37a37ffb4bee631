// Roster (the fixed pool of names allowed into the queue)

use std::collections::BTreeSet;

/// Static set of recognised names, loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: BTreeSet<String>,
}

impl Roster {
    /// Build a roster; blank names are dropped and surrounding whitespace trimmed
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_membership() {
        let roster = Roster::new(["Alice", " Bob ", "", "Alice"]);
        assert_eq!(roster.len(), 2);
        assert!(roster.contains("Alice"));
        assert!(roster.contains("Bob"));
        assert!(!roster.contains("Carol"));
        assert!(!roster.contains("alice"));
    }
}
