use std::collections::BTreeSet;
use std::fmt;

/// Stands in for "fetched fine, but no product names on the page".
pub const NO_PRODUCTS_FOUND: &str = "NO_PRODUCTS_FOUND";

/// Canonical text form of the product names seen on one check.
///
/// Either the sorted, deduplicated names joined with `\n`, or the
/// [`NO_PRODUCTS_FOUND`] sentinel. Two snapshots are equal only when their
/// text is byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn from_names(names: BTreeSet<String>) -> Self {
        if names.is_empty() {
            return Self(NO_PRODUCTS_FOUND.to_string());
        }
        Self(names.into_iter().collect::<Vec<_>>().join("\n"))
    }

    /// Wraps text read back from storage, verbatim.
    pub fn from_stored(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == NO_PRODUCTS_FOUND
    }

    /// The product names this snapshot lists. Empty for the sentinel.
    pub fn names(&self) -> BTreeSet<&str> {
        if self.is_sentinel() {
            return BTreeSet::new();
        }
        self.0.lines().filter(|line| !line.is_empty()).collect()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
