//! Namespace selector and table rows.

// ============================================================================
// Constants
// ============================================================================

/// Status shown when the backend reports none.
pub const DEFAULT_NAMESPACE_STATUS: &str = "Active";

/// Age shown when the backend reports none.
pub const DEFAULT_NAMESPACE_AGE: &str = "Unknown";

// ============================================================================
// NamespaceRow
// ============================================================================

/// One row of the namespaces table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRow {
    /// Namespace name.
    pub name: String,
    /// Phase badge text.
    pub status: String,
    /// Human readable age.
    pub age: String,
}

impl NamespaceRow {
    /// Creates a row with default status and age.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DEFAULT_NAMESPACE_STATUS.to_string(),
            age: DEFAULT_NAMESPACE_AGE.to_string(),
        }
    }
}

/// Maps namespace names to table rows, keeping backend order.
#[must_use]
pub fn namespace_rows(names: &[String]) -> Vec<NamespaceRow> {
    names.iter().map(NamespaceRow::new).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_use_defaults() {
        let rows = namespace_rows(&["default".into(), "kube-system".into()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "default");
        assert_eq!(rows[1].name, "kube-system");
        assert!(rows.iter().all(|r| r.status == "Active" && r.age == "Unknown"));
    }

    #[test]
    fn test_empty_list() {
        assert!(namespace_rows(&[]).is_empty());
    }
}
