//! Table ordering policy for truncation and insertion.
//!
//! Foreign-key constraints dictate two orders: clear children before their
//! parents, load parents before their children. The orders are data, not
//! logic — compiled-in defaults below, overridable from a YAML file:
//!
//! ```yaml
//! truncate_order:
//!   - comments
//!   - posts
//!   - users
//! insert_order:
//!   - users
//!   - posts
//!   - comments
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::parser::DumpData;

/// Default clearing order, dependents first
const DEFAULT_TRUNCATE_ORDER: &[&str] = &[
    "verdi_sync_log",
    "verdi_user_mappings",
    "verdi_shift_registry",
    "verdi_position_mappings",
    "verdi_station_config",
    "undo_history",
    "user_comments",
    "user_station_notification_preferences",
    "user_stations",
    "shift_swap_offers",
    "shift_swap_requests",
    "shift_bids",
    "shift_preferences",
    "overtime",
    "shifts",
    "push_subscriptions",
    "planning_periods",
    "password_reset_tokens",
    "calendar_tokens",
    "custom_notification_recipients",
    "custom_notifications",
    "activity_logs",
    "reportage_logs",
    "reportage_recipients",
    "reportage_config",
    "weekday_configs",
    "welcome_email_config",
    "station_settings",
    "holidays",
    "system_settings",
    "users",
    "stations",
];

/// Default loading order, dependencies first
const DEFAULT_INSERT_ORDER: &[&str] = &[
    "stations",
    "users",
    "system_settings",
    "holidays",
    "station_settings",
    "weekday_configs",
    "welcome_email_config",
    "reportage_config",
    "reportage_recipients",
    "reportage_logs",
    "calendar_tokens",
    "custom_notifications",
    "custom_notification_recipients",
    "password_reset_tokens",
    "planning_periods",
    "push_subscriptions",
    "shifts",
    "overtime",
    "shift_preferences",
    "shift_bids",
    "shift_swap_requests",
    "shift_swap_offers",
    "user_stations",
    "user_station_notification_preferences",
    "user_comments",
    "undo_history",
    "verdi_station_config",
    "verdi_position_mappings",
    "verdi_shift_registry",
    "verdi_user_mappings",
    "verdi_sync_log",
    "activity_logs",
];

/// The two FK-dependency orders used when assembling the script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOrdering {
    /// Truncation order, children before parents
    pub truncate_order: Vec<String>,
    /// Insertion order, parents before children
    pub insert_order: Vec<String>,
}

impl Default for TableOrdering {
    fn default() -> Self {
        Self {
            truncate_order: DEFAULT_TRUNCATE_ORDER.iter().map(|s| s.to_string()).collect(),
            insert_order: DEFAULT_INSERT_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TableOrdering {
    /// Load an ordering override from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let ordering: TableOrdering = serde_yaml::from_str(&content)?;
        Ok(ordering)
    }

    /// Tables to truncate, in order.
    ///
    /// Listed tables keep list order; parsed tables missing from the list
    /// go in front of everything, so unknown tables are cleared before any
    /// known ones.
    pub fn truncation_order<'a>(&'a self, dump: &'a DumpData) -> Vec<&'a str> {
        let mut order: Vec<&str> = self
            .truncate_order
            .iter()
            .filter(|t| dump.contains(t.as_str()))
            .map(String::as_str)
            .collect();

        for table in dump.iter() {
            if !self.truncate_order.iter().any(|t| *t == table.name) {
                order.insert(0, &table.name);
            }
        }

        order
    }

    /// Tables to insert, in order.
    ///
    /// Listed tables keep list order; parsed tables missing from the list
    /// are appended at the end, in parse order.
    pub fn insertion_order<'a>(&'a self, dump: &'a DumpData) -> Vec<&'a str> {
        let mut order: Vec<&str> = self
            .insert_order
            .iter()
            .filter(|t| dump.contains(t.as_str()))
            .map(String::as_str)
            .collect();

        for table in dump.iter() {
            if !self.insert_order.iter().any(|t| *t == table.name) {
                order.push(&table.name);
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DumpParser;

    fn dump_with(tables: &[&str]) -> DumpData {
        let mut input = String::new();
        for t in tables {
            input.push_str(&format!("COPY public.{} (id) FROM stdin;\n1\n\\.\n", t));
        }
        DumpParser::parse(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_truncation_keeps_list_order() {
        let ordering = TableOrdering::default();
        let dump = dump_with(&["stations", "shifts", "users"]);

        let order = ordering.truncation_order(&dump);
        assert_eq!(order, vec!["shifts", "users", "stations"]);
    }

    #[test]
    fn test_truncation_prepends_unlisted_tables() {
        let ordering = TableOrdering::default();
        let dump = dump_with(&["users", "wildcard"]);

        let order = ordering.truncation_order(&dump);
        assert_eq!(order[0], "wildcard");
        assert!(order.contains(&"users"));
    }

    #[test]
    fn test_insertion_keeps_list_order() {
        let ordering = TableOrdering::default();
        let dump = dump_with(&["shifts", "users", "stations"]);

        let order = ordering.insertion_order(&dump);
        assert_eq!(order, vec!["stations", "users", "shifts"]);
    }

    #[test]
    fn test_insertion_appends_unlisted_tables_in_parse_order() {
        let ordering = TableOrdering::default();
        let dump = dump_with(&["zeta", "users", "alpha"]);

        let order = ordering.insertion_order(&dump);
        assert_eq!(order, vec!["users", "zeta", "alpha"]);
    }

    #[test]
    fn test_absent_tables_are_skipped() {
        let ordering = TableOrdering::default();
        let dump = dump_with(&["users"]);

        assert_eq!(ordering.truncation_order(&dump), vec!["users"]);
        assert_eq!(ordering.insertion_order(&dump), vec!["users"]);
    }

    #[test]
    fn test_yaml_override() {
        let yaml = "truncate_order:\n  - b\n  - a\ninsert_order:\n  - a\n  - b\n";
        let ordering: TableOrdering = serde_yaml::from_str(yaml).unwrap();
        let dump = dump_with(&["a", "b"]);

        assert_eq!(ordering.truncation_order(&dump), vec!["b", "a"]);
        assert_eq!(ordering.insertion_order(&dump), vec!["a", "b"]);
    }

    #[test]
    fn test_yaml_partial_override_defaults_other_list() {
        let yaml = "insert_order:\n  - only_table\n";
        let ordering: TableOrdering = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ordering.insert_order, vec!["only_table"]);
        // truncate_order falls back to the built-in list
        assert!(ordering.truncate_order.contains(&"users".to_string()));
    }
}
