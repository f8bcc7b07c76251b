//! Point-in-time catalog of indices and their aliases.
//!
//! Built fresh from the raw `/_aliases` listing for every retirement check;
//! the remote cluster is the source of truth, so a catalog is never cached or
//! mutated in place. Filtering operations return new catalogs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// How a calendar date is embedded in an index name.
///
/// The format is a chrono strftime pattern with the fixed prefix and
/// separators as literals, e.g. `checks-%y-%m-%d` for names like
/// `checks-16-04-09`. A name that does not parse under the layout is simply
/// not a candidate for age-based operations; whether the layout describes the
/// *intended* series is entirely the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayout {
    format: String,
}

impl DateLayout {
    /// Create a layout from a strftime pattern.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The strftime pattern.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse the date embedded in `name`, if the whole name conforms.
    pub fn parse(&self, name: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(name, &self.format).ok()
    }
}

/// One index as reported by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexEntry {
    /// Aliases pointing at this index, keyed by alias name.
    #[serde(default)]
    pub aliases: HashMap<String, serde_json::Value>,
}

impl IndexEntry {
    /// Names of the aliases pointing at this index, unordered.
    pub fn alias_names(&self) -> Vec<&str> {
        self.aliases.keys().map(String::as_str).collect()
    }
}

/// Mapping from index name to [`IndexEntry`], with irrelevant iteration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IndexCatalog {
    entries: HashMap<String, IndexEntry>,
}

impl IndexCatalog {
    /// Build a catalog from a raw listing. Extra fields in the raw entries
    /// were already dropped at deserialization; unknown shapes are never an
    /// error.
    pub fn from_raw_listing(entries: HashMap<String, IndexEntry>) -> Self {
        Self { entries }
    }

    /// All index names, unordered.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// All index names, sorted. Derived name lists must not depend on map
    /// iteration order.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.names();
        names.sort();
        names
    }

    /// Number of indices in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an index by name.
    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    /// Iterate over the entries, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// New catalog containing only entries whose name parses under `layout`.
    pub fn matching(&self, layout: &DateLayout) -> IndexCatalog {
        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| layout.parse(name).is_some())
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();

        Self { entries }
    }

    /// New catalog containing only entries whose embedded date is strictly
    /// before `reference - retention_days` days.
    ///
    /// The boundary is exclusive: an index dated exactly `retention_days`
    /// days before `reference` is retained, so retention is inclusive of the
    /// boundary day. "Keep the last 7 days" therefore keeps 8 calendar days
    /// of midnight-dated indices against a midnight reference.
    pub fn matching_older_than(
        &self,
        layout: &DateLayout,
        retention_days: i64,
        reference: DateTime<Utc>,
    ) -> IndexCatalog {
        let cutoff = reference - chrono::Duration::days(retention_days);

        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| {
                layout
                    .parse(name)
                    .map(|date| date.and_time(NaiveTime::MIN).and_utc() < cutoff)
                    .unwrap_or(false)
            })
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();

        Self { entries }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) const RAW_LISTING: &str = r#"{
        ".kibana-4": { "aliases": {} },
        "logs-16-04-01": { "aliases": { "logs": {} } },
        "logs-16-04-02": { "aliases": { "logs": {} } },
        "checks-16-04-01": { "aliases": { "checks": {} } },
        "checks-16-04-02": { "aliases": { "checks": {} } },
        "checks-16-04-03": { "aliases": { "checks": {} } },
        "checks-16-04-04": { "aliases": { "checks": {} } },
        "checks-16-04-05": { "aliases": { "checks": {} } },
        "checks-16-04-06": { "aliases": { "checks": {} } },
        "checks-16-04-07": { "aliases": { "checks": {} } },
        "checks-16-04-08": { "aliases": { "checks": {} } },
        "checks-16-04-09": { "aliases": { "checks": {} } }
    }"#;

    pub(crate) fn fixture_catalog() -> IndexCatalog {
        serde_json::from_str(RAW_LISTING).unwrap()
    }

    /// 2016-04-09 01:00 UTC, one hour past midnight like a real cron run.
    pub(crate) fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 4, 9, 1, 0, 0).unwrap()
    }

    #[test]
    fn test_matching() {
        let catalog = fixture_catalog();
        assert_eq!(catalog.matching(&DateLayout::new("checks-%y-%m-%d")).len(), 9);
        assert_eq!(catalog.matching(&DateLayout::new("logs-%y-%m-%d")).len(), 2);
        assert_eq!(catalog.matching(&DateLayout::new("something")).len(), 0);
    }

    #[test]
    fn test_matching_excludes_non_conforming_names() {
        let catalog = fixture_catalog();
        let layout = DateLayout::new("checks-%y-%m-%d");

        let matched = catalog.matching(&layout);
        assert!(matched.get(".kibana-4").is_none());
        assert!(matched.get("logs-16-04-01").is_none());

        let aged = catalog.matching_older_than(&layout, 0, reference_time());
        assert!(aged.get(".kibana-4").is_none());
    }

    #[test]
    fn test_matching_older_than_week() {
        let catalog = fixture_catalog();
        let out = catalog.matching_older_than(
            &DateLayout::new("checks-%y-%m-%d"),
            7,
            reference_time(),
        );
        assert_eq!(
            out.sorted_names(),
            vec!["checks-16-04-01", "checks-16-04-02"]
        );
    }

    #[test]
    fn test_matching_older_than_day() {
        let catalog = fixture_catalog();
        let out = catalog.matching_older_than(
            &DateLayout::new("checks-%y-%m-%d"),
            1,
            reference_time(),
        );
        assert_eq!(
            out.sorted_names(),
            vec![
                "checks-16-04-01",
                "checks-16-04-02",
                "checks-16-04-03",
                "checks-16-04-04",
                "checks-16-04-05",
                "checks-16-04-06",
                "checks-16-04-07",
                "checks-16-04-08",
            ]
        );
    }

    #[test]
    fn test_matching_older_than_two_days() {
        let catalog = fixture_catalog();
        let out = catalog.matching_older_than(
            &DateLayout::new("checks-%y-%m-%d"),
            2,
            reference_time(),
        );
        assert_eq!(
            out.sorted_names(),
            vec![
                "checks-16-04-01",
                "checks-16-04-02",
                "checks-16-04-03",
                "checks-16-04-04",
                "checks-16-04-05",
                "checks-16-04-06",
                "checks-16-04-07",
            ]
        );
    }

    #[test]
    fn test_boundary_day_is_retained_at_midnight_reference() {
        let catalog = fixture_catalog();
        let midnight = Utc.with_ymd_and_hms(2016, 4, 9, 0, 0, 0).unwrap();
        let out = catalog.matching_older_than(
            &DateLayout::new("checks-%y-%m-%d"),
            7,
            midnight,
        );
        // 04-02 sits exactly on the cutoff and is kept.
        assert_eq!(out.sorted_names(), vec!["checks-16-04-01"]);
    }

    #[test]
    fn test_alias_names() {
        let catalog = fixture_catalog();
        let entry = catalog.get("checks-16-04-01").unwrap();
        assert_eq!(entry.alias_names(), vec!["checks"]);
        assert!(catalog.get(".kibana-4").unwrap().alias_names().is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw = r#"{ "logs-16-04-01": { "aliases": { "logs": {} }, "settings": { "shards": 5 } } }"#;
        let catalog: IndexCatalog = serde_json::from_str(raw).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
