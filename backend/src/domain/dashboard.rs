//! Aggregate complaint statistics for government users.
//!
//! Built from a full collection scan. Fine at small-to-medium scale; a larger
//! deployment would maintain these counts incrementally instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ComplaintDocument, ComplaintStatus};

/// Category bucket for complaints without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Complaint counts bucketed by status and category.
///
/// `by_status` always carries the `Pending`, `In Progress` and `Resolved`
/// buckets, plus one bucket per other observed status. Both bucket maps sum
/// to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of complaints scanned.
    pub total: u64,
    /// Counts keyed by status.
    pub by_status: BTreeMap<String, u64>,
    /// Counts keyed by category.
    pub by_category: BTreeMap<String, u64>,
}

impl DashboardStats {
    /// Tally a collection scan.
    ///
    /// A complaint with no status (or a blank one) is counted as `Pending`,
    /// matching what hydration will eventually write.
    ///
    /// # Examples
    /// ```
    /// use civic_backend::domain::{ComplaintDocument, DashboardStats};
    ///
    /// let stats = DashboardStats::tally(&[ComplaintDocument::default()]);
    /// assert_eq!(stats.total, 1);
    /// assert_eq!(stats.by_status["Pending"], 1);
    /// assert_eq!(stats.by_category["Uncategorized"], 1);
    /// ```
    pub fn tally(complaints: &[ComplaintDocument]) -> Self {
        let mut by_status: BTreeMap<String, u64> = [
            ComplaintStatus::PENDING,
            ComplaintStatus::IN_PROGRESS,
            ComplaintStatus::RESOLVED,
        ]
        .into_iter()
        .map(|status| (status.to_owned(), 0))
        .collect();
        let mut by_category = BTreeMap::new();

        for complaint in complaints {
            let status = complaint
                .status
                .as_ref()
                .filter(|status| !status.is_blank())
                .map_or(ComplaintStatus::PENDING, ComplaintStatus::as_str);
            *by_status.entry(status.to_owned()).or_insert(0) += 1;

            let category = complaint
                .category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .unwrap_or(UNCATEGORIZED);
            *by_category.entry(category.to_owned()).or_insert(0) += 1;
        }

        Self {
            total: complaints.len() as u64,
            by_status,
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn complaint(status: Option<&str>, category: Option<&str>) -> ComplaintDocument {
        ComplaintDocument {
            status: status.map(ComplaintStatus::new),
            category: category.map(str::to_owned),
            ..ComplaintDocument::default()
        }
    }

    #[rstest]
    fn empty_scan_keeps_fixed_buckets() {
        let stats = DashboardStats::tally(&[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_status.len(), 3);
        assert!(stats.by_status.values().all(|count| *count == 0));
        assert!(stats.by_category.is_empty());
    }

    #[rstest]
    fn unknown_statuses_get_dynamic_buckets() {
        let stats = DashboardStats::tally(&[
            complaint(Some("Pending"), Some("Roads")),
            complaint(Some("Rejected"), Some("Roads")),
            complaint(Some("Resolved"), Some("Lighting")),
            complaint(None, None),
            complaint(Some("  "), Some("")),
        ]);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_status["Pending"], 3);
        assert_eq!(stats.by_status["Rejected"], 1);
        assert_eq!(stats.by_status["Resolved"], 1);
        assert_eq!(stats.by_status["In Progress"], 0);
        assert_eq!(stats.by_category["Roads"], 2);
        assert_eq!(stats.by_category["Lighting"], 1);
        assert_eq!(stats.by_category[UNCATEGORIZED], 2);
    }

    #[rstest]
    fn bucket_sums_match_total() {
        let complaints: Vec<_> = (0..7)
            .map(|i| {
                let status = ["Pending", "In Progress", "Resolved", "Escalated"][i % 4];
                let category = ["Roads", "Water"][i % 2];
                complaint(Some(status), Some(category))
            })
            .collect();

        let stats = DashboardStats::tally(&complaints);

        assert_eq!(stats.by_status.values().sum::<u64>(), stats.total);
        assert_eq!(stats.by_category.values().sum::<u64>(), stats.total);
    }

    #[rstest]
    fn serialises_with_camel_case_keys() {
        let value = serde_json::to_value(DashboardStats::tally(&[])).expect("serialise");
        assert!(value.get("byStatus").is_some());
        assert!(value.get("byCategory").is_some());
    }
}
