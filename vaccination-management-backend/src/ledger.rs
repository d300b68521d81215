//! Dose administration decisions and roster classification.
//!
//! Everything here is pure; the route handlers feed it the hospital's
//! remaining quantity and the raw form fields and act on the verdict.

use chrono::NaiveDate;

/// Verdict for one dose-administration submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseDecision {
    Administer {
        first: NaiveDate,
        second: Option<NaiveDate>,
    },
    Reject,
}

fn parse_dose(field: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    if field.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(field, "%Y-%m-%d").map(Some)
}

/// Decides whether the submitted dose dates may be applied.
///
/// A first dose must be present and the hospital must have at least one dose
/// left; a second dose is only accepted together with a first dose it does
/// not precede. The quantity acts as a gate here; recording a supply is the
/// only operation that changes the counter.
#[must_use]
pub fn decide(remaining_quantity: i32, first_field: &str, second_field: &str) -> DoseDecision {
    let (Ok(first), Ok(second)) = (parse_dose(first_field), parse_dose(second_field)) else {
        return DoseDecision::Reject;
    };
    let Some(first) = first else {
        return DoseDecision::Reject;
    };
    if remaining_quantity < 1 {
        return DoseDecision::Reject;
    }
    if second.is_some_and(|second| second < first) {
        return DoseDecision::Reject;
    }
    DoseDecision::Administer { first, second }
}

/// Dose progress of one assignment, keyed on which dose dates are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseStatus {
    NoDose,
    OneDose,
    BothDoses,
}

impl DoseStatus {
    #[must_use]
    pub fn classify(first: Option<NaiveDate>, second: Option<NaiveDate>) -> Self {
        match (first, second) {
            (Some(_), Some(_)) => Self::BothDoses,
            (Some(_), None) => Self::OneDose,
            // without a first dose the assignment counts as unvaccinated
            (None, _) => Self::NoDose,
        }
    }
}

/// Which slice of the roster a hospital page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFilter {
    All,
    NoDose,
    OneDose,
    BothDoses,
}

impl RosterFilter {
    #[must_use]
    pub fn matches(self, status: DoseStatus) -> bool {
        match self {
            Self::All => true,
            Self::NoDose => status == DoseStatus::NoDose,
            Self::OneDose => status == DoseStatus::OneDose,
            Self::BothDoses => status == DoseStatus::BothDoses,
        }
    }

    /// Heading rendered above the filtered roster.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::All => "All records",
            Self::NoDose => "No dose administered",
            Self::OneDose => "One dose administered",
            Self::BothDoses => "Both dose administered",
        }
    }
}

/// Integer percentage, truncating like the statistics reports always have.
#[must_use]
pub fn percentage(part: i64, total: i64) -> i64 {
    if total == 0 {
        0
    } else {
        part * 100 / total
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{decide, percentage, DoseDecision, DoseStatus, RosterFilter};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn first_dose_with_stock_is_administered() {
        assert_eq!(
            decide(1, "2024-03-01", ""),
            DoseDecision::Administer {
                first: date("2024-03-01"),
                second: None,
            }
        );
    }

    #[test]
    fn both_doses_with_stock_are_administered() {
        assert_eq!(
            decide(5, "2024-03-01", "2024-04-01"),
            DoseDecision::Administer {
                first: date("2024-03-01"),
                second: Some(date("2024-04-01")),
            }
        );
    }

    #[test]
    fn same_day_second_dose_is_allowed() {
        assert_eq!(
            decide(1, "2024-03-01", "2024-03-01"),
            DoseDecision::Administer {
                first: date("2024-03-01"),
                second: Some(date("2024-03-01")),
            }
        );
    }

    #[test]
    fn empty_stock_rejects() {
        assert_eq!(decide(0, "2024-03-01", ""), DoseDecision::Reject);
        assert_eq!(decide(-3, "2024-03-01", "2024-04-01"), DoseDecision::Reject);
    }

    #[test]
    fn missing_first_dose_rejects_even_with_stock() {
        assert_eq!(decide(10, "", ""), DoseDecision::Reject);
        assert_eq!(decide(10, "", "2024-04-01"), DoseDecision::Reject);
    }

    #[test]
    fn second_dose_before_the_first_rejects() {
        assert_eq!(decide(10, "2024-03-01", "2024-02-01"), DoseDecision::Reject);
    }

    #[test]
    fn unparsable_dates_reject() {
        assert_eq!(decide(10, "yesterday", ""), DoseDecision::Reject);
        assert_eq!(decide(10, "2024-03-01", "soon"), DoseDecision::Reject);
    }

    #[test]
    fn statuses_partition_every_dose_combination() {
        let d = Some(date("2024-03-01"));
        let combinations = [
            ((None, None), DoseStatus::NoDose),
            ((d, None), DoseStatus::OneDose),
            ((d, d), DoseStatus::BothDoses),
            ((None, d), DoseStatus::NoDose),
        ];
        for ((first, second), expected) in combinations {
            let status = DoseStatus::classify(first, second);
            assert_eq!(status, expected);
            // exactly one non-All filter claims the row, and All always does
            let claims = [
                RosterFilter::NoDose,
                RosterFilter::OneDose,
                RosterFilter::BothDoses,
            ]
            .into_iter()
            .filter(|filter| filter.matches(status))
            .count();
            assert_eq!(claims, 1);
            assert!(RosterFilter::All.matches(status));
        }
    }

    #[test]
    fn percentages_truncate_and_survive_an_empty_total() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(0, 0), 0);
    }
}
