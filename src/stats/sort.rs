//! Client-side sorting of user stat rows.
//!
//! Sorting operates purely on already-fetched rows and never triggers a
//! fetch. Each result table carries its own [`SortState`], discarded when a
//! new result set arrives.

use crate::models::stats::UserAttendanceStat;

/// Sortable columns of a user stats table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    TotalDays,
    TotalHours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort state for one result table: at most one active column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    /// Direction currently applied to `column`, if it is the active one.
    pub fn direction_for(&self, column: SortColumn) -> Option<SortDirection> {
        match self.active {
            Some((active, direction)) if active == column => Some(direction),
            _ => None,
        }
    }

    /// Next direction for a click on `column`.
    ///
    /// Cycles none -> asc -> desc -> asc on the active column; a click on
    /// any other column always starts ascending.
    pub fn next_direction(&self, column: SortColumn) -> SortDirection {
        match self.direction_for(column) {
            Some(SortDirection::Ascending) => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// Stable-sort `rows` by the numeric value of `column`, advancing the sort
/// cycle from `current`. Ties keep their original relative order.
///
/// Returns the reordered rows and the new state, with exactly one active
/// column (any previously active column is implicitly reset).
pub fn sort_rows(
    rows: &[UserAttendanceStat],
    column: SortColumn,
    current: &SortState,
) -> (Vec<UserAttendanceStat>, SortState) {
    let direction = current.next_direction(column);

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match column {
            SortColumn::TotalDays => a.total_days.cmp(&b.total_days),
            SortColumn::TotalHours => a.total_hours.total_cmp(&b.total_hours),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    (
        sorted,
        SortState {
            active: Some((column, direction)),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_id: &str, total_days: i64, total_hours: f64) -> UserAttendanceStat {
        UserAttendanceStat {
            user_id: user_id.to_string(),
            user_name: None,
            total_days,
            total_hours,
            last_checkin: None,
        }
    }

    fn ids(rows: &[UserAttendanceStat]) -> Vec<&str> {
        rows.iter().map(|r| r.user_id.as_str()).collect()
    }

    #[test]
    fn test_three_clicks_cycle_asc_desc_asc() {
        let rows = vec![row("A", 1, 1.0), row("B", 2, 2.0)];

        let (_, s1) = sort_rows(&rows, SortColumn::TotalDays, &SortState::default());
        assert_eq!(s1.active, Some((SortColumn::TotalDays, SortDirection::Ascending)));

        let (_, s2) = sort_rows(&rows, SortColumn::TotalDays, &s1);
        assert_eq!(s2.active, Some((SortColumn::TotalDays, SortDirection::Descending)));

        let (_, s3) = sort_rows(&rows, SortColumn::TotalDays, &s2);
        assert_eq!(s3.active, Some((SortColumn::TotalDays, SortDirection::Ascending)));
    }

    #[test]
    fn test_switching_column_starts_ascending_and_resets_previous() {
        let rows = vec![row("A", 1, 9.0), row("B", 2, 1.0)];

        let (_, days_desc) = sort_rows(
            &rows,
            SortColumn::TotalDays,
            &SortState {
                active: Some((SortColumn::TotalDays, SortDirection::Ascending)),
            },
        );
        assert_eq!(days_desc.direction_for(SortColumn::TotalDays), Some(SortDirection::Descending));

        let (_, hours) = sort_rows(&rows, SortColumn::TotalHours, &days_desc);
        assert_eq!(hours.direction_for(SortColumn::TotalHours), Some(SortDirection::Ascending));
        assert_eq!(hours.direction_for(SortColumn::TotalDays), None);
    }

    #[test]
    fn test_stable_tie_break() {
        let rows = vec![row("A", 1, 5.5), row("B", 2, 9.0), row("C", 3, 5.5)];

        let (sorted, _) = sort_rows(&rows, SortColumn::TotalHours, &SortState::default());
        assert_eq!(ids(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_descending_hours() {
        let rows = vec![row("A", 1, 5.5), row("B", 2, 9.0), row("C", 3, 5.5)];
        let asc = SortState {
            active: Some((SortColumn::TotalHours, SortDirection::Ascending)),
        };

        let (sorted, _) = sort_rows(&rows, SortColumn::TotalHours, &asc);
        assert_eq!(ids(&sorted), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_sort_is_idempotent_per_direction() {
        let rows = vec![row("B", 4, 2.0), row("A", 1, 8.0), row("C", 2, 5.0)];

        let (once, _) = sort_rows(&rows, SortColumn::TotalDays, &SortState::default());
        // Re-sorting an already ascending list ascending again keeps the order.
        let desc = SortState {
            active: Some((SortColumn::TotalDays, SortDirection::Descending)),
        };
        let (twice, _) = sort_rows(&once, SortColumn::TotalDays, &desc);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_sort_by_days() {
        let rows = vec![row("B", 4, 2.0), row("A", 1, 8.0), row("C", 2, 5.0)];

        let (sorted, _) = sort_rows(&rows, SortColumn::TotalDays, &SortState::default());
        assert_eq!(ids(&sorted), vec!["A", "C", "B"]);
    }
}
