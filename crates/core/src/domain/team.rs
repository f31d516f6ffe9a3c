use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::leave::EmployeeId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLeave {
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl MemberLeave {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Snapshot of a team's staffing situation, taken by the caller immediately
/// before evaluation. Never cached across calls; concurrent approvals make a
/// stale snapshot worthless.
///
/// `min_coverage_required` and `max_concurrent_leave` override the catalog
/// fallbacks when set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    pub team_size: u32,
    pub members_on_leave: Vec<MemberLeave>,
    pub min_coverage_required: Option<u32>,
    pub max_concurrent_leave: Option<u32>,
    pub blackout_dates: BTreeSet<NaiveDate>,
}

impl TeamState {
    /// Members already approved for leave covering the given date.
    pub fn on_leave_count(&self, date: NaiveDate) -> u32 {
        self.members_on_leave.iter().filter(|member| member.covers(date)).count() as u32
    }

    pub fn available_on(&self, date: NaiveDate) -> u32 {
        self.team_size.saturating_sub(self.on_leave_count(date))
    }

    pub fn is_blackout(&self, date: NaiveDate) -> bool {
        self.blackout_dates.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::{MemberLeave, TeamState};
    use crate::domain::leave::EmployeeId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn on_leave_count_is_per_date() {
        let team = TeamState {
            team_size: 6,
            members_on_leave: vec![
                MemberLeave {
                    employee_id: EmployeeId("emp-002".to_string()),
                    start_date: date(2026, 4, 6),
                    end_date: date(2026, 4, 8),
                },
                MemberLeave {
                    employee_id: EmployeeId("emp-003".to_string()),
                    start_date: date(2026, 4, 8),
                    end_date: date(2026, 4, 10),
                },
            ],
            min_coverage_required: Some(3),
            max_concurrent_leave: Some(2),
            blackout_dates: BTreeSet::new(),
        };

        assert_eq!(team.on_leave_count(date(2026, 4, 6)), 1);
        assert_eq!(team.on_leave_count(date(2026, 4, 8)), 2);
        assert_eq!(team.available_on(date(2026, 4, 8)), 4);
        assert_eq!(team.on_leave_count(date(2026, 4, 11)), 0);
    }
}
