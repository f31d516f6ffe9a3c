use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApproverId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Emergency,
    Personal,
    Maternity,
    Paternity,
    Bereavement,
    Study,
}

/// A leave request as submitted by an employee, after upstream input
/// validation. Dates are inclusive calendar dates in the org's timezone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub request_id: RequestId,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_half_day: bool,
    pub reason_text: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Inclusive calendar dates covered by the request. Empty when the
    /// date range is inverted; date-order validation rejects that case.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut cursor = self.start_date;
        while cursor <= self.end_date {
            dates.push(cursor);
            cursor += Duration::days(1);
        }
        dates
    }

    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Weekday count across the range. A weekend-only request yields zero;
    /// the working-day-span rule flags that instead of silently rounding up.
    pub fn business_days(&self) -> u32 {
        self.dates()
            .into_iter()
            .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
            .count() as u32
    }

    /// Days charged against balances and quotas. Half-day requests charge
    /// half a day regardless of span.
    pub fn charged_days(&self) -> Decimal {
        if self.is_half_day {
            Decimal::new(5, 1)
        } else {
            Decimal::from(self.business_days().max(1))
        }
    }
}

/// Point-in-time read model for the requesting employee, supplied by the
/// caller on every evaluation. The engine never mutates balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    pub employee_id: EmployeeId,
    pub balances: BTreeMap<LeaveType, Decimal>,
    pub tenure_months: u32,
    pub days_taken_this_month: Decimal,
}

impl EmployeeSnapshot {
    pub fn balance_for(&self, leave_type: LeaveType) -> Option<Decimal> {
        self.balances.get(&leave_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::{EmployeeId, LeaveRequest, LeaveType, RequestId};

    fn request(start: NaiveDate, end: NaiveDate) -> LeaveRequest {
        LeaveRequest {
            request_id: RequestId("REQ-001".to_string()),
            employee_id: EmployeeId("emp-001".to_string()),
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            is_half_day: false,
            reason_text: None,
            submitted_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn business_days_skip_weekends() {
        // Mon 2026-03-02 through Sun 2026-03-08 covers one full week.
        let request = request(date(2026, 3, 2), date(2026, 3, 8));
        assert_eq!(request.calendar_days(), 7);
        assert_eq!(request.business_days(), 5);
    }

    #[test]
    fn weekend_only_request_has_zero_business_days() {
        let request = request(date(2026, 3, 7), date(2026, 3, 8));
        assert_eq!(request.business_days(), 0);
        // Charging still floors at one day so quotas cannot go negative.
        assert_eq!(request.charged_days(), Decimal::ONE);
    }

    #[test]
    fn half_day_charges_half_a_day() {
        let mut request = request(date(2026, 3, 2), date(2026, 3, 2));
        request.is_half_day = true;
        assert_eq!(request.charged_days(), Decimal::new(5, 1));
    }
}
