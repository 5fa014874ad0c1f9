//! Projection of a record's anchor date into recurrence cycles.
//!
//! Cycles are always computed from the anchor (anchor + k months), never
//! from the previous cycle, so a day that gets clamped in a short month
//! comes back in the following ones: Jan 31 -> Feb 28 -> Mar 31.

use chrono::{Months, NaiveDate};

use crate::record::Recurrence;

/// Default forward window for projected cycles.
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Inclusive date window that projected (non-anchor) cycles must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl Horizon {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Self {
        Horizon { from, until }
    }

    /// Window starting at `run_date` and extending `months` forward.
    pub fn months_from(run_date: NaiveDate, months: u32) -> Self {
        let until = run_date
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX);
        Horizon::new(run_date, until)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.until
    }
}

/// Lazy sequence of occurrence dates for one record.
///
/// The anchor itself is always the first item. Later cycles are yielded
/// only while they fall inside the horizon; cycles before `horizon.from`
/// are skipped and the sequence ends after `horizon.until`.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDate,
    step_months: Option<u32>,
    horizon: Horizon,
    cycle: u32,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }

        if self.cycle == 0 {
            self.cycle = 1;
            if self.step_months.is_none() {
                self.done = true;
            }
            return Some(self.anchor);
        }

        let step = self.step_months?;
        loop {
            let projected = step
                .checked_mul(self.cycle)
                .and_then(|months| self.anchor.checked_add_months(Months::new(months)));
            self.cycle += 1;

            match projected {
                Some(date) if date > self.horizon.until => break,
                Some(date) if date < self.horizon.from => continue,
                Some(date) => return Some(date),
                None => break,
            }
        }

        self.done = true;
        None
    }
}

/// Expand `anchor` under `rule`, bounded by `horizon`.
///
/// `Yearly` keeps month and day (Feb 29 becomes Feb 28 in common years);
/// `Monthly` keeps the day of month, clamped to the month's last day.
pub fn expand(anchor: NaiveDate, rule: Recurrence, horizon: Horizon) -> Occurrences {
    let step_months = match rule {
        Recurrence::None => None,
        Recurrence::Yearly => Some(12),
        Recurrence::Monthly => Some(1),
    };

    Occurrences {
        anchor,
        step_months,
        horizon,
        cycle: 0,
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn none_yields_only_the_anchor() {
        let horizon = Horizon::new(date(2025, 1, 1), date(2030, 1, 1));
        let dates: Vec<_> = expand(date(2025, 6, 15), Recurrence::None, horizon).collect();
        assert_eq!(dates, vec![date(2025, 6, 15)]);
    }

    #[test]
    fn yearly_projects_within_horizon() {
        let horizon = Horizon::new(date(2025, 1, 1), date(2026, 12, 31));
        let dates: Vec<_> = expand(date(2025, 6, 15), Recurrence::Yearly, horizon).collect();
        assert_eq!(dates, vec![date(2025, 6, 15), date(2026, 6, 15)]);
    }

    #[test]
    fn yearly_leap_day_clamps_to_feb_28() {
        let horizon = Horizon::new(date(2024, 1, 1), date(2025, 12, 31));
        let dates: Vec<_> = expand(date(2024, 2, 29), Recurrence::Yearly, horizon).collect();
        assert_eq!(dates, vec![date(2024, 2, 29), date(2025, 2, 28)]);
    }

    #[test]
    fn yearly_leap_day_returns_in_leap_years() {
        let horizon = Horizon::new(date(2024, 1, 1), date(2028, 12, 31));
        let dates: Vec<_> = expand(date(2024, 2, 29), Recurrence::Yearly, horizon).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 2, 29),
                date(2025, 2, 28),
                date(2026, 2, 28),
                date(2027, 2, 28),
                date(2028, 2, 29),
            ]
        );
    }

    #[test]
    fn monthly_clamps_to_month_end_without_drifting() {
        let horizon = Horizon::new(date(2025, 1, 1), date(2025, 4, 30));
        let dates: Vec<_> = expand(date(2025, 1, 31), Recurrence::Monthly, horizon).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30)]
        );
    }

    #[test]
    fn monthly_clamp_in_leap_year() {
        let horizon = Horizon::new(date(2024, 1, 1), date(2024, 2, 29));
        let dates: Vec<_> = expand(date(2024, 1, 31), Recurrence::Monthly, horizon).collect();
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29)]);
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        let horizon = Horizon::new(date(2025, 11, 1), date(2026, 1, 31));
        let dates: Vec<_> = expand(date(2025, 11, 30), Recurrence::Monthly, horizon).collect();
        assert_eq!(dates, vec![date(2025, 11, 30), date(2025, 12, 30), date(2026, 1, 30)]);
    }

    #[test]
    fn old_anchor_skips_cycles_before_the_horizon() {
        let horizon = Horizon::months_from(date(2025, 3, 1), 12);
        let dates: Vec<_> = expand(date(1990, 6, 15), Recurrence::Yearly, horizon).collect();
        assert_eq!(dates, vec![date(1990, 6, 15), date(2025, 6, 15)]);
    }

    #[test]
    fn anchor_is_kept_even_outside_the_horizon() {
        let horizon = Horizon::new(date(2025, 1, 1), date(2025, 12, 31));
        let dates: Vec<_> = expand(date(2027, 5, 1), Recurrence::Yearly, horizon).collect();
        assert_eq!(dates, vec![date(2027, 5, 1)]);
    }

    #[test]
    fn expansion_is_restartable() {
        let horizon = Horizon::new(date(2025, 1, 1), date(2025, 12, 31));
        let occurrences = expand(date(2025, 1, 15), Recurrence::Monthly, horizon);
        let first: Vec<_> = occurrences.clone().collect();
        let second: Vec<_> = occurrences.collect();
        assert_eq!(first.len(), 12);
        assert_eq!(first, second);
    }

    #[test]
    fn months_from_clamps_end_of_month() {
        let horizon = Horizon::months_from(date(2025, 1, 31), 1);
        assert_eq!(horizon.until, date(2025, 2, 28));
        assert!(horizon.contains(date(2025, 2, 28)));
        assert!(!horizon.contains(date(2025, 3, 1)));
    }
}
