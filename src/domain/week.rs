//! Week navigation: Monday-start windows and the daily slot schedule.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::slot::{SlotAddress, SlotTime};
use crate::domain::types::TypeConstraintError;

pub const DAYS_PER_WEEK: usize = 7;

/// Operating hours of the grid: one slot per hour, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub first_hour: u32,
    pub last_hour: u32,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            first_hour: 8,
            last_hour: 20,
        }
    }
}

impl DailySchedule {
    pub fn new(first_hour: u32, last_hour: u32) -> Result<Self, TypeConstraintError> {
        if first_hour > last_hour || last_hour > 23 {
            return Err(TypeConstraintError::InvalidValue(format!(
                "daily schedule {first_hour}..={last_hour}"
            )));
        }
        Ok(Self {
            first_hour,
            last_hour,
        })
    }

    /// Ordered hourly slots, `08:00` through `20:00` for the default schedule.
    pub fn time_slots(&self) -> Vec<SlotTime> {
        (self.first_hour..=self.last_hour.min(23))
            .filter_map(|hour| SlotTime::new(hour, 0).ok())
            .collect()
    }

    pub fn contains(&self, time: SlotTime) -> bool {
        self.time_slots().contains(&time)
    }
}

/// Seven consecutive days starting on a Monday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    days: [NaiveDate; DAYS_PER_WEEK],
}

impl WeekWindow {
    /// Window containing `anchor`, independent of any locale's first weekday.
    ///
    /// `None` when the week runs past the range of representable dates.
    pub fn containing(anchor: NaiveDate) -> Option<Self> {
        let monday = anchor
            .checked_sub_days(Days::new(u64::from(anchor.weekday().num_days_from_monday())))?;
        let mut days = [monday; DAYS_PER_WEEK];
        for (offset, day) in days.iter_mut().enumerate() {
            *day = monday.checked_add_days(Days::new(offset as u64))?;
        }
        Some(Self { days })
    }

    pub fn days(&self) -> &[NaiveDate; DAYS_PER_WEEK] {
        &self.days
    }

    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.days[DAYS_PER_WEEK - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start()..=self.end()).contains(&date)
    }

    /// Position of the week inside the month of its Monday, starting at 1.
    pub fn week_of_month(&self) -> u32 {
        self.start().day().div_ceil(7)
    }

    /// Every cell of the grid, day by day and then by time.
    pub fn cells(&self, schedule: &DailySchedule) -> Vec<SlotAddress> {
        let times = schedule.time_slots();
        self.days
            .iter()
            .flat_map(|date| times.iter().map(|time| SlotAddress::new(*date, *time)))
            .collect()
    }
}

/// The seven dates of the Monday-start week containing `anchor`.
pub fn week_window(anchor: NaiveDate) -> Option<[NaiveDate; DAYS_PER_WEEK]> {
    WeekWindow::containing(anchor).map(|window| window.days)
}

/// Slots of the default daily schedule.
pub fn time_slots() -> Vec<SlotTime> {
    DailySchedule::default().time_slots()
}

/// Shifts `anchor` by `direction` whole weeks, or `None` when the result is
/// not a representable date.
pub fn navigate(anchor: NaiveDate, direction: i64) -> Option<NaiveDate> {
    let days = Days::new(direction.unsigned_abs().checked_mul(DAYS_PER_WEEK as u64)?);
    if direction >= 0 {
        anchor.checked_add_days(days)
    } else {
        anchor.checked_sub_days(days)
    }
}
