use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: Option<u32>,
    pub is_current_month: bool,
    pub date: Option<String>,
}

impl CalendarCell {
    pub fn padding() -> Self {
        Self { day: None, is_current_month: false, date: None }
    }
}

/// A grid cell with the per-day flags the month view renders.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    #[serde(flatten)]
    pub cell: CalendarCell,
    pub has_appointment: bool,
    pub is_past: bool,
    pub is_inactive_day: bool,
}

#[derive(Debug, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}
