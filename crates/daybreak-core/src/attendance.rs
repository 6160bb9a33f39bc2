//! # Attendance
//!
//! Attendance records and the shift gate.
//!
//! ## Why a Gate?
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                   Attendance-Gated Operations                    │
//! │                                                                  │
//! │  commit_sale ───────┐                                            │
//! │  stock count ───────┼──► shift_outlet(employee, today)           │
//! │                     │         │                                  │
//! │                     │         ├── no record      → NotClockedIn  │
//! │                     │         ├── record closed  → AlreadyClocked│
//! │                     │         │                      Out         │
//! │                     │         └── open record    → Ok(outlet)    │
//! │                                                                  │
//! │  This is a hard precondition, not a warning. The same gate is    │
//! │  shared by every operation that requires an active shift.        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! At most one attendance record exists per (employee, date); a second
//! clock-in on the same day is rejected even after clock-out.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Attendance Record
// =============================================================================

/// One employee's attendance for one day.
///
/// Created at clock-in with a null clock-out; mutated exactly once at
/// clock-out, which also fixes `hours_worked`. Never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub clock_in: NaiveTime,
    /// None while the shift is still open.
    pub clock_out: Option<NaiveTime>,
    /// Computed at clock-out; 0.0 while the shift is open.
    pub hours_worked: f64,
    /// Outlet selected at clock-in.
    pub outlet_code: String,
}

impl AttendanceRecord {
    /// Creates an open record (shift in progress).
    pub fn open(
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
        date: NaiveDate,
        clock_in: NaiveTime,
        outlet_code: impl Into<String>,
    ) -> Self {
        AttendanceRecord {
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            date,
            clock_in,
            clock_out: None,
            hours_worked: 0.0,
            outlet_code: outlet_code.into(),
        }
    }

    /// Whether the shift is still open (no clock-out yet).
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Closes the record, computing hours worked.
    ///
    /// A punch-out earlier than the punch-in (bad clock) yields 0.0 hours
    /// rather than a negative figure.
    pub fn close(&mut self, clock_out: NaiveTime) {
        let minutes = (clock_out - self.clock_in).num_minutes().max(0);
        self.clock_out = Some(clock_out);
        self.hours_worked = minutes as f64 / 60.0;
    }
}

// =============================================================================
// Attendance Roster
// =============================================================================

/// All attendance records known to the engine, plus the shift gate.
///
/// Loaded from durable storage at startup; clock in/out mutate the roster
/// and the caller persists the touched record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceRoster {
    records: Vec<AttendanceRecord>,
}

impl AttendanceRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        AttendanceRoster {
            records: Vec::new(),
        }
    }

    /// Builds a roster from loaded records.
    pub fn from_records(records: Vec<AttendanceRecord>) -> Self {
        AttendanceRoster { records }
    }

    /// All records, in load/insertion order.
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// All records for one employee.
    pub fn records_for(&self, employee_id: &str) -> Vec<&AttendanceRecord> {
        self.records
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .collect()
    }

    /// The record for (employee, date), if any.
    pub fn find(&self, employee_id: &str, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.records
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == date)
    }

    /// The shift gate: returns the outlet of the employee's open shift.
    ///
    /// ## Errors
    /// - `NotClockedIn` when no record exists for (employee, date)
    /// - `AlreadyClockedOut` when the day's record is closed
    pub fn shift_outlet(&self, employee_id: &str, date: NaiveDate) -> CoreResult<&str> {
        let record = self
            .find(employee_id, date)
            .ok_or_else(|| CoreError::NotClockedIn {
                employee_id: employee_id.to_string(),
                date,
            })?;

        if !record.is_open() {
            return Err(CoreError::AlreadyClockedOut {
                employee_id: employee_id.to_string(),
                date,
            });
        }

        Ok(&record.outlet_code)
    }

    /// Convenience predicate over [`Self::shift_outlet`].
    pub fn is_on_shift(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.shift_outlet(employee_id, date).is_ok()
    }

    /// Records a clock-in, creating the day's record.
    ///
    /// ## Errors
    /// `AlreadyClockedIn` when a record for (employee, date) already exists,
    /// open or closed.
    pub fn clock_in(
        &mut self,
        employee_id: &str,
        employee_name: &str,
        date: NaiveDate,
        time: NaiveTime,
        outlet_code: &str,
    ) -> CoreResult<&AttendanceRecord> {
        if self.find(employee_id, date).is_some() {
            return Err(CoreError::AlreadyClockedIn {
                employee_id: employee_id.to_string(),
                date,
            });
        }

        self.records.push(AttendanceRecord::open(
            employee_id,
            employee_name,
            date,
            time,
            outlet_code,
        ));
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Records a clock-out, closing the day's record and computing hours.
    ///
    /// ## Errors
    /// - `NotClockedIn` when no record exists for (employee, date)
    /// - `AlreadyClockedOut` when the record is already closed
    pub fn clock_out(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CoreResult<&AttendanceRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .ok_or_else(|| CoreError::NotClockedIn {
                employee_id: employee_id.to_string(),
                date,
            })?;

        if !record.is_open() {
            return Err(CoreError::AlreadyClockedOut {
                employee_id: employee_id.to_string(),
                date,
            });
        }

        record.close(time);
        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_gate_requires_a_record() {
        let roster = AttendanceRoster::new();
        let err = roster.shift_outlet("E001", d("2026-03-02")).unwrap_err();
        assert!(matches!(err, CoreError::NotClockedIn { .. }));
        assert!(!roster.is_on_shift("E001", d("2026-03-02")));
    }

    #[test]
    fn test_gate_returns_shift_outlet_while_open() {
        let mut roster = AttendanceRoster::new();
        roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("09:00:00"), "C60")
            .unwrap();

        assert_eq!(
            roster.shift_outlet("E001", d("2026-03-02")).unwrap(),
            "C60"
        );
        assert!(roster.is_on_shift("E001", d("2026-03-02")));
    }

    #[test]
    fn test_gate_rejects_after_clock_out() {
        let mut roster = AttendanceRoster::new();
        roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("09:00:00"), "C60")
            .unwrap();
        roster
            .clock_out("E001", d("2026-03-02"), t("17:30:00"))
            .unwrap();

        let err = roster.shift_outlet("E001", d("2026-03-02")).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyClockedOut { .. }));
    }

    #[test]
    fn test_one_record_per_employee_per_day() {
        let mut roster = AttendanceRoster::new();
        roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("09:00:00"), "C60")
            .unwrap();

        let err = roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("10:00:00"), "K12")
            .unwrap_err();
        assert!(matches!(err, CoreError::AlreadyClockedIn { .. }));

        // Still rejected after clocking out
        roster
            .clock_out("E001", d("2026-03-02"), t("17:00:00"))
            .unwrap();
        let err = roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("18:00:00"), "C60")
            .unwrap_err();
        assert!(matches!(err, CoreError::AlreadyClockedIn { .. }));

        // A new day opens a new record
        roster
            .clock_in("E001", "Farah", d("2026-03-03"), t("09:00:00"), "C60")
            .unwrap();
    }

    #[test]
    fn test_clock_out_computes_hours() {
        let mut roster = AttendanceRoster::new();
        roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("09:00:00"), "C60")
            .unwrap();
        let record = roster
            .clock_out("E001", d("2026-03-02"), t("17:30:00"))
            .unwrap();

        assert_eq!(record.clock_out, Some(t("17:30:00")));
        assert!((record.hours_worked - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_double_clock_out_rejected() {
        let mut roster = AttendanceRoster::new();
        roster
            .clock_in("E001", "Farah", d("2026-03-02"), t("09:00:00"), "C60")
            .unwrap();
        roster
            .clock_out("E001", d("2026-03-02"), t("17:00:00"))
            .unwrap();

        let err = roster
            .clock_out("E001", d("2026-03-02"), t("18:00:00"))
            .unwrap_err();
        assert!(matches!(err, CoreError::AlreadyClockedOut { .. }));
    }
}
