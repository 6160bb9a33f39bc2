//! # Attendance Operations
//!
//! Clock in/out and the shift-gate surface on the engine.
//!
//! Clock punches use the engine's clock (UTC); the resulting record is
//! persisted through the gateway after the roster mutation, following the
//! same release-locks-then-persist discipline as every other operation.

use chrono::{NaiveDate, Utc};
use tracing::info;

use daybreak_core::{validation, AttendanceRecord, CoreError};

use crate::engine::SalesEngine;
use crate::error::{EngineError, EngineResult};
use crate::gateway::PersistenceGateway;

impl<G: PersistenceGateway> SalesEngine<G> {
    /// Clocks an employee in at an outlet, creating today's record.
    ///
    /// ## Errors
    /// - `UnknownOutlet` if the outlet is not registered
    /// - `AlreadyClockedIn` if a record for today already exists
    pub async fn clock_in(
        &self,
        employee_id: &str,
        employee_name: &str,
        outlet_code: &str,
    ) -> EngineResult<AttendanceRecord> {
        validation::validate_employee_id(employee_id)?;
        if self.outlet(outlet_code).is_none() {
            return Err(CoreError::UnknownOutlet(outlet_code.to_string()).into());
        }

        let now = Utc::now();
        let record = {
            let mut roster = self.roster.lock().expect("roster mutex poisoned");
            roster
                .clock_in(
                    employee_id,
                    employee_name,
                    now.date_naive(),
                    now.time(),
                    outlet_code,
                )?
                .clone()
        };

        info!(
            employee = %employee_id,
            outlet = %outlet_code,
            date = %record.date,
            "Clock in"
        );

        self.gateway
            .save_attendance(&record)
            .await
            .map_err(|e| EngineError::persistence("save_attendance", e))?;
        Ok(record)
    }

    /// Clocks an employee out, closing today's record and fixing hours.
    ///
    /// ## Errors
    /// - `NotClockedIn` if no record exists for today
    /// - `AlreadyClockedOut` if the record is already closed
    pub async fn clock_out(&self, employee_id: &str) -> EngineResult<AttendanceRecord> {
        validation::validate_employee_id(employee_id)?;

        let now = Utc::now();
        let record = {
            let mut roster = self.roster.lock().expect("roster mutex poisoned");
            roster
                .clock_out(employee_id, now.date_naive(), now.time())?
                .clone()
        };

        info!(
            employee = %employee_id,
            hours = record.hours_worked,
            "Clock out"
        );

        self.gateway
            .save_attendance(&record)
            .await
            .map_err(|e| EngineError::persistence("save_attendance", e))?;
        Ok(record)
    }

    /// The shift gate: outlet of the employee's open shift on `date`.
    pub fn shift_outlet(&self, employee_id: &str, date: NaiveDate) -> EngineResult<String> {
        let roster = self.roster.lock().expect("roster mutex poisoned");
        Ok(roster.shift_outlet(employee_id, date)?.to_string())
    }

    /// Whether the employee is currently on shift (today, not clocked out).
    pub fn is_on_shift(&self, employee_id: &str) -> bool {
        let roster = self.roster.lock().expect("roster mutex poisoned");
        roster.is_on_shift(employee_id, Utc::now().date_naive())
    }

    /// All attendance records for one employee, in insertion order.
    pub fn attendance_for(&self, employee_id: &str) -> Vec<AttendanceRecord> {
        let roster = self.roster.lock().expect("roster mutex poisoned");
        roster
            .records_for(employee_id)
            .into_iter()
            .cloned()
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
