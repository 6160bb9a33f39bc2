//! # Attendance Repository
//!
//! Database operations for attendance records. One row per
//! (employee, date); clock-out updates the existing row in place, so
//! writes go through a single upsert.

use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use daybreak_core::AttendanceRecord;

/// Repository for attendance database operations.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    employee_id: String,
    employee_name: String,
    date: NaiveDate,
    clock_in: NaiveTime,
    clock_out: Option<NaiveTime>,
    hours_worked: f64,
    outlet_code: String,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            date: row.date,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            hours_worked: row.hours_worked,
            outlet_code: row.outlet_code,
        }
    }
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AttendanceRepository { pool }
    }

    /// Loads every attendance record, oldest day first.
    pub async fn load_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        let rows: Vec<AttendanceRow> = sqlx::query_as(
            r#"
            SELECT employee_id, employee_name, date,
                   clock_in, clock_out, hours_worked, outlet_code
            FROM attendance
            ORDER BY date, employee_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    /// Inserts the clock-in row or updates it with the clock-out.
    pub async fn upsert(&self, record: &AttendanceRecord) -> StoreResult<()> {
        debug!(
            employee = %record.employee_id,
            date = %record.date,
            open = record.is_open(),
            "Upserting attendance record"
        );

        sqlx::query(
            r#"
            INSERT INTO attendance (
                employee_id, employee_name, date,
                clock_in, clock_out, hours_worked, outlet_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(employee_id, date) DO UPDATE SET
                employee_name = excluded.employee_name,
                clock_out = excluded.clock_out,
                hours_worked = excluded.hours_worked,
                outlet_code = excluded.outlet_code
            "#,
        )
        .bind(&record.employee_id)
        .bind(&record.employee_name)
        .bind(record.date)
        .bind(record.clock_in)
        .bind(record.clock_out)
        .bind(record.hours_worked)
        .bind(&record.outlet_code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
