use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use medibook_common::{DoctorSnapshot, PatientSnapshot};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_info: Json<PatientSnapshot>,
    pub doctor_info: Json<DoctorSnapshot>,
    pub date: String,
    pub document_filename: Option<String>,
    pub document_path: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_info: PatientSnapshot,
    pub doctor_info: DoctorSnapshot,
    pub date: String,
    pub document_filename: Option<String>,
    pub document_path: Option<String>,
}

const APPOINTMENT_COLUMNS: &str = "appointment_id, patient_id, doctor_id, patient_info, \
     doctor_info, date, document_filename, document_path, status, created_at";

pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a booking. Status always starts out pending.
    pub async fn create(pool: &PgPool, appointment: &NewAppointment) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO appointments
               (appointment_id, patient_id, doctor_id, patient_info, doctor_info,
                date, document_filename, document_path, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')"#,
        )
        .bind(appointment.appointment_id)
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(Json(&appointment.patient_info))
        .bind(Json(&appointment.doctor_info))
        .bind(&appointment.date)
        .bind(&appointment.document_filename)
        .bind(&appointment.document_path)
        .execute(pool)
        .await
        .context("Failed to create appointment")?;
        Ok(())
    }

    pub async fn get(pool: &PgPool, appointment_id: Uuid) -> Result<Option<AppointmentRow>> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appointment_id = $1"
        ))
        .bind(appointment_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get appointment")?;
        Ok(row)
    }

    /// Insertion order; no other ordering is meaningful.
    pub async fn list_for_patient(pool: &PgPool, patient_id: Uuid) -> Result<Vec<AppointmentRow>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE patient_id = $1 ORDER BY created_at"
        ))
        .bind(patient_id)
        .fetch_all(pool)
        .await
        .context("Failed to list appointments for patient")?;
        Ok(rows)
    }

    pub async fn list_for_doctor(pool: &PgPool, doctor_id: Uuid) -> Result<Vec<AppointmentRow>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE doctor_id = $1 ORDER BY created_at"
        ))
        .bind(doctor_id)
        .fetch_all(pool)
        .await
        .context("Failed to list appointments for doctor")?;
        Ok(rows)
    }

    /// Unconditional re-persist; a repeat call with the same status simply
    /// writes the same value again.
    pub async fn set_status(pool: &PgPool, appointment_id: Uuid, status: &str) -> Result<()> {
        sqlx::query(r#"UPDATE appointments SET status = $2 WHERE appointment_id = $1"#)
            .bind(appointment_id)
            .bind(status)
            .execute(pool)
            .await
            .context("Failed to update appointment status")?;
        Ok(())
    }
}
