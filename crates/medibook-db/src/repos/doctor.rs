use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DoctorRow {
    pub doctor_id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub specialization: String,
    pub experience: String,
    pub fees: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Profile fields submitted with a doctor application.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub doctor_id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub specialization: String,
    pub experience: String,
    pub fees: f64,
}

const DOCTOR_COLUMNS: &str = "doctor_id, user_id, full_name, email, phone, address, \
     specialization, experience, fees, status, created_at";

pub struct DoctorRepo;

impl DoctorRepo {
    /// Insert a new application. Status always starts out pending.
    pub async fn create(pool: &PgPool, doctor: &NewDoctor) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO doctors
               (doctor_id, user_id, full_name, email, phone, address,
                specialization, experience, fees, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')"#,
        )
        .bind(doctor.doctor_id)
        .bind(doctor.user_id)
        .bind(&doctor.full_name)
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(&doctor.address)
        .bind(&doctor.specialization)
        .bind(&doctor.experience)
        .bind(doctor.fees)
        .execute(pool)
        .await
        .context("Failed to create doctor profile")?;
        Ok(())
    }

    pub async fn get(pool: &PgPool, doctor_id: Uuid) -> Result<Option<DoctorRow>> {
        let row = sqlx::query_as::<_, DoctorRow>(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE doctor_id = $1"
        ))
        .bind(doctor_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get doctor")?;
        Ok(row)
    }

    pub async fn get_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<Option<DoctorRow>> {
        let row = sqlx::query_as::<_, DoctorRow>(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get doctor by user id")?;
        Ok(row)
    }

    /// Batch lookup used by the patient-listing enrichment.
    pub async fn list_by_ids(pool: &PgPool, doctor_ids: &[Uuid]) -> Result<Vec<DoctorRow>> {
        let rows = sqlx::query_as::<_, DoctorRow>(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE doctor_id = ANY($1)"
        ))
        .bind(doctor_ids)
        .fetch_all(pool)
        .await
        .context("Failed to list doctors by ids")?;
        Ok(rows)
    }

    /// The only public listing: approved profiles. Pending and rejected
    /// applications are never exposed to patients.
    pub async fn list_approved(pool: &PgPool) -> Result<Vec<DoctorRow>> {
        let rows = sqlx::query_as::<_, DoctorRow>(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE status = 'approved' ORDER BY created_at"
        ))
        .fetch_all(pool)
        .await
        .context("Failed to list approved doctors")?;
        Ok(rows)
    }

    /// Approval-gate transition, driven by admin tooling.
    pub async fn set_status(pool: &PgPool, doctor_id: Uuid, status: &str) -> Result<()> {
        sqlx::query(r#"UPDATE doctors SET status = $2 WHERE doctor_id = $1"#)
            .bind(doctor_id)
            .bind(status)
            .execute(pool)
            .await
            .context("Failed to update doctor status")?;
        Ok(())
    }
}
