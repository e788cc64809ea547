use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use anyhow::Context;
use medibook_common::Notification;
use medibook_db::{DoctorRepo, DoctorRow, NewDoctor, UserRepo, UserRow};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Resolves the admin account that receives doctor-application alerts.
/// The deployment is expected to carry exactly one admin; if several
/// exist the oldest wins.
pub struct AdminDirectory {
    pool: PgPool,
}

impl AdminDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn resolve_admin(&self) -> ApiResult<UserRow> {
        UserRepo::find_by_role(&self.pool, "admin")
            .await?
            .ok_or(ApiError::AdminMissing)
    }
}

/// Profile fields submitted with a doctor application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub specialization: String,
    pub experience: String,
    pub fees: f64,
}

fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Submit a doctor application on behalf of a user. The admin must be
/// resolvable before anything is written; the application insert and the
/// admin alert then both have to succeed.
#[tracing::instrument(skip(state, application))]
pub async fn apply(
    state: &AppState,
    applicant_user_id: Uuid,
    application: DoctorApplication,
) -> ApiResult<DoctorRow> {
    require(&application.full_name, "fullName")?;
    require(&application.email, "email")?;
    require(&application.phone, "phone")?;
    require(&application.address, "address")?;
    require(&application.specialization, "specialization")?;
    require(&application.experience, "experience")?;

    let applicant = UserRepo::get_by_id(&state.pool, applicant_user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let admin = state.admins.resolve_admin().await?;

    let doctor = NewDoctor {
        doctor_id: Uuid::new_v4(),
        user_id: applicant.user_id,
        full_name: application.full_name,
        email: application.email,
        phone: application.phone,
        address: application.address,
        specialization: application.specialization,
        experience: application.experience,
        fees: application.fees,
    };
    DoctorRepo::create(&state.pool, &doctor).await?;

    tracing::info!(
        doctor_id = %doctor.doctor_id,
        user_id = %doctor.user_id,
        "Doctor application submitted"
    );

    state
        .mailbox
        .enqueue(
            admin.user_id,
            Notification::doctor_application(doctor.doctor_id, &doctor.full_name),
        )
        .await?;

    DoctorRepo::get(&state.pool, doctor.doctor_id)
        .await?
        .context("Doctor profile missing after insert")
        .map_err(ApiError::from)
}

/// The public listing: approved profiles only.
pub async fn list_approved(state: &AppState) -> ApiResult<Vec<DoctorRow>> {
    Ok(DoctorRepo::list_approved(&state.pool).await?)
}
