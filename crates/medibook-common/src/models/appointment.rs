use serde::{Deserialize, Serialize};

/// Role flag on a user account. Exactly one admin account exists per
/// deployment; doctor accounts additionally own a directory profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Appointment lifecycle status. The source system only ever moves
/// pending -> approved; there is no rejected terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<AppointmentStatus> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "approved" => Some(AppointmentStatus::Approved),
            _ => None,
        }
    }
}

/// Patient contact fields captured at booking time. Later edits to the
/// patient account do not alter past appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSnapshot {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Doctor contact fields captured at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSnapshot {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Patient, Role::Doctor, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [AppointmentStatus::Pending, AppointmentStatus::Approved] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        // No rejected terminal exists in this system
        assert_eq!(AppointmentStatus::parse("rejected"), None);
        assert_eq!(AppointmentStatus::parse(""), None);
        assert_eq!(AppointmentStatus::parse("Approved"), None);
    }

    #[test]
    fn test_patient_snapshot_camel_case() {
        let snapshot: PatientSnapshot =
            serde_json::from_str(r#"{"fullName": "Jane Roe", "phone": "555-0101"}"#).unwrap();
        assert_eq!(snapshot.full_name, "Jane Roe");
        assert_eq!(snapshot.phone.as_deref(), Some("555-0101"));
        assert!(snapshot.email.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["fullName"], "Jane Roe");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_doctor_snapshot_requires_full_name() {
        let result = serde_json::from_str::<DoctorSnapshot>(r#"{"email": "d@clinic.test"}"#);
        assert!(result.is_err());
    }
}
