use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// A mailbox event. Ordering within a mailbox is positional; there is no
/// timestamp field. The optional `data` payload carries entity ids plus an
/// `onClickPath` navigation hint for the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Notification {
    /// Event delivered to a doctor's owning user when a patient books.
    /// Carries no payload; the doctor listing is re-fetched on login.
    pub fn new_appointment(patient_name: &str) -> Self {
        Self {
            kind: "new-appointment".to_string(),
            message: format!("New Appointment request from {}", patient_name),
            data: None,
        }
    }

    /// Event delivered to the admin when a user applies for doctor
    /// registration.
    pub fn doctor_application(doctor_id: Uuid, full_name: &str) -> Self {
        Self {
            kind: "doctor-application".to_string(),
            message: format!("{} has applied for doctor registration", full_name),
            data: Some(json!({
                "doctorId": doctor_id,
                "fullName": full_name,
                "onClickPath": "/admin/doctors",
            })),
        }
    }

    /// Event delivered back to the patient when a doctor updates an
    /// appointment's status.
    pub fn appointment_status(appointment_id: Uuid, status: &str) -> Self {
        Self {
            kind: "appointment-status".to_string(),
            message: format!("Your appointment request has been {}", status),
            data: Some(json!({
                "appointmentId": appointment_id,
                "onClickPath": "/appointments",
            })),
        }
    }
}

/// Move every unseen notification to the tail of the seen partition,
/// preserving order. A move, never a copy: `unseen` is left empty.
pub fn drain_into_seen(unseen: &mut Vec<Notification>, seen: &mut Vec<Notification>) {
    seen.append(unseen);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(msg: &str) -> Notification {
        Notification {
            kind: "test".to_string(),
            message: msg.to_string(),
            data: None,
        }
    }

    #[test]
    fn test_new_appointment_message() {
        let n = Notification::new_appointment("Jane Roe");
        assert_eq!(n.kind, "new-appointment");
        assert_eq!(n.message, "New Appointment request from Jane Roe");
    }

    #[test]
    fn test_doctor_application_payload() {
        let doctor_id = Uuid::new_v4();
        let n = Notification::doctor_application(doctor_id, "Gregory House");
        assert_eq!(n.kind, "doctor-application");
        assert_eq!(n.message, "Gregory House has applied for doctor registration");
        let data = n.data.unwrap();
        assert_eq!(data["onClickPath"], "/admin/doctors");
        assert_eq!(data["doctorId"], json!(doctor_id));
    }

    #[test]
    fn test_appointment_status_message() {
        let n = Notification::appointment_status(Uuid::new_v4(), "approved");
        assert_eq!(n.kind, "appointment-status");
        assert_eq!(n.message, "Your appointment request has been approved");
    }

    #[test]
    fn test_serde_uses_type_tag() {
        let n = event("hello");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "test");
        assert!(json.get("data").is_none());

        let parsed: Notification =
            serde_json::from_str(r#"{"type": "x", "message": "m"}"#).unwrap();
        assert_eq!(parsed.kind, "x");
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut unseen = vec![event("a"), event("b"), event("c")];
        let mut seen = vec![event("old")];
        drain_into_seen(&mut unseen, &mut seen);
        assert!(unseen.is_empty());
        let messages: Vec<&str> = seen.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["old", "a", "b", "c"]);
    }

    #[test]
    fn test_drain_empty_is_noop() {
        let mut unseen: Vec<Notification> = Vec::new();
        let mut seen = vec![event("kept")];
        drain_into_seen(&mut unseen, &mut seen);
        assert!(unseen.is_empty());
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_drain_keeps_duplicates() {
        // Repeated identical events accumulate; no deduplication anywhere
        let mut unseen = vec![event("dup"), event("dup")];
        let mut seen = vec![event("dup")];
        drain_into_seen(&mut unseen, &mut seen);
        assert_eq!(seen.len(), 3);
    }
}
