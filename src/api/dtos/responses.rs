use serde::Serialize;

#[derive(Serialize)]
pub struct EventStatsResponse {
    pub total_registrations: i64,
    pub attended_count: i64,
    pub cancelled_count: i64,
}

#[derive(Serialize)]
pub struct ScanResponse {
    pub registration_id: String,
    pub participant_name: String,
    pub participant_email: String,
    pub event_name: String,
    pub status: String,
    pub registered_at: String,
    pub attended_at: Option<String>,
}

#[derive(Serialize)]
pub struct CheckinResponse {
    pub success: bool,
    pub message: String,
    pub attended_at: String,
}
