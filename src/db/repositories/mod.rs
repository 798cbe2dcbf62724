pub mod anomalies;
pub mod attendance;
pub mod cameras;
pub mod gate_requests;
pub mod interventions;
pub mod leave_requests;
pub mod persons;
pub mod students;
pub mod system_logs;
pub mod visitors;
