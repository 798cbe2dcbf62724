pub mod anomaly_models;
pub mod attendance_models;
pub mod camera_models;
pub mod gate_models;
pub mod intervention_models;
pub mod leave_models;
pub mod person_models;
pub mod student_models;
pub mod system_log_models;
pub mod visitor_models;

pub use anomaly_models::{Anomaly, AnomalyStatus, NewAnomaly, Severity};
pub use attendance_models::{AttendanceEvent, AttendanceEventType, NewAttendanceEvent};
pub use camera_models::{CameraMetadata, RegisterCamera};
pub use gate_models::{GateDecision, GateDirection, GateRequest, NewGateRequest};
pub use intervention_models::{InterventionLog, VoiceBroadcast};
pub use leave_models::{ApprovalStatus, LeaveDecision, LeaveRequest, NewLeaveRequest};
pub use person_models::{NewPersonRecord, PersonRecord, PersonRole, PresenceStatus};
pub use student_models::{NewStudent, Student, StudentPhoto, UpdateStudent};
pub use system_log_models::SystemLog;
pub use visitor_models::{NewVisitor, Visitor, VisitorStatus};
