mod car_status;
mod field;
mod report;
mod topic_class;

pub use car_status::CarStatus;
pub use field::{FieldId, FieldValue};
pub use report::{ChargeSession, RawReading, StatusReport, WindowState};
pub use topic_class::TopicClass;
