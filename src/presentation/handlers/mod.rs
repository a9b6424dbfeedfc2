mod convert;
mod health;
mod job_status;

pub use convert::convert_handler;
pub use health::health_handler;
pub use job_status::job_status_handler;
