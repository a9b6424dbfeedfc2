mod article;
mod job;
mod job_id;
mod job_status;
mod stage;

pub use article::Article;
pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use stage::Stage;
