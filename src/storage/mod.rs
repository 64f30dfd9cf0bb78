pub mod database;
pub mod record;

pub use database::ResumeStore;
pub use record::{NewRecord, SavedRecord};
