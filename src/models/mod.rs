pub mod health_record;
pub mod user;
