pub mod health;
pub mod health_data;
pub mod users;
