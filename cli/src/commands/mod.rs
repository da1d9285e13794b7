pub mod health;
pub mod operations;
