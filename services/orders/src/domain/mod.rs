pub mod notification;
pub mod repository;
pub mod transition;
pub mod types;
