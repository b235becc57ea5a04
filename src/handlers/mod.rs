pub mod entries;
pub mod health;
pub mod insights;
pub mod subscription;
