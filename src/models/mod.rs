pub mod entry;
pub mod subscription;
