pub mod content_repo;
pub mod work;
