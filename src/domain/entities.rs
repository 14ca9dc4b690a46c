pub mod work;
pub mod work_entry;
