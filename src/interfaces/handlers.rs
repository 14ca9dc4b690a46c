pub mod home;
pub mod system;
pub mod work;
