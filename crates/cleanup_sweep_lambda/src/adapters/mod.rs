pub mod notify;
pub mod resource;
