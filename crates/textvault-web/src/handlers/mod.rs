pub mod api;
pub mod index;
pub mod records;
pub mod submit;
