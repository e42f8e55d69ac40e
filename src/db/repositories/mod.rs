pub mod document;
pub mod preference;
pub mod user;
