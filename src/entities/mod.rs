pub mod prelude;

pub mod documents;
pub mod password_resets;
pub mod preferences;
pub mod users;
