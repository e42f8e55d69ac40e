pub use super::documents::Entity as Documents;
pub use super::password_resets::Entity as PasswordResets;
pub use super::preferences::Entity as Preferences;
pub use super::users::Entity as Users;
