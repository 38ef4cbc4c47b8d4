pub mod interactions;
pub mod messages;
