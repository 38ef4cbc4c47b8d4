/// Shared confirmation prompt helpers.
pub mod confirmation;
/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (durations, truncation, timestamps).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Shared pagination helper utilities.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Channel history deletion shared by the purge commands.
pub mod purge;
/// Shared time helpers.
pub mod time;
