pub mod filter;
pub mod punishments;
pub mod snipes;
pub mod timers;
pub mod warnings;
