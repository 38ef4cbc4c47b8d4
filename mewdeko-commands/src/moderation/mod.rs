pub mod punish;
pub mod timers;

pub mod purge;
pub mod purgebots;
pub mod purgecontains;
pub mod warn;
pub mod warnclear;
pub mod warnexpire;
pub mod warnlog;
pub mod warnlogall;
pub mod warnlogchannel;
pub mod warnpunish;

pub(crate) mod embeds;

pub use embeds::send_moderation_target_dm;
