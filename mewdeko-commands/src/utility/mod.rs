pub mod channelinfo;
pub mod convert;
pub mod convertlist;
pub mod help;
pub mod modules;
pub mod ping;
pub mod roleinfo;
pub mod searchcommand;
pub mod serverinfo;
pub mod usage;
pub mod userinfo;

pub(crate) mod embeds;
