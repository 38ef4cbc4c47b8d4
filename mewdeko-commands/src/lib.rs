pub mod filter;
pub mod games;
pub mod moderation;
pub mod searches;
pub mod snipes;
pub mod utility;

mod checks;

use mewdeko_core::{Data, Error};
use mewdeko_utils::COMMAND_PREFIX;

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    utility::searchcommand::META,
    utility::modules::META,
    utility::serverinfo::META,
    utility::channelinfo::META,
    utility::userinfo::META,
    utility::roleinfo::META,
    utility::convert::META,
    utility::convertlist::META,
    moderation::warn::META,
    moderation::warnlog::META,
    moderation::warnlogall::META,
    moderation::warnclear::META,
    moderation::warnpunish::META,
    moderation::warnexpire::META,
    moderation::warnlogchannel::META,
    moderation::purge::META,
    moderation::purgebots::META,
    moderation::purgecontains::META,
    filter::filterwords::META,
    filter::filterinvites::META,
    filter::filterlinks::META,
    filter::autobanword::META,
    filter::staffrole::META,
    snipes::snipe::META,
    snipes::editsnipe::META,
    snipes::snipelist::META,
    snipes::editsnipelist::META,
    snipes::snipeset::META,
    games::trivia::META,
    games::tl::META,
    games::tq::META,
    games::poll::META,
    games::pollend::META,
    searches::meme::META,
    searches::randomreddit::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        utility::searchcommand::searchcommand(),
        utility::modules::modules(),
        utility::serverinfo::serverinfo(),
        utility::channelinfo::channelinfo(),
        utility::userinfo::userinfo(),
        utility::roleinfo::roleinfo(),
        utility::convert::convert(),
        utility::convertlist::convertlist(),
        moderation::warn::warn(),
        moderation::warnlog::warnlog(),
        moderation::warnlogall::warnlogall(),
        moderation::warnclear::warnclear(),
        moderation::warnpunish::warnpunish(),
        moderation::warnexpire::warnexpire(),
        moderation::warnlogchannel::warnlogchannel(),
        moderation::purge::purge(),
        moderation::purgebots::purgebots(),
        moderation::purgecontains::purgecontains(),
        filter::filterwords::filterwords(),
        filter::filterinvites::filterinvites(),
        filter::filterlinks::filterlinks(),
        filter::autobanword::autobanword(),
        filter::staffrole::staffrole(),
        snipes::snipe::snipe(),
        snipes::editsnipe::editsnipe(),
        snipes::snipelist::snipelist(),
        snipes::editsnipelist::editsnipelist(),
        snipes::snipeset::snipeset(),
        games::trivia::trivia(),
        games::tl::tl(),
        games::tq::tq(),
        games::poll::poll(),
        games::pollend::pollend(),
        searches::meme::meme(),
        searches::randomreddit::randomreddit(),
    ]
}

/// Look a command up by name, ignoring case and a leading prefix.
pub fn find_command(raw: &str) -> Option<&'static CommandMeta> {
    let name = raw.trim();
    let name = name.strip_prefix(COMMAND_PREFIX).unwrap_or(name).to_ascii_lowercase();

    COMMANDS.iter().find(|command| command.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{COMMANDS, commands, find_command};

    #[test]
    fn metadata_matches_registered_commands() {
        let registered: HashSet<String> = commands().into_iter().map(|command| command.name).collect();
        let described: HashSet<String> = COMMANDS.iter().map(|meta| meta.name.to_owned()).collect();

        assert_eq!(registered, described);
        assert_eq!(described.len(), COMMANDS.len(), "duplicate command metadata");
    }

    #[test]
    fn usage_lines_start_with_the_command() {
        for meta in COMMANDS {
            assert!(
                meta.usage.starts_with(&format!("!{}", meta.name)),
                "{} has usage {}",
                meta.name,
                meta.usage
            );
        }
    }

    #[test]
    fn finds_commands_loosely() {
        assert_eq!(find_command("  !WarnLog ").map(|meta| meta.name), Some("warnlog"));
        assert_eq!(find_command("tq").map(|meta| meta.name), Some("tq"));
        assert!(find_command("nonexistent").is_none());
    }
}
