mod config;
mod events;
mod tasks;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use mewdeko_core::{Data, Error, TriviaGames};
use mewdeko_database::{CacheService, Database, MIGRATOR};
use mewdeko_services::{ConverterService, RedditClient};
use mewdeko_trivia::QuestionPool;

use crate::config::Config;

/// Messages kept per channel so deletes and edits can be sniped.
const CACHED_MESSAGES_PER_CHANNEL: usize = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let cache = build_cache(&config).await;
    let db = Database::with_cache(db_pool, cache);

    if config.auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let trivia_questions = match QuestionPool::load(&config.trivia_questions_path) {
        Ok(pool) => {
            info!(questions = pool.len(), "Trivia questions loaded.");
            pool
        }
        Err(err) => {
            warn!(?err, "Failed to load trivia questions; trivia is unavailable.");
            QuestionPool::from_questions(Vec::new())
        }
    };

    let http_client = reqwest::Client::new();

    let converter = Arc::new(ConverterService::new(
        http_client.clone(),
        db.clone(),
        config.currency_api_url.clone(),
        config.units_path.clone(),
    ));
    match converter.load_initial().await {
        Ok(units) => info!(units, "Converter units loaded."),
        Err(err) => warn!(?err, "Failed to load converter units; waiting for the first refresh."),
    }

    let reddit = Arc::new(RedditClient::new(
        http_client.clone(),
        config.reddit_api_url.clone(),
    ));

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let register_guild = config.guild_id;
    let trivia_questions = Arc::new(trivia_questions);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: mewdeko_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(mewdeko_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Mewdeko has awoken!");

                match register_guild {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "Commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Commands registered globally.");
                    }
                }

                tasks::spawn_background_jobs(ctx.http.clone(), db.clone(), Arc::clone(&converter));

                Ok(Data {
                    db,
                    http_client,
                    trivia: TriviaGames::new(),
                    trivia_questions,
                    polls: Default::default(),
                    purges: Default::default(),
                    suppressed_deletes: Default::default(),
                    converter,
                    reddit,
                })
            })
        })
        .build();

    let mut cache_settings = ::serenity::cache::Settings::default();
    cache_settings.max_messages = CACHED_MESSAGES_PER_CHANNEL;

    info!("Mewdeko is connecting...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .cache_settings(cache_settings)
        .await?;

    client.start().await?;
    Ok(())
}

async fn build_cache(config: &Config) -> CacheService {
    let prefix = config.redis_key_prefix.clone();

    let cache = if config.redis_enabled {
        match config.redis_url.as_deref() {
            Some(redis_url) => match CacheService::redis(redis_url, prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                    CacheService::disabled(prefix)
                }
            },
            None => {
                warn!(key_prefix = %prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
                CacheService::disabled(prefix)
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(prefix)
    };

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    cache
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(mewdeko_utils::embed::ERROR_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = mewdeko_commands::find_command(&ctx.command().name)
                .map_or_else(
                    || format!("!{}", ctx.command().qualified_name),
                    |meta| meta.usage.to_owned(),
                );
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\nUsage: `{}`", input, usage)
            } else {
                format!("Missing required argument.\nUsage: `{}`", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::messages::handle_message_create(ctx, data, new_message).await;
        }
        serenity::FullEvent::MessageUpdate {
            old_if_available,
            new,
            event,
        } => {
            events::messages::handle_message_update(
                ctx,
                data,
                old_if_available.as_ref(),
                new.as_ref(),
                event,
            )
            .await;
        }
        serenity::FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id,
        } => {
            events::messages::handle_message_delete(
                ctx,
                data,
                *channel_id,
                std::slice::from_ref(deleted_message_id),
                *guild_id,
            )
            .await;
        }
        serenity::FullEvent::MessageDeleteBulk {
            channel_id,
            multiple_deleted_messages_ids,
            guild_id,
        } => {
            events::messages::handle_message_delete(
                ctx,
                data,
                *channel_id,
                multiple_deleted_messages_ids,
                *guild_id,
            )
            .await;
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            events::interactions::handle_interaction(ctx, data, interaction).await;
        }
        _ => {}
    }

    Ok(())
}
