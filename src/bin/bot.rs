use anyhow::{Context as _, Result};
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::gateway::Ready;
use serenity::model::guild::ScheduledEvent as GatewayEvent;
use serenity::prelude::*;
use std::sync::Arc;
use tokio::sync::mpsc;

use herald::core::{Config, Outbound, SerenityOutbound};
use herald::features::events::{EventNotice, EventSync, ScheduledEvent};
use herald::features::presence::{
    run_poller, HttpPresenceSource, MessagePointer, PresencePipeline, PresenceSource,
    StatusPublisher, SNAPSHOT_QUEUE_CAPACITY,
};
use herald::features::reminders::{ReminderScheduler, ReminderSettings, ReminderStore};
use herald::features::startup::{log_banner, ReadyOnce};

struct Handler {
    /// Present only when event reminders are enabled
    events: Option<(Arc<ReminderStore>, ReminderSettings)>,
    ready_once: ReadyOnce,
}

impl Handler {
    fn event_sync(&self, ctx: &Context) -> Option<EventSync> {
        let (store, settings) = self.events.as_ref()?;
        let outbound: Arc<dyn Outbound> = Arc::new(SerenityOutbound::new(ctx.http.clone()));
        Some(EventSync::new(store.clone(), outbound, settings.clone()))
    }

    async fn dispatch(&self, ctx: &Context, event: &GatewayEvent, created: bool) {
        let Some(sync) = self.event_sync(ctx) else {
            return;
        };

        match ScheduledEvent::try_from(event) {
            Ok(event) if created => sync.handle(EventNotice::Created(event)).await,
            Ok(event) => sync.handle(EventNotice::Updated(event)).await,
            Err(e) => warn!("Ignoring scheduled event notification: {e}"),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if !self.ready_once.claim() {
            info!("Skipping event sync (reconnect, not initial startup)");
            return;
        }

        let Some(sync) = self.event_sync(&ctx) else {
            return;
        };

        info!("🔄 Syncing scheduled events with reminder queue...");
        let mut events = Vec::new();
        for guild in &ready.guilds {
            match guild.id.scheduled_events(&ctx.http, false).await {
                Ok(found) => events.extend(found.iter().filter_map(|e| {
                    ScheduledEvent::try_from(e)
                        .map_err(|err| warn!("Skipping scheduled event {}: {err}", e.id))
                        .ok()
                })),
                Err(e) => warn!("Failed to fetch scheduled events for guild {}: {e}", guild.id),
            }
        }
        sync.reconcile(events).await;
    }

    async fn guild_scheduled_event_create(&self, ctx: Context, event: GatewayEvent) {
        self.dispatch(&ctx, &event, true).await;
    }

    async fn guild_scheduled_event_update(&self, ctx: Context, event: GatewayEvent) {
        self.dispatch(&ctx, &event, false).await;
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level));

    if let Some(path) = &config.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    let config = Config::load()?;

    init_logging(&config)?;

    info!("Starting herald...");
    log_banner(&config);

    let store = Arc::new(ReminderStore::new());
    let reminder_settings = match (config.eventer_enabled, config.events_channel_id) {
        (true, Some(channel_id)) => Some(ReminderSettings {
            channel_id,
            offsets: config.reminder_offsets.clone(),
            tick: config.scheduler_tick,
            timezone: config.display_timezone,
            language: config.language,
        }),
        _ => None,
    };

    let handler = Handler {
        events: reminder_settings
            .clone()
            .map(|settings| (store.clone(), settings)),
        ready_once: ReadyOnce::new(),
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_SCHEDULED_EVENTS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid bot token format");
            error!("  - Network issues reaching Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let http = client.cache_and_http.http.clone();
    let outbound = Arc::new(SerenityOutbound::new(http));

    // Start the reminder scheduler
    if let Some(settings) = reminder_settings {
        let scheduler = ReminderScheduler::new(store.clone(), outbound.clone(), settings);
        tokio::spawn(scheduler.run());
    }

    // Start the presence poller and its pipeline
    let (tx, rx) = mpsc::channel(SNAPSHOT_QUEUE_CAPACITY);
    let source: Arc<dyn PresenceSource> = Arc::new(HttpPresenceSource::new(config.servers.clone())?);
    tokio::spawn(run_poller(source, config.poll_interval, tx));

    let pipeline_outbound = outbound.clone();
    let status_channel = config.status_channel_id;
    let status_title = config.status_title.clone();
    let pin = config.pin_player_list;
    let pointer = MessagePointer::new(&config.pointer_path);
    let join_leave = config.show_join_leave.then_some(config.join_leave_channel_id);
    tokio::spawn(async move {
        let author_id = match pipeline_outbound.current_user_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Could not resolve own user id, status message rediscovery disabled: {e}");
                None
            }
        };
        let publisher = StatusPublisher::new(
            pipeline_outbound.clone(),
            status_channel,
            status_title,
            author_id,
            pin,
        );
        PresencePipeline::start(publisher, pointer, pipeline_outbound, join_leave)
            .await
            .run(rx)
            .await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        error!("This could be due to:");
        error!("  - Invalid bot token");
        error!("  - Network connectivity issues");
        error!("  - Discord API outage");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
