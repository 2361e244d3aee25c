//! Bot module wiring the gateway to the command and LFG layers.
//!
//! The [`Bot`] owns every component and runs the event loop:
//!
//! ```text
//! Gateway ──▶ mpsc channel ──▶ Bot loop ──┬──▶ Dispatcher ──▶ reply
//!                                         └──▶ VoiceTrigger ──▶ announcement
//! ```
//!
//! Each inbound event is handled in its own task by the [`EventLoop`], so a
//! slow persistence write never delays another user's command.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//! let args = Args::parse();
//!
//! let bot = Bot::new(config, args).await?;
//! bot.start().await; // Runs until stdin closes, Ctrl-C or SIGTERM
//! # Ok(())
//! # }
//! ```

use std::{future::Future, sync::Arc};

use log::{error, info, warn};
#[cfg(unix)]
use tokio::signal::unix::SignalKind;
use tokio::{signal, sync::mpsc, task::JoinSet};

use crate::{
    Args,
    commands::{CommandRegistry, Dispatcher},
    config::Config,
    gateway::{CommandScope, ConsoleGateway, InboundEvent, Transport},
    lfg::{TriggerError, VoiceTrigger},
    subscriptions::SubscriptionStore,
    utils::get_path,
};

/// Name of the subscriptions document inside the data directory.
const SUBSCRIPTIONS_FILE: &str = "subscriptions.json";

/// Inbound events buffered before the gateway waits.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Main bot structure.
///
/// All components are built once in [`Bot::new`] and shared by `Arc` with the
/// per-event tasks.
pub struct Bot {
    /// Inbound and outbound side of the chat platform
    gateway: Arc<ConsoleGateway>,
    /// Registered commands, published at startup
    registry: Arc<CommandRegistry>,
    /// Where the commands are published
    scope: CommandScope,
    event_loop: EventLoop<ConsoleGateway>,
}

impl Bot {
    /// Creates a new Bot from the configuration and the command line
    /// arguments.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The data directory cannot be created
    /// - The subscriptions document exists but cannot be read or parsed
    pub async fn new(config: Config, args: Args) -> Result<Self, anyhow::Error> {
        tokio::fs::create_dir_all(&args.data).await?;

        let store = Arc::new(SubscriptionStore::open(get_path(&args.data, SUBSCRIPTIONS_FILE)).await?);
        info!("{} subscriptions loaded", store.len().await);

        let registry = Arc::new(CommandRegistry::with_default_commands());
        let gateway = Arc::new(ConsoleGateway::new(config.console));
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            store,
            Arc::clone(&gateway),
        ));

        if config.lfg.channel_id.is_none() {
            warn!("no LFG voice channel configured, voice announcements are disabled");
        }
        let trigger = Arc::new(VoiceTrigger::new(
            config.lfg.channel_id,
            config.lfg.announcement_channel_id,
            config.bot.user_id,
        ));

        Ok(Bot {
            event_loop: EventLoop::new(dispatcher, trigger, Arc::clone(&gateway)),
            gateway,
            registry,
            scope: CommandScope::from(config.bot.guild_id),
        })
    }

    /// Publishes the commands and processes inbound events.
    ///
    /// Runs until the gateway input is closed, or Ctrl-C or SIGTERM is
    /// received. Events already being handled are awaited before returning.
    pub async fn start(self) {
        let shutdown = match shutdown_signal() {
            Ok(shutdown) => shutdown,
            Err(e) => {
                error!("failed to listen for shutdown signals: {}", e);
                return;
            }
        };

        if let Err(e) = self
            .gateway
            .publish_commands(&self.registry.schemas(), &self.scope)
            .await
        {
            error!("failed to publish commands {}: {}", self.scope, e);
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let gateway = Arc::clone(&self.gateway);
        let listener = tokio::spawn(async move {
            if let Err(e) = gateway.listen(tx).await {
                error!("gateway stopped: {}", e);
            }
        });

        info!("bot started, waiting for events");

        self.event_loop.run(rx, shutdown).await;

        listener.abort();

        info!("bot stopped");
    }
}

/// Fans inbound events out to the command and LFG layers.
pub struct EventLoop<T: Transport> {
    dispatcher: Arc<Dispatcher<T>>,
    trigger: Arc<VoiceTrigger>,
    transport: Arc<T>,
}

impl<T: Transport + Send + Sync + 'static> EventLoop<T> {
    pub fn new(
        dispatcher: Arc<Dispatcher<T>>,
        trigger: Arc<VoiceTrigger>,
        transport: Arc<T>,
    ) -> Self {
        EventLoop {
            dispatcher,
            trigger,
            transport,
        }
    }

    /// Handles every event received on `rx`, each in its own task.
    ///
    /// Returns once `rx` is closed or `shutdown` completes, after the tasks
    /// still running have finished.
    pub async fn run(
        &self,
        mut rx: mpsc::Receiver<InboundEvent>,
        shutdown: impl Future<Output = ()>,
    ) {
        tokio::pin!(shutdown);

        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.spawn_event(&mut tasks, event),
                    None => {
                        info!("event stream closed");
                        break;
                    }
                },
                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = result {
                        error!("event task failed: {}", e);
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!("event task failed: {}", e);
            }
        }
    }

    /// Handles `event` in a new task of `tasks`.
    fn spawn_event(&self, tasks: &mut JoinSet<()>, event: InboundEvent) {
        match event {
            InboundEvent::Command(invocation) => {
                let dispatcher = Arc::clone(&self.dispatcher);
                tasks.spawn(async move {
                    dispatcher.dispatch(invocation).await;
                });
            }
            InboundEvent::Voice(transition) => {
                let trigger = Arc::clone(&self.trigger);
                let transport = Arc::clone(&self.transport);
                tasks.spawn(async move {
                    match trigger.handle(transport.as_ref(), &transition).await {
                        Ok(_) => {}
                        Err(TriggerError::AnnouncementChannelUnavailable(guild_id)) => {
                            warn!(
                                "no announcement channel in guild {}, dropping announcement of user {}",
                                guild_id, transition.user_id
                            );
                        }
                        Err(e) => error!(
                            "failed to announce user {}: {}",
                            transition.user_id, e
                        ),
                    }
                });
            }
        }
    }
}

/// Registers the shutdown signals and returns a future completing on the
/// first of Ctrl-C or SIGTERM.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    let mut terminate = signal::unix::signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = signal::ctrl_c() => info!("received Ctrl-C, shutting down"),
            _ = terminate.recv() => info!("received SIGTERM, shutting down"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = signal::ctrl_c().await;
        info!("received Ctrl-C, shutting down");
    })
}
