//! Routes invocations to their handler and sends the reply.

use std::sync::Arc;

use log::{debug, error};

use crate::{
    commands::{
        CommandContext, CommandInvocation, Reply, registry::CommandRegistry,
        responses::format_unknown_command,
    },
    gateway::Transport,
    subscriptions::SubscriptionStore,
};

/// Executes invocations against the registry and answers through `T`.
///
/// Every dispatched invocation produces exactly one reply sent through the
/// transport, including unknown commands.
pub struct Dispatcher<T: Transport> {
    registry: Arc<CommandRegistry>,
    store: Arc<SubscriptionStore>,
    transport: Arc<T>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(
        registry: Arc<CommandRegistry>,
        store: Arc<SubscriptionStore>,
        transport: Arc<T>,
    ) -> Self {
        Dispatcher {
            registry,
            store,
            transport,
        }
    }

    /// Handles one invocation and returns the reply that was sent.
    ///
    /// A failure to send the reply is logged and not retried.
    pub async fn dispatch(&self, invocation: CommandInvocation) -> Reply {
        let reply = match self.registry.lookup(&invocation.name) {
            Err(e) => {
                debug!("{} from user {}", e, invocation.user_id);
                Reply::private(format_unknown_command())
            }
            Ok(descriptor) => {
                debug!(
                    "executing command {} for user {}",
                    invocation.name, invocation.user_id
                );
                descriptor
                    .handler
                    .execute(CommandContext {
                        invocation: &invocation,
                        store: &self.store,
                        registry: &self.registry,
                    })
                    .await
            }
        };

        if let Err(e) = self.transport.send_reply(&invocation, &reply).await {
            error!(
                "failed to send reply to command {} of user {}: {}",
                invocation.name, invocation.user_id, e
            );
        }

        reply
    }
}
