//! Error-action registry: decides how the channel reacts to a failure.
//!
//! A [`BookingError`] carries an optional [`ErrorAction`] tag. The registry
//! maps each tag to a handler that formats the error event and applies the
//! side effect (disconnect for `Cancel`, nothing for `Notify`/`Redirect`).
//! Untagged errors bypass the handlers and become plain failure events.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::booking_session::{BookingError, ErrorAction, EventName, ServerEvent};
use crate::domain::foundation::ConnectionId;
use crate::domain::i18n::{translate, Locale};
use crate::ports::ClientChannel;

/// What a handler gets to work with.
#[derive(Debug, Clone)]
pub struct ErrorContext<'a> {
    pub action: ErrorAction,
    pub event: EventName,
    pub connection_id: &'a ConnectionId,
    pub message: String,
}

impl ErrorContext<'_> {
    fn to_event(&self) -> ServerEvent {
        ServerEvent::failure(
            self.event,
            self.connection_id.as_str(),
            self.message.clone(),
            Some(self.action.reason()),
        )
    }
}

/// Reaction to one tagged error.
#[async_trait]
pub trait ErrorActionHandler: Send + Sync {
    async fn handle(&self, ctx: ErrorContext<'_>, channel: &dyn ClientChannel);
}

/// Emits the error, then force-disconnects the connection.
pub struct CancelHandler;

#[async_trait]
impl ErrorActionHandler for CancelHandler {
    async fn handle(&self, ctx: ErrorContext<'_>, channel: &dyn ClientChannel) {
        channel.send(ctx.connection_id, ctx.to_event()).await;
        tracing::warn!(
            connection_id = %ctx.connection_id,
            event = ?ctx.event,
            "Terminating connection"
        );
        channel.disconnect(ctx.connection_id).await;
    }
}

/// Emits the error as a recoverable warning.
pub struct NotifyHandler;

#[async_trait]
impl ErrorActionHandler for NotifyHandler {
    async fn handle(&self, ctx: ErrorContext<'_>, channel: &dyn ClientChannel) {
        channel.send(ctx.connection_id, ctx.to_event()).await;
    }
}

/// Emits the error with a redirect reason; the connection stays open.
pub struct RedirectHandler;

#[async_trait]
impl ErrorActionHandler for RedirectHandler {
    async fn handle(&self, ctx: ErrorContext<'_>, channel: &dyn ClientChannel) {
        channel.send(ctx.connection_id, ctx.to_event()).await;
    }
}

/// Dispatch table from [`ErrorAction`] to handler.
///
/// One handler per tag; registering again replaces the previous one.
pub struct ErrorActionRegistry {
    handlers: RwLock<HashMap<ErrorAction, Arc<dyn ErrorActionHandler>>>,
}

impl ErrorActionRegistry {
    /// Creates a registry with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with the cancel, notify and redirect handlers.
    pub fn with_default_handlers() -> Self {
        let mut handlers: HashMap<ErrorAction, Arc<dyn ErrorActionHandler>> = HashMap::new();
        handlers.insert(ErrorAction::Cancel, Arc::new(CancelHandler));
        handlers.insert(ErrorAction::Notify, Arc::new(NotifyHandler));
        handlers.insert(ErrorAction::Redirect, Arc::new(RedirectHandler));
        Self {
            handlers: RwLock::new(handlers),
        }
    }

    /// Installs `handler` for `action`, returning the one it replaced.
    pub async fn register(
        &self,
        action: ErrorAction,
        handler: Arc<dyn ErrorActionHandler>,
    ) -> Option<Arc<dyn ErrorActionHandler>> {
        self.handlers.write().await.insert(action, handler)
    }

    /// Runs the handler registered for the error's tag.
    ///
    /// Returns false when the error is untagged or no handler is
    /// registered for its tag; nothing is emitted in that case.
    pub async fn dispatch(
        &self,
        error: &BookingError,
        event: EventName,
        connection_id: &ConnectionId,
        locale: Locale,
        channel: &dyn ClientChannel,
    ) -> bool {
        let Some(action) = error.action() else {
            return false;
        };
        let handler = self.handlers.read().await.get(&action).cloned();
        let Some(handler) = handler else {
            return false;
        };

        let ctx = ErrorContext {
            action,
            event,
            connection_id,
            message: translate(locale, error.message_key()).to_string(),
        };
        handler.handle(ctx, channel).await;
        true
    }

    /// Surfaces `error` to the connection: through its tagged handler when
    /// one fires, otherwise as a plain `error: true` event.
    pub async fn report(
        &self,
        error: &BookingError,
        event: EventName,
        connection_id: &ConnectionId,
        locale: Locale,
        channel: &dyn ClientChannel,
    ) {
        if self
            .dispatch(error, event, connection_id, locale, channel)
            .await
        {
            return;
        }
        let failure = ServerEvent::failure(
            event,
            connection_id.as_str(),
            translate(locale, error.message_key()),
            None,
        );
        channel.send(connection_id, failure).await;
    }
}

impl Default for ErrorActionRegistry {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}
