//! Heartbeat registry: connection liveness and reservation locks.
//!
//! The registry is the only owner of the connection table and of the
//! reservation lock map (`reservation → connection`). Every open
//! connection gets one timer task that pings it every interval and
//! escalates silence:
//!
//! ```text
//! elapsed since last pong   action
//! ─────────────────────────────────────────────────────────────
//! ≤ 1× interval             ping
//! > 1× interval             notify (onPong, error) + ping
//! > 2× interval             notify if not yet sent for this stall,
//!                           then cancel (onNoPing, error) + drop
//! ```
//!
//! The timer stops when the connection record is removed, whichever path
//! removes it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, RwLock};
use tokio::time::{Instant, MissedTickBehavior};

use crate::domain::booking_session::{BookingError, EventName, ServerEvent};
use crate::domain::foundation::{ConnectionId, ReservationId};
use crate::domain::i18n::{translate, Locale, MessageKey};
use crate::ports::{ClientChannel, OutboundFrame, OutboundSender};

use super::ErrorActionRegistry;

/// Tunables for liveness checking.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Ping period; also the warning threshold. Twice this is fatal.
    pub interval: Duration,
    /// Locale for connections that did not ask for one.
    pub default_locale: Locale,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            default_locale: Locale::default(),
        }
    }
}

/// Result of one liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatStatus {
    /// Pong seen within one interval.
    Healthy,
    /// Past the warning threshold; the client was notified.
    Unstable,
    /// Past the fatal threshold; the connection was dropped.
    Lost,
    /// No such connection.
    Unknown,
}

struct ConnectionEntry {
    sender: OutboundSender,
    last_ping: Instant,
    reservation_id: Option<ReservationId>,
    locale: Locale,
    /// Whether the current stall has already produced a warning.
    warned: bool,
    /// Dropping this stops the connection's timer task.
    _timer: oneshot::Sender<()>,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    locks: HashMap<ReservationId, ConnectionId>,
}

struct Inner {
    state: RwLock<RegistryState>,
    error_actions: Arc<ErrorActionRegistry>,
    config: HeartbeatConfig,
    active_timers: AtomicUsize,
}

/// Tracks every live connection, pings it, and arbitrates reservation
/// locks (one connection per reservation, one reservation per connection).
///
/// Cheap to clone; clones share the same tables.
#[derive(Clone)]
pub struct HeartbeatRegistry {
    inner: Arc<Inner>,
}

impl HeartbeatRegistry {
    pub fn new(config: HeartbeatConfig, error_actions: Arc<ErrorActionRegistry>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(RegistryState::default()),
                error_actions,
                config,
                active_timers: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &HeartbeatConfig {
        &self.inner.config
    }

    pub fn error_actions(&self) -> &Arc<ErrorActionRegistry> {
        &self.inner.error_actions
    }

    /// Creates the connection record, starts its timer and pings it
    /// immediately. If `reservation_id` is given the lock is attempted too.
    ///
    /// Returns false only when the requested reservation is already held
    /// by another connection; the connection itself is registered either
    /// way. Re-adding a known connection replaces the old record.
    pub async fn add_connection(
        &self,
        connection_id: ConnectionId,
        sender: OutboundSender,
        reservation_id: Option<ReservationId>,
        locale: Option<Locale>,
    ) -> bool {
        self.remove_connection(&connection_id).await;

        let locale = locale.unwrap_or(self.inner.config.default_locale);
        let (stop_tx, stop_rx) = oneshot::channel();
        let entry = ConnectionEntry {
            sender,
            last_ping: Instant::now(),
            reservation_id: None,
            locale,
            warned: false,
            _timer: stop_tx,
        };
        self.inner
            .state
            .write()
            .await
            .connections
            .insert(connection_id.clone(), entry);

        self.spawn_timer(connection_id.clone(), stop_rx);
        self.send_ping(&connection_id, locale).await;

        tracing::debug!(connection_id = %connection_id, %locale, "Connection registered");

        match reservation_id {
            Some(reservation_id) => {
                self.register_reservation(&connection_id, &reservation_id)
                    .await
            }
            None => true,
        }
    }

    /// Locks `reservation_id` for `connection_id`.
    ///
    /// Returns true if the reservation was free or already held by this
    /// connection. Returns false, changing nothing, if another connection
    /// holds it or the connection is unknown. A connection that held a
    /// different reservation releases it first.
    pub async fn register_reservation(
        &self,
        connection_id: &ConnectionId,
        reservation_id: &ReservationId,
    ) -> bool {
        let mut guard = self.inner.state.write().await;
        let state = &mut *guard;

        let Some(entry) = state.connections.get_mut(connection_id) else {
            return false;
        };
        if let Some(holder) = state.locks.get(reservation_id) {
            let granted = holder == connection_id;
            if !granted {
                tracing::info!(
                    connection_id = %connection_id,
                    reservation_id = %reservation_id,
                    holder = %holder,
                    "Reservation already locked"
                );
            }
            return granted;
        }

        if let Some(previous) = entry.reservation_id.replace(reservation_id.clone()) {
            state.locks.remove(&previous);
        }
        state
            .locks
            .insert(reservation_id.clone(), connection_id.clone());
        tracing::debug!(
            connection_id = %connection_id,
            reservation_id = %reservation_id,
            "Reservation locked"
        );
        true
    }

    /// Records a liveness acknowledgment. Returns false for unknown
    /// connections.
    pub async fn update_last_ping(&self, connection_id: &ConnectionId) -> bool {
        let mut state = self.inner.state.write().await;
        match state.connections.get_mut(connection_id) {
            Some(entry) => {
                entry.last_ping = Instant::now();
                entry.warned = false;
                true
            }
            None => false,
        }
    }

    /// One liveness check; the timer task calls this every interval.
    ///
    /// Both thresholds are evaluated on every check, so a single late check
    /// can go straight past the fatal one. The client still gets the
    /// warning first in that case.
    pub async fn check_connection(&self, connection_id: &ConnectionId) -> HeartbeatStatus {
        let interval = self.inner.config.interval;
        let (elapsed, warned, locale) = {
            let state = self.inner.state.read().await;
            match state.connections.get(connection_id) {
                Some(entry) => (
                    Instant::now().saturating_duration_since(entry.last_ping),
                    entry.warned,
                    entry.locale,
                ),
                None => return HeartbeatStatus::Unknown,
            }
        };

        if elapsed > interval * 2 {
            if !warned {
                self.warn_unstable(connection_id, locale).await;
            }
            tracing::warn!(
                connection_id = %connection_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "No pong within fatal threshold, dropping connection"
            );
            self.inner
                .error_actions
                .report(
                    &BookingError::ConnectionLost,
                    EventName::OnNoPing,
                    connection_id,
                    locale,
                    self,
                )
                .await;
            // The cancel handler normally did this already.
            self.disconnect(connection_id).await;
            return HeartbeatStatus::Lost;
        }

        if elapsed > interval {
            tracing::warn!(
                connection_id = %connection_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "Connection unstable"
            );
            self.warn_unstable(connection_id, locale).await;
            self.send_ping(connection_id, locale).await;
            return HeartbeatStatus::Unstable;
        }

        self.send_ping(connection_id, locale).await;
        HeartbeatStatus::Healthy
    }

    /// Stops the timer, releases the held reservation and deletes the
    /// record. Returns false if there was nothing to remove.
    pub async fn remove_connection(&self, connection_id: &ConnectionId) -> bool {
        self.take_connection(connection_id).await.is_some()
    }

    /// Removes every connection, closing each socket. Used at shutdown.
    pub async fn shutdown(&self) {
        let entries: Vec<(ConnectionId, ConnectionEntry)> = {
            let mut state = self.inner.state.write().await;
            state.locks.clear();
            state.connections.drain().collect()
        };
        let count = entries.len();
        for (_, entry) in entries {
            let _ = entry.sender.send(OutboundFrame::Close);
        }
        tracing::info!(connections = count, "Heartbeat registry shut down");
    }

    pub async fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.inner
            .state
            .read()
            .await
            .connections
            .contains_key(connection_id)
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.state.read().await.connections.len()
    }

    pub async fn connection_locale(&self, connection_id: &ConnectionId) -> Option<Locale> {
        self.inner
            .state
            .read()
            .await
            .connections
            .get(connection_id)
            .map(|entry| entry.locale)
    }

    /// Which connection holds `reservation_id`, if any.
    pub async fn reservation_holder(&self, reservation_id: &ReservationId) -> Option<ConnectionId> {
        self.inner
            .state
            .read()
            .await
            .locks
            .get(reservation_id)
            .cloned()
    }

    /// Which reservation `connection_id` holds, if any.
    pub async fn held_reservation(&self, connection_id: &ConnectionId) -> Option<ReservationId> {
        self.inner
            .state
            .read()
            .await
            .connections
            .get(connection_id)
            .and_then(|entry| entry.reservation_id.clone())
    }

    /// Number of timer tasks still running.
    pub fn active_timer_count(&self) -> usize {
        self.inner.active_timers.load(Ordering::SeqCst)
    }

    async fn take_connection(&self, connection_id: &ConnectionId) -> Option<ConnectionEntry> {
        let mut guard = self.inner.state.write().await;
        let state = &mut *guard;
        let entry = state.connections.remove(connection_id)?;
        if let Some(reservation_id) = &entry.reservation_id {
            if state.locks.get(reservation_id) == Some(connection_id) {
                state.locks.remove(reservation_id);
            }
        }
        tracing::debug!(
            connection_id = %connection_id,
            reservation_id = ?entry.reservation_id,
            "Connection removed"
        );
        Some(entry)
    }

    async fn warn_unstable(&self, connection_id: &ConnectionId, locale: Locale) {
        if let Some(entry) = self
            .inner
            .state
            .write()
            .await
            .connections
            .get_mut(connection_id)
        {
            entry.warned = true;
        }
        self.inner
            .error_actions
            .report(
                &BookingError::ConnectionUnstable,
                EventName::OnPong,
                connection_id,
                locale,
                self,
            )
            .await;
    }

    async fn send_ping(&self, connection_id: &ConnectionId, locale: Locale) {
        let ping = ServerEvent::new(
            EventName::Ping,
            connection_id.as_str(),
            translate(locale, MessageKey::Ping),
        );
        tracing::trace!(connection_id = %connection_id, "Ping");
        self.send(connection_id, ping).await;
    }

    fn spawn_timer(&self, connection_id: ConnectionId, mut stop: oneshot::Receiver<()>) {
        let registry = self.clone();
        let period = self.inner.config.interval;
        // First deadline counts from registration, not from the task's first poll.
        let first_tick = Instant::now() + period;
        self.inner.active_timers.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        match registry.check_connection(&connection_id).await {
                            HeartbeatStatus::Lost | HeartbeatStatus::Unknown => break,
                            HeartbeatStatus::Healthy | HeartbeatStatus::Unstable => {}
                        }
                    }
                }
            }
            registry.inner.active_timers.fetch_sub(1, Ordering::SeqCst);
            tracing::trace!(connection_id = %connection_id, "Heartbeat timer stopped");
        });
    }
}

#[async_trait]
impl ClientChannel for HeartbeatRegistry {
    async fn send(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        let state = self.inner.state.read().await;
        match state.connections.get(connection_id) {
            Some(entry) => entry.sender.send(OutboundFrame::Event(event)).is_ok(),
            None => false,
        }
    }

    async fn broadcast(&self, event: ServerEvent) -> usize {
        let state = self.inner.state.read().await;
        state
            .connections
            .values()
            .filter(|entry| {
                entry
                    .sender
                    .send(OutboundFrame::Event(event.clone()))
                    .is_ok()
            })
            .count()
    }

    async fn disconnect(&self, connection_id: &ConnectionId) {
        if let Some(entry) = self.take_connection(connection_id).await {
            let _ = entry.sender.send(OutboundFrame::Close);
        }
    }
}
