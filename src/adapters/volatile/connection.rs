//! Connection state tracking for the volatile tier.
//!
//! Every transport operation passes through a [`ConnectionGate`] that owns
//! the tier's connection state machine:
//!
//! ```text
//! Disconnected -> Connecting -> Ready
//!       Ready -> Reconnecting -> Ready
//!       Reconnecting -> Degraded -> Ready
//! ```
//!
//! Reconnection is polled rather than spawned: a failure arms a deadline,
//! and the first operation to arrive after the deadline becomes the probe
//! while everything else fails fast. After the attempt budget is exhausted
//! the gate degrades and probes only once per probe interval.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::domain::models::ReconnectConfig;
use crate::domain::ports::{TransportError, TransportResult};

/// Connection phase of the volatile tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No operation attempted yet.
    Disconnected,
    /// First operation in flight.
    Connecting,
    /// Last operation succeeded.
    Ready,
    /// Recent failure; probing on a backoff schedule.
    Reconnecting,
    /// Attempt budget exhausted; failing fast between recovery probes.
    Degraded,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Reconnecting => "reconnecting",
            Self::Degraded => "degraded",
        }
    }
}

/// Reconnection schedule: bounded attempts with exponential backoff.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Reconnect attempts before degrading.
    pub max_attempts: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Backoff before reconnect attempt `attempt` (0-indexed).
    ///
    /// Formula: min(initial_backoff * 2^attempt, max_backoff)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    /// Interval between recovery probes once degraded. Pinned to the
    /// backoff cap so degradation never probes faster than the last
    /// reconnect attempt did.
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        let config = ReconnectConfig::default();
        Self::from(&config)
    }
}

impl From<&ReconnectConfig> for ReconnectPolicy {
    fn from(config: &ReconnectConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }
}

/// Point-in-time view of the gate, for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSnapshot {
    pub state: ConnectionState,
    /// Reconnect attempts consumed in the current outage.
    pub attempts: u32,
    /// Time until the next probe is allowed, if one is scheduled.
    pub retry_in_ms: Option<u64>,
}

#[derive(Debug)]
struct GateState {
    phase: ConnectionState,
    attempts: u32,
    retry_at: Option<Instant>,
}

/// Serializes access to the volatile tier according to connection state.
///
/// Callers ask `check` for permission before each transport operation and
/// report the outcome with `on_success` / `on_failure`. The gate never
/// sleeps; backoff is expressed as a deadline before which `check` refuses.
pub struct ConnectionGate {
    policy: ReconnectPolicy,
    state: Mutex<GateState>,
}

impl ConnectionGate {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(GateState {
                phase: ConnectionState::Disconnected,
                attempts: 0,
                retry_at: None,
            }),
        }
    }

    /// Whether an operation may touch the transport right now.
    ///
    /// While reconnecting or degraded, exactly one caller per deadline is
    /// admitted as the probe; the rest fail fast.
    pub fn check(&self) -> TransportResult<()> {
        let mut st = self
            .state
            .lock()
            .map_err(|_| TransportError::Io("connection state poisoned".to_string()))?;

        match st.phase {
            ConnectionState::Ready | ConnectionState::Connecting => Ok(()),
            ConnectionState::Disconnected => {
                st.phase = ConnectionState::Connecting;
                Ok(())
            }
            ConnectionState::Reconnecting => {
                if probe_due(st.retry_at) {
                    // Claim the probe slot; concurrent callers keep failing
                    // fast until this attempt reports back.
                    st.retry_at = Some(Instant::now() + self.policy.backoff(st.attempts));
                    debug!(attempt = st.attempts + 1, "probing volatile tier");
                    Ok(())
                } else {
                    Err(TransportError::Unavailable(
                        "volatile tier reconnecting".to_string(),
                    ))
                }
            }
            ConnectionState::Degraded => {
                if probe_due(st.retry_at) {
                    st.retry_at = Some(Instant::now() + self.policy.probe_interval());
                    debug!("probing degraded volatile tier");
                    Ok(())
                } else {
                    Err(TransportError::Degraded)
                }
            }
        }
    }

    /// Record a successful operation.
    pub fn on_success(&self) {
        if let Ok(mut st) = self.state.lock() {
            if st.phase != ConnectionState::Ready {
                if matches!(
                    st.phase,
                    ConnectionState::Reconnecting | ConnectionState::Degraded
                ) {
                    info!(from = st.phase.as_str(), "volatile tier recovered");
                }
                st.phase = ConnectionState::Ready;
            }
            st.attempts = 0;
            st.retry_at = None;
        }
    }

    /// Record a failed operation and advance the state machine.
    pub fn on_failure(&self) {
        if let Ok(mut st) = self.state.lock() {
            match st.phase {
                ConnectionState::Ready
                | ConnectionState::Connecting
                | ConnectionState::Disconnected => {
                    st.phase = ConnectionState::Reconnecting;
                    st.attempts = 0;
                    st.retry_at = Some(Instant::now() + self.policy.backoff(0));
                    warn!(
                        retry_in_ms = self.policy.backoff(0).as_millis() as u64,
                        "volatile tier connection lost"
                    );
                }
                ConnectionState::Reconnecting => {
                    st.attempts = st.attempts.saturating_add(1);
                    if st.attempts >= self.policy.max_attempts {
                        st.phase = ConnectionState::Degraded;
                        st.retry_at = Some(Instant::now() + self.policy.probe_interval());
                        warn!(
                            attempts = st.attempts,
                            probe_interval_ms = self.policy.probe_interval().as_millis() as u64,
                            "volatile tier reconnect budget exhausted, degrading"
                        );
                    } else {
                        st.retry_at = Some(Instant::now() + self.policy.backoff(st.attempts));
                    }
                }
                ConnectionState::Degraded => {
                    st.retry_at = Some(Instant::now() + self.policy.probe_interval());
                    debug!("volatile tier recovery probe failed");
                }
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
            .lock()
            .map(|st| st.phase)
            .unwrap_or(ConnectionState::Degraded)
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        let now = Instant::now();
        if let Ok(st) = self.state.lock() {
            let retry_in_ms = st.retry_at.and_then(|at| {
                if at > now {
                    Some((at - now).as_millis() as u64)
                } else {
                    None
                }
            });
            ConnectionSnapshot {
                state: st.phase,
                attempts: st.attempts,
                retry_in_ms,
            }
        } else {
            ConnectionSnapshot {
                state: ConnectionState::Degraded,
                attempts: 0,
                retry_in_ms: None,
            }
        }
    }
}

fn probe_due(retry_at: Option<Instant>) -> bool {
    retry_at.is_none_or(|at| Instant::now() >= at)
}
