// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session tuning parameters.

use std::time::Duration;

/// Timeouts and pacing for a [`DeviceSession`](super::DeviceSession).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use snooz_lib::session::SessionConfig;
///
/// let config = SessionConfig::default()
///     .with_command_timeout(Duration::from_secs(5))
///     .with_transition_interval(Duration::from_millis(500));
///
/// assert_eq!(config.command_timeout(), Duration::from_secs(5));
/// assert_eq!(config.connect_timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    command_timeout: Duration,
    connect_timeout: Duration,
    transition_interval: Duration,
}

impl SessionConfig {
    /// Default timeout for a single write or read.
    pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for opening the link.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default pause between ramp steps.
    pub const DEFAULT_TRANSITION_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            command_timeout: Self::DEFAULT_COMMAND_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            transition_interval: Self::DEFAULT_TRANSITION_INTERVAL,
        }
    }

    /// Sets the per-operation timeout for writes and reads.
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the timeout for opening the link.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the pause between ramp steps.
    ///
    /// A zero interval is raised to one millisecond.
    #[must_use]
    pub const fn with_transition_interval(mut self, interval: Duration) -> Self {
        self.transition_interval = if interval.is_zero() {
            Duration::from_millis(1)
        } else {
            interval
        };
        self
    }

    /// Returns the per-operation timeout.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the pause between ramp steps.
    #[must_use]
    pub const fn transition_interval(&self) -> Duration {
        self.transition_interval
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
