// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of an executed command.

use std::fmt;
use std::time::Duration;

use crate::error::TransportError;

/// Why a command did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandFailure {
    /// The session could not connect to the device.
    ConnectionFailed,
    /// The connection was lost while the command was in flight.
    Disconnected,
    /// The device rejected or failed a write.
    WriteFailed,
    /// The device did not acknowledge in time.
    Timeout,
}

impl From<&TransportError> for CommandFailure {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::ConnectionFailed(_) => Self::ConnectionFailed,
            TransportError::Disconnected => Self::Disconnected,
            TransportError::WriteFailed(_) | TransportError::ReadFailed(_) => Self::WriteFailed,
            TransportError::Timeout(_) => Self::Timeout,
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ConnectionFailed => "CONNECTION_FAILED",
            Self::Disconnected => "DISCONNECTED",
            Self::WriteFailed => "WRITE_FAILED",
            Self::Timeout => "TIMEOUT",
        };
        f.write_str(name)
    }
}

/// Status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandResultStatus {
    /// The device applied the command.
    Successful,
    /// A newer command preempted this one, or the session was closed.
    Cancelled,
    /// The command failed.
    Failed(CommandFailure),
}

impl fmt::Display for CommandResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successful => f.write_str("SUCCESSFUL"),
            Self::Cancelled => f.write_str("CANCELLED"),
            Self::Failed(failure) => failure.fmt(f),
        }
    }
}

/// Result of [`DeviceSession::execute_command`](crate::session::DeviceSession::execute_command).
///
/// Produced once per command and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    status: CommandResultStatus,
    duration: Duration,
}

impl CommandResult {
    /// Creates a new result.
    #[must_use]
    pub const fn new(status: CommandResultStatus, duration: Duration) -> Self {
        Self { status, duration }
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> CommandResultStatus {
        self.status
    }

    /// Returns the wall-clock time between submission and resolution.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns `true` if the command was applied.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        matches!(self.status, CommandResultStatus::Successful)
    }

    /// Returns `true` if the command was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.status, CommandResultStatus::Cancelled)
    }

    /// Returns the failure kind, if the command failed.
    #[must_use]
    pub const fn failure(&self) -> Option<CommandFailure> {
        match self.status {
            CommandResultStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
