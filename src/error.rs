// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `snooz_lib` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, transport communication, payload parsing, device setup and
//! command failures.
//!
//! A cancelled command is deliberately absent from this hierarchy. When a
//! newer command preempts an older one, the older one resolves with
//! [`CommandResultStatus::Cancelled`](crate::command::CommandResultStatus::Cancelled),
//! which is an expected outcome and never an error.

use std::time::Duration;

use thiserror::Error;

use crate::command::CommandResultStatus;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the device.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while parsing a device payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device could not be set up (unreachable or unparsable metadata).
    ///
    /// Hosts are expected to retry setup later.
    #[error("device setup failed: {0}")]
    Setup(String),

    /// A command reached the device but did not complete.
    #[error("command failed with status {status} after {duration:?}")]
    CommandFailed {
        /// The failure status reported by the session.
        status: CommandResultStatus,
        /// Time spent before the failure.
        duration: Duration,
    },

    /// A stored configuration entry could not be migrated.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Device was not found in the manager.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The feature does not support the requested operation.
    #[error("{feature} does not support {operation}")]
    UnsupportedFeature {
        /// The feature the operation was attempted on.
        feature: &'static str,
        /// The operation that was attempted.
        operation: &'static str,
    },
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A device address was empty.
    #[error("device address must not be empty")]
    EmptyAddress,

    /// A pairing token is not 16 hexadecimal characters.
    #[error("invalid pairing token: {0}")]
    InvalidToken(String),

    /// An unknown device model code.
    #[error("unknown device model: {0}")]
    UnknownModel(u8),

    /// An unknown firmware version code.
    #[error("unknown firmware version: {0}")]
    UnknownFirmwareVersion(u8),
}

/// Errors related to the BLE transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The connection was lost.
    #[error("device disconnected")]
    Disconnected,

    /// Writing to the device failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Reading from the device failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Operation timed out.
    #[error("operation timed out after {0} ms")]
    Timeout(u64),
}

/// Errors related to parsing device payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field was empty or missing.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A payload was not valid UTF-8.
    #[error("field {0} is not valid UTF-8")]
    InvalidUtf8(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
