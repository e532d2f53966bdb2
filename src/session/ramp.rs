// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linear level ramps for timed commands.

use std::time::Duration;

use crate::command::Command;
use crate::state::DeviceState;
use crate::types::Percentage;

/// Start and end level of one ramped channel, plus whether the channel is
/// held on while ramping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    from: Percentage,
    to: Percentage,
    hold_on: bool,
    powers_off: bool,
}

impl Span {
    fn plan(
        target_on: Option<bool>,
        target_level: Option<Percentage>,
        current_on: Option<bool>,
        current_level: Option<Percentage>,
    ) -> Option<Self> {
        let is_on = current_on == Some(true);
        let from = if target_on == Some(true) && !is_on {
            // fading in from off
            Percentage::MIN
        } else {
            current_level.unwrap_or(Percentage::MIN)
        };
        let to = match (target_on, target_level) {
            (Some(false), _) => Percentage::MIN,
            (_, Some(level)) => level,
            (Some(true), None) => current_level?,
            (None, None) => return None,
        };
        (from != to).then_some(Self {
            from,
            to,
            hold_on: target_on == Some(true) || is_on,
            powers_off: target_on == Some(false),
        })
    }

    fn at(&self, step: u32, steps: u32) -> Percentage {
        self.from.interpolate(self.to, step, steps)
    }

    /// Level the device keeps once the ramp is over.
    ///
    /// A fade-out ends powered off at the level it started from, so the next
    /// untimed power-on plays at that level again.
    fn settled(&self) -> Percentage {
        if self.powers_off { self.from } else { self.to }
    }
}

/// Intermediate writes leading up to a timed command.
///
/// The ramp covers `steps` writes spaced one interval apart, followed by the
/// write returned from [`Ramp::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ramp {
    sound: Option<Span>,
    fan: Option<Span>,
    steps: u32,
}

impl Ramp {
    /// Plans a ramp from `state` towards `command`.
    ///
    /// Returns `None` when the command has no duration or nothing to ramp.
    pub(crate) fn plan(state: &DeviceState, command: &Command, interval: Duration) -> Option<Self> {
        let duration = command.duration()?.as_duration();
        let sound = Span::plan(command.on(), command.volume(), state.on(), state.volume());
        let fan = Span::plan(
            command.fan_on(),
            command.fan_speed(),
            state.fan_on(),
            state.fan_speed(),
        );
        if sound.is_none() && fan.is_none() {
            return None;
        }

        let interval_ms = interval.as_millis().max(1);
        let steps = u32::try_from(duration.as_millis() / interval_ms)
            .unwrap_or(u32::MAX)
            .max(1);

        Some(Self { sound, fan, steps })
    }

    /// Returns the number of intermediate writes.
    pub(crate) fn steps(&self) -> u32 {
        self.steps
    }

    /// Returns the command for intermediate write `step` (`0..steps`).
    pub(crate) fn step(&self, step: u32) -> Command {
        let mut command = Command::new();
        if let Some(span) = self.sound {
            if span.hold_on {
                command = command.with_on(true);
            }
            command = command.with_volume(span.at(step, self.steps));
        }
        if let Some(span) = self.fan {
            if span.hold_on {
                command = command.with_fan_on(true);
            }
            command = command.with_fan_speed(span.at(step, self.steps));
        }
        command
    }

    /// Returns the final write for `command`.
    ///
    /// A ramped channel the command leaves without a level gets the level it
    /// settles at, so the device and `state.with_command(&final)` agree.
    pub(crate) fn finish(&self, command: &Command) -> Command {
        let mut last = *command;
        if let Some(span) = self.sound
            && command.volume().is_none()
        {
            last = last.with_volume(span.settled());
        }
        if let Some(span) = self.fan
            && command.fan_speed().is_none()
        {
            last = last.with_fan_speed(span.settled());
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;
    use crate::types::TransitionDuration;

    fn pct(value: u8) -> Percentage {
        Percentage::new(value).unwrap()
    }

    fn secs(value: u16) -> Option<TransitionDuration> {
        Some(TransitionDuration::new(value).unwrap())
    }

    #[test]
    fn no_duration_no_ramp() {
        let state = DeviceState::new();
        let cmd = command::turn_on(Some(pct(50)), None);
        assert!(Ramp::plan(&state, &cmd, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn volume_ramp_from_current_level() {
        let mut state = DeviceState::new();
        state.set_on(true);
        state.set_volume(pct(40));

        let cmd = command::turn_on(Some(pct(80)), secs(4));
        let ramp = Ramp::plan(&state, &cmd, Duration::from_secs(1)).unwrap();

        assert_eq!(ramp.steps(), 4);
        assert_eq!(ramp.step(0).volume(), Some(pct(40)));
        assert_eq!(ramp.step(2).volume(), Some(pct(60)));
        assert_eq!(ramp.step(3).volume(), Some(pct(70)));
        assert_eq!(ramp.step(3).on(), Some(true));
        assert!(ramp.step(3).fan_speed().is_none());
    }

    #[test]
    fn fade_in_starts_at_zero_when_off() {
        let mut state = DeviceState::new();
        state.set_on(false);
        state.set_volume(pct(70));

        let cmd = command::turn_on(None, secs(10));
        let ramp = Ramp::plan(&state, &cmd, Duration::from_secs(1)).unwrap();

        assert_eq!(ramp.step(0).volume(), Some(Percentage::MIN));
        assert_eq!(ramp.step(5).volume(), Some(pct(35)));
    }

    #[test]
    fn fade_out_to_zero() {
        let mut state = DeviceState::new();
        state.set_fan_on(true);
        state.set_fan_speed(pct(50));

        let cmd = command::turn_fan_off(secs(5));
        let ramp = Ramp::plan(&state, &cmd, Duration::from_secs(1)).unwrap();

        assert_eq!(ramp.steps(), 5);
        assert_eq!(ramp.step(1).fan_speed(), Some(pct(40)));
        assert_eq!(ramp.step(1).fan_on(), Some(true));
        assert!(ramp.step(1).volume().is_none());
    }

    #[test]
    fn same_level_no_ramp() {
        let mut state = DeviceState::new();
        state.set_on(true);
        state.set_volume(pct(30));

        let cmd = command::set_volume(pct(30)).with_duration(TransitionDuration::DEFAULT);
        assert!(Ramp::plan(&state, &cmd, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn unknown_level_without_target_no_ramp() {
        let cmd = command::turn_on(None, secs(10));
        assert!(Ramp::plan(&DeviceState::new(), &cmd, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn fade_in_finishes_at_stored_level() {
        let mut state = DeviceState::new();
        state.set_on(false);
        state.set_volume(pct(70));

        let cmd = command::turn_on(None, secs(10));
        let ramp = Ramp::plan(&state, &cmd, Duration::from_secs(1)).unwrap();
        let last = ramp.finish(&cmd);

        assert_eq!(last.on(), Some(true));
        assert_eq!(last.volume(), Some(pct(70)));
        assert_eq!(state.with_command(&last).volume(), Some(pct(70)));
    }

    #[test]
    fn fade_out_finishes_at_starting_level() {
        let mut state = DeviceState::new();
        state.set_on(true);
        state.set_volume(pct(70));
        state.set_fan_on(true);
        state.set_fan_speed(pct(40));

        let cmd = command::turn_off(secs(10)).with_fan_on(false);
        let ramp = Ramp::plan(&state, &cmd, Duration::from_secs(1)).unwrap();
        let last = ramp.finish(&cmd);

        assert_eq!(last.on(), Some(false));
        assert_eq!(last.volume(), Some(pct(70)));
        assert_eq!(last.fan_on(), Some(false));
        assert_eq!(last.fan_speed(), Some(pct(40)));
    }

    #[test]
    fn explicit_level_is_kept_on_finish() {
        let mut state = DeviceState::new();
        state.set_on(true);
        state.set_volume(pct(20));

        let cmd = command::turn_on(Some(pct(60)), secs(5));
        let ramp = Ramp::plan(&state, &cmd, Duration::from_secs(1)).unwrap();
        assert_eq!(ramp.finish(&cmd), cmd);
    }
}
