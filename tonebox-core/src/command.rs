//! Single-byte serial command set.
//!
//! | Byte    | Effect                 |
//! |---------|------------------------|
//! | `I` `i` | LED on                 |
//! | `O` `o` | LED off                |
//! | `F` `f` | LED flashing           |
//! | `H` `h` | print the command list |
//! | `T` `t` | play the preset tune   |
//!
//! Anything else is ignored. Replies are fixed ASCII lines; the transport
//! appends [`LINE_END`].

use crate::error::CommandError;
use crate::flags::{ControlFlags, LedMode};

/// Terminator appended to every transmitted line.
pub const LINE_END: &[u8] = b"\r\n";

/// Start-up banner, one entry per line.
pub const BANNER: [&str; 3] = ["-----------------", "~ tonebox RP2350 ~", "-----------------"];

/// Reply to `H`.
pub const HELP_TEXT: &str = "Commands: I=LED on, O=LED off, F=flash LED, H=help, T=play tune";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    LedOn,
    LedOff,
    LedFlash,
    Help,
    PlayTune,
}

impl TryFrom<u8> for Command {
    type Error = CommandError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte.to_ascii_uppercase() {
            b'I' => Ok(Command::LedOn),
            b'O' => Ok(Command::LedOff),
            b'F' => Ok(Command::LedFlash),
            b'H' => Ok(Command::Help),
            b'T' => Ok(Command::PlayTune),
            _ => Err(CommandError::Unrecognized(byte)),
        }
    }
}

/// What the serial task must do after a command has updated the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Nothing to send; the LED mode may have changed.
    None,
    /// The LED mode changed to the given value.
    LedChanged(LedMode),
    /// Transmit [`HELP_TEXT`].
    Help,
}

impl Command {
    /// Apply the command to `flags`.
    pub fn execute(self, flags: &ControlFlags) -> Response {
        match self {
            Command::LedOn => {
                flags.set_led_mode(LedMode::On);
                Response::LedChanged(LedMode::On)
            }
            Command::LedOff => {
                flags.set_led_mode(LedMode::Off);
                Response::LedChanged(LedMode::Off)
            }
            Command::LedFlash => {
                flags.set_led_mode(LedMode::Flashing);
                Response::LedChanged(LedMode::Flashing)
            }
            Command::Help => Response::Help,
            Command::PlayTune => {
                flags.set_play_preset(true);
                Response::None
            }
        }
    }
}

/// Parse and execute one received byte. Unrecognized bytes leave `flags`
/// untouched and yield [`Response::None`].
pub fn dispatch(byte: u8, flags: &ControlFlags) -> Response {
    match Command::try_from(byte) {
        Ok(cmd) => cmd.execute(flags),
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("ignoring serial byte: {}", _e);
            Response::None
        }
    }
}
