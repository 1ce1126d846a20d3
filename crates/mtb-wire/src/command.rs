use std::fmt;
use std::str::FromStr;

use crate::error::WireError;

/// Control prefix that switches the scanner into command mode.
///
/// `SYN` `M` `CR`, sent verbatim before every verb.
pub const COMMAND_PREFIX: [u8; 3] = [0x16, 0x4D, 0x0D];

/// Terminator for settings that apply to the current power cycle only.
pub const TEMPORARY_TERMINATOR: u8 = b'!';

/// Terminator for settings the scanner stores across power cycles.
pub const PERMANENT_TERMINATOR: u8 = b'.';

/// Verb that enables the reporting / data-streaming mode.
pub const VERB_STREAMING_MODE: &str = "AISRDS";

/// Verb that selects the illumination profile.
pub const VERB_ILLUMINATION: &str = "AISILL";

/// Verb that selects output mode 1. The mode digit is part of the verb.
pub const VERB_OUTPUT_MODE: &str = "AISOMD1";

/// Whether a setting survives a scanner power cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Persistence {
    /// Applies to the current session only (`!`).
    #[default]
    Temporary,
    /// Stored in the scanner's non-volatile settings (`.`).
    Permanent,
}

impl Persistence {
    /// The terminator byte that closes a command with this persistence.
    pub fn terminator(self) -> u8 {
        match self {
            Self::Temporary => TEMPORARY_TERMINATOR,
            Self::Permanent => PERMANENT_TERMINATOR,
        }
    }
}

/// A single scanner configuration/control command.
///
/// Commands are built right before they are written to the transport and
/// dropped afterwards. Verbs are opaque tokens: no validation happens here,
/// an illegal verb is only noticed through the scanner's (missing) reply.
///
/// Wire layout:
///
/// ```text
/// ┌────────────────┬───────────────┬─────────────────────┬────────────┐
/// │ 16 4D 0D       │ verb (ASCII)  │ parameter (decimal) │ '!' or '.' │
/// │ command prefix │               │ optional, no sep.   │ terminator │
/// └────────────────┴───────────────┴─────────────────────┴────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command<'a> {
    pub verb: &'a str,
    pub parameter: Option<u32>,
    pub persistence: Persistence,
}

impl<'a> Command<'a> {
    /// A temporary command with no parameter.
    pub fn new(verb: &'a str) -> Self {
        Self {
            verb,
            parameter: None,
            persistence: Persistence::Temporary,
        }
    }

    /// Attach a numeric parameter, appended after the verb.
    #[must_use]
    pub fn with_parameter(mut self, parameter: u32) -> Self {
        self.parameter = Some(parameter);
        self
    }

    /// Mark the command as permanent (`.` terminator).
    #[must_use]
    pub fn permanent(mut self) -> Self {
        self.persistence = Persistence::Permanent;
        self
    }

    /// Encode the command into its wire bytes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtb_wire::Command;
    ///
    /// let bytes = Command::new("AISRDS").with_parameter(1).encode();
    /// assert_eq!(bytes, b"\x16\x4D\x0DAISRDS1!");
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let parameter = self.parameter.map(|p| p.to_string()).unwrap_or_default();
        let mut out = Vec::with_capacity(COMMAND_PREFIX.len() + self.verb.len() + parameter.len() + 1);
        out.extend_from_slice(&COMMAND_PREFIX);
        out.extend_from_slice(self.verb.as_bytes());
        out.extend_from_slice(parameter.as_bytes());
        out.push(self.persistence.terminator());
        out
    }
}

/// Free-function form of [`Command::encode`].
pub fn encode(verb: &str, parameter: Option<u32>, permanent: bool) -> Vec<u8> {
    let persistence = if permanent {
        Persistence::Permanent
    } else {
        Persistence::Temporary
    };
    Command {
        verb,
        parameter,
        persistence,
    }
    .encode()
}

/// Illumination / optimisation profiles accepted by `AISILL`.
///
/// ```text
/// ┌────────────────┬───────┬──────────────────────────────┐
/// │ Profile        │ Value │ Name on the command line     │
/// ├────────────────┼───────┼──────────────────────────────┤
/// │ PhoneOnly      │ 0     │ phone-only                   │
/// │ PaperOnly      │ 1     │ paper-only                   │
/// │ PaperOptimized │ 2     │ paper-optimized              │
/// │ PhoneOptimized │ 3     │ phone-optimized (default)    │
/// └────────────────┴───────┴──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IlluminationProfile {
    PhoneOnly,
    PaperOnly,
    PaperOptimized,
    #[default]
    PhoneOptimized,
}

impl IlluminationProfile {
    pub const ALL: [Self; 4] = [
        Self::PhoneOnly,
        Self::PaperOnly,
        Self::PaperOptimized,
        Self::PhoneOptimized,
    ];

    /// The numeric parameter sent to the scanner.
    pub fn value(self) -> u8 {
        match self {
            Self::PhoneOnly => 0,
            Self::PaperOnly => 1,
            Self::PaperOptimized => 2,
            Self::PhoneOptimized => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PhoneOnly => "phone-only",
            Self::PaperOnly => "paper-only",
            Self::PaperOptimized => "paper-optimized",
            Self::PhoneOptimized => "phone-optimized",
        }
    }
}

impl TryFrom<u8> for IlluminationProfile {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .ok_or(WireError::ProfileOutOfRange { value })
    }
}

impl FromStr for IlluminationProfile {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| WireError::UnknownProfile { name: s.to_string() })
    }
}

impl fmt::Display for IlluminationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fixed, order-significant configuration sent once at startup.
///
///   1. `AISRDS1!`  enable streaming mode
///   2. `AISILLn!`  illumination profile `n`
///   3. `AISOMD1!`  output mode 1
pub fn startup_sequence(illumination: IlluminationProfile) -> [Command<'static>; 3] {
    [
        Command::new(VERB_STREAMING_MODE).with_parameter(1),
        Command::new(VERB_ILLUMINATION).with_parameter(u32::from(illumination.value())),
        Command::new(VERB_OUTPUT_MODE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_mode_command_bytes() {
        let bytes = encode("AISRDS", Some(1), false);
        assert_eq!(
            bytes,
            [0x16, 0x4D, 0x0D, b'A', b'I', b'S', b'R', b'D', b'S', b'1', b'!']
        );
    }

    #[test]
    fn command_without_parameter() {
        assert_eq!(Command::new("AISOMD1").encode(), b"\x16\x4D\x0DAISOMD1!");
    }

    #[test]
    fn permanent_changes_only_terminator() {
        let temp = encode("AISILL", Some(3), false);
        let perm = encode("AISILL", Some(3), true);
        assert_eq!(temp.len(), perm.len());
        assert_eq!(temp[..temp.len() - 1], perm[..perm.len() - 1]);
        assert_eq!(*temp.last().unwrap(), b'!');
        assert_eq!(*perm.last().unwrap(), b'.');
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = Command::new("AISRDS").with_parameter(42).permanent();
        let b = Command::new("AISRDS").with_parameter(42).permanent();
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.encode(), encode("AISRDS", Some(42), true));
    }

    #[test]
    fn multi_digit_parameter_has_no_separator() {
        assert_eq!(encode("XYZ", Some(1024), false), b"\x16\x4D\x0DXYZ1024!");
    }

    #[test]
    fn verbs_are_not_validated() {
        assert_eq!(encode("", None, true), b"\x16\x4D\x0D.");
    }

    #[test]
    fn startup_sequence_order() {
        let cmds = startup_sequence(IlluminationProfile::PaperOnly);
        let encoded: Vec<Vec<u8>> = cmds.iter().map(Command::encode).collect();
        assert_eq!(encoded[0], b"\x16\x4D\x0DAISRDS1!");
        assert_eq!(encoded[1], b"\x16\x4D\x0DAISILL1!");
        assert_eq!(encoded[2], b"\x16\x4D\x0DAISOMD1!");
        assert!(cmds.iter().all(|c| c.persistence == Persistence::Temporary));
    }

    #[test]
    fn profile_values_and_names() {
        assert_eq!(IlluminationProfile::PhoneOnly.value(), 0);
        assert_eq!(IlluminationProfile::PhoneOptimized.value(), 3);
        assert_eq!(IlluminationProfile::default(), IlluminationProfile::PhoneOptimized);
        assert_eq!(
            "Paper_Optimized".parse::<IlluminationProfile>().unwrap(),
            IlluminationProfile::PaperOptimized
        );
        assert!(matches!(
            "torch".parse::<IlluminationProfile>(),
            Err(WireError::UnknownProfile { .. })
        ));
        assert!(matches!(
            IlluminationProfile::try_from(4),
            Err(WireError::ProfileOutOfRange { value: 4 })
        ));
        assert_eq!(
            IlluminationProfile::try_from(1).unwrap(),
            IlluminationProfile::PaperOnly
        );
    }
}
