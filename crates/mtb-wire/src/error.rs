/// Errors raised while building scanner commands from user input.
///
/// Encoding itself never fails: the scanner firmware is the only judge of
/// whether a verb is legal. These variants cover the typed inputs that feed
/// the startup sequence, such as an illumination profile named on the
/// command line.
///
/// ```text
///   WireError
///   ├── UnknownProfile     ← profile name not one of the four fixed names
///   └── ProfileOutOfRange  ← numeric profile outside 0..=3
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error(
        "unknown illumination profile {name:?}, expected phone-only|paper-only|paper-optimized|phone-optimized"
    )]
    UnknownProfile { name: String },

    #[error("illumination profile {value} out of range, expected 0..=3")]
    ProfileOutOfRange { value: u8 },
}
