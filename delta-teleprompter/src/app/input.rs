use winit::keyboard::{Key, NamedKey};

/// What a key press asks the teleprompter to do.
/// Whether it applies depends on the screen; see [`super::Session::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Jump forward through the script
    ScrollForward,
    /// Jump back towards the start
    ScrollBack,
    Faster,
    Slower,
    GrowFont,
    ShrinkFont,
    NarrowerText,
    WiderText,
    ShorterText,
    TallerText,
    ToggleAlignment,
    ToggleFullScreen,
    /// Enter or Space: start, pause, resume, leave help or replay
    Confirm,
    Help,
    Quit,
}

impl Command {
    /// Whether holding the key down keeps repeating the command.
    pub fn repeats(self) -> bool {
        matches!(
            self,
            Self::ScrollForward
                | Self::ScrollBack
                | Self::Faster
                | Self::Slower
                | Self::GrowFont
                | Self::ShrinkFont
                | Self::NarrowerText
                | Self::WiderText
                | Self::ShorterText
                | Self::TallerText
        )
    }
}

/// Maps a logical key to its command.  Keypad `+`/`-` report the same characters as the main keys.
pub fn command_for(key: Key<&str>) -> Option<Command> {
    let command = match key {
        Key::Named(named) => match named {
            NamedKey::ArrowUp => Command::ScrollForward,
            NamedKey::ArrowDown => Command::ScrollBack,
            NamedKey::ArrowRight => Command::Faster,
            NamedKey::ArrowLeft => Command::Slower,
            NamedKey::F5 => Command::NarrowerText,
            NamedKey::F6 => Command::WiderText,
            NamedKey::F7 => Command::ShorterText,
            NamedKey::F8 => Command::TallerText,
            NamedKey::F2 => Command::ToggleAlignment,
            NamedKey::F11 => Command::ToggleFullScreen,
            NamedKey::Enter | NamedKey::Space => Command::Confirm,
            NamedKey::F1 => Command::Help,
            NamedKey::Escape => Command::Quit,
            _ => return None,
        },
        Key::Character(text) => match text {
            "+" | "=" => Command::GrowFont,
            "-" => Command::ShrinkFont,
            " " => Command::Confirm,
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}
