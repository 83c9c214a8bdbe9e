use super::command_registry::{find_action, CommandAction, ARG_COMMANDS, NO_ARG_COMMANDS};
use crate::scene::Preset;

/// One classified line of interactive director input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorInput {
    Noop,
    Help,
    ListPresets,
    ApplyPreset(Preset),
    Reset,
    Show,
    /// Zero-based look index; `/look 1` selects index 0.
    SelectLook(usize),
    Quit,
    /// Free text for the model-backed command parser.
    Command(String),
    Invalid { command: String, reason: String },
    Unknown { command: String, arg: String },
}

fn invalid(command: &str, reason: impl Into<String>) -> DirectorInput {
    DirectorInput::Invalid {
        command: command.to_string(),
        reason: reason.into(),
    }
}

fn parse_look_number(command: &str, arg: &str) -> DirectorInput {
    match arg.trim().parse::<usize>() {
        Ok(number) if number >= 1 => DirectorInput::SelectLook(number - 1),
        _ => invalid(command, format!("expected a look number starting at 1, got '{arg}'")),
    }
}

pub fn parse_director_input(text: &str) -> DirectorInput {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return DirectorInput::Noop;
    }

    if let Some(slash_tail) = raw_trimmed.strip_prefix('/') {
        let command_len = slash_tail
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if command_len > 0 {
            let command = slash_tail[..command_len].to_ascii_lowercase();
            let arg = slash_tail[command_len..].trim();

            if let Some(action) = find_action(&command, NO_ARG_COMMANDS) {
                return match action {
                    CommandAction::Help => DirectorInput::Help,
                    CommandAction::ListPresets => DirectorInput::ListPresets,
                    CommandAction::Reset => DirectorInput::Reset,
                    CommandAction::Show => DirectorInput::Show,
                    _ => DirectorInput::Quit,
                };
            }

            if let Some(action) = find_action(&command, ARG_COMMANDS) {
                if arg.is_empty() {
                    return invalid(&command, "missing argument");
                }
                return match action {
                    CommandAction::ApplyPreset => match Preset::parse(arg) {
                        Some(preset) => DirectorInput::ApplyPreset(preset),
                        None => invalid(&command, format!("unknown preset '{arg}'")),
                    },
                    _ => parse_look_number(&command, arg),
                };
            }

            return DirectorInput::Unknown {
                command,
                arg: arg.to_string(),
            };
        }
    }

    DirectorInput::Command(raw_trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_noop() {
        assert_eq!(parse_director_input("   "), DirectorInput::Noop);
    }

    #[test]
    fn preset_command_accepts_names_and_aliases() {
        assert_eq!(
            parse_director_input("/preset Cyberpunk Tokyo"),
            DirectorInput::ApplyPreset(Preset::CyberpunkTokyo)
        );
        assert_eq!(
            parse_director_input("/PRESET red_carpet"),
            DirectorInput::ApplyPreset(Preset::RedCarpet)
        );
        assert!(matches!(
            parse_director_input("/preset disco"),
            DirectorInput::Invalid { .. }
        ));
        assert!(matches!(
            parse_director_input("/preset"),
            DirectorInput::Invalid { .. }
        ));
    }

    #[test]
    fn look_numbers_are_one_based() {
        assert_eq!(parse_director_input("/look 2"), DirectorInput::SelectLook(1));
        assert!(matches!(
            parse_director_input("/look 0"),
            DirectorInput::Invalid { .. }
        ));
    }

    #[test]
    fn no_arg_commands() {
        assert_eq!(parse_director_input("/presets"), DirectorInput::ListPresets);
        assert_eq!(parse_director_input("/reset"), DirectorInput::Reset);
        assert_eq!(parse_director_input("/show"), DirectorInput::Show);
        assert_eq!(parse_director_input("/help"), DirectorInput::Help);
        assert_eq!(parse_director_input("/exit"), DirectorInput::Quit);
    }

    #[test]
    fn unknown_and_free_text() {
        assert_eq!(
            parse_director_input("/magic foo bar"),
            DirectorInput::Unknown {
                command: "magic".to_string(),
                arg: "foo bar".to_string()
            }
        );
        assert_eq!(
            parse_director_input("  make it moodier with more fog "),
            DirectorInput::Command("make it moodier with more fog".to_string())
        );
        assert_eq!(
            parse_director_input("/ not a command"),
            DirectorInput::Command("/ not a command".to_string())
        );
    }
}
