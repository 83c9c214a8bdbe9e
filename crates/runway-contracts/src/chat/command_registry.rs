#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommandAction {
    Help,
    ListPresets,
    ApplyPreset,
    Reset,
    Show,
    SelectLook,
    Quit,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: CommandAction,
}

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "help",
        action: CommandAction::Help,
    },
    CommandSpec {
        command: "presets",
        action: CommandAction::ListPresets,
    },
    CommandSpec {
        command: "reset",
        action: CommandAction::Reset,
    },
    CommandSpec {
        command: "show",
        action: CommandAction::Show,
    },
    CommandSpec {
        command: "quit",
        action: CommandAction::Quit,
    },
    CommandSpec {
        command: "exit",
        action: CommandAction::Quit,
    },
];

pub(crate) const ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "preset",
        action: CommandAction::ApplyPreset,
    },
    CommandSpec {
        command: "look",
        action: CommandAction::SelectLook,
    },
];

pub(crate) fn find_action(command: &str, specs: &[CommandSpec]) -> Option<CommandAction> {
    specs
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}

pub const DIRECTOR_HELP_COMMANDS: &[&str] = &[
    "/preset <name>",
    "/presets",
    "/reset",
    "/show",
    "/look <1|2>",
    "/help",
    "/quit",
];
