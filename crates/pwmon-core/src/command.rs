// ── Command outcomes ──
//
// Save and pull share one message surface on the config panel.

/// Progress of the most recent save or pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum CommandOutcome {
    #[default]
    #[strum(serialize = "")]
    Idle,
    #[strum(serialize = "Saving...")]
    Saving,
    #[strum(serialize = "Saved.")]
    Saved,
    #[strum(serialize = "Save failed.")]
    SaveFailed,
    #[strum(serialize = "Pulling...")]
    Pulling,
    #[strum(serialize = "Pulled.")]
    Pulled,
    /// The collector answered, but not with `{"ok": true}`.
    #[strum(serialize = "Pull error.")]
    PullRejected,
    #[strum(serialize = "Pull failed.")]
    PullFailed,
}

/// Coarse state used for styling the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl CommandOutcome {
    pub fn phase(self) -> CommandPhase {
        match self {
            Self::Idle => CommandPhase::Idle,
            Self::Saving | Self::Pulling => CommandPhase::Pending,
            Self::Saved | Self::Pulled => CommandPhase::Succeeded,
            Self::SaveFailed | Self::PullRejected | Self::PullFailed => CommandPhase::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(CommandOutcome::Idle.to_string(), "");
        assert_eq!(CommandOutcome::Saving.to_string(), "Saving...");
        assert_eq!(CommandOutcome::Saved.to_string(), "Saved.");
        assert_eq!(CommandOutcome::SaveFailed.to_string(), "Save failed.");
        assert_eq!(CommandOutcome::Pulling.to_string(), "Pulling...");
        assert_eq!(CommandOutcome::Pulled.to_string(), "Pulled.");
        assert_eq!(CommandOutcome::PullRejected.to_string(), "Pull error.");
        assert_eq!(CommandOutcome::PullFailed.to_string(), "Pull failed.");
    }

    #[test]
    fn phases() {
        assert_eq!(CommandOutcome::Pulling.phase(), CommandPhase::Pending);
        assert_eq!(CommandOutcome::Saved.phase(), CommandPhase::Succeeded);
        assert_eq!(CommandOutcome::PullRejected.phase(), CommandPhase::Failed);
    }
}
