use thiserror::Error;

use super::control_key::ControlKey;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("action list must contain at least one label")]
    EmptyActions,
}

/// Ordered action labels, each held for `frames_per_action` consecutive frames.
///
/// The mapping is not cyclic: once every action's bucket has been consumed,
/// no action is active for the remaining frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSchedule {
    actions: Vec<String>,
    frames_per_action: usize,
}

impl ActionSchedule {
    /// Builds a schedule. When `frames_per_action` is `None` it is derived as
    /// `frame_count / actions.len()`, which may be 0 for short or unknown-length
    /// videos; a zero bucket size means no action is ever active.
    pub fn new(
        actions: Vec<String>,
        frame_count: usize,
        frames_per_action: Option<usize>,
    ) -> Result<Self, ScheduleError> {
        if actions.is_empty() {
            return Err(ScheduleError::EmptyActions);
        }
        let frames_per_action = frames_per_action.unwrap_or(frame_count / actions.len());
        Ok(Self {
            actions: actions.into_iter().map(|a| a.to_lowercase()).collect(),
            frames_per_action,
        })
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn frames_per_action(&self) -> usize {
        self.frames_per_action
    }

    /// Lower-cased label active at `frame_index`, or `None`.
    pub fn active_label(&self, frame_index: usize) -> Option<&str> {
        active_label(frame_index, self.frames_per_action, &self.actions)
    }

    /// Icon to highlight at `frame_index`. Labels that match no icon
    /// highlight nothing.
    pub fn active_key(&self, frame_index: usize) -> Option<ControlKey> {
        self.active_label(frame_index).and_then(ControlKey::from_label)
    }
}

/// Splits a whitespace-separated action list such as `"w a a s d"`.
pub fn parse_action_list(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// Maps a frame index to the action label active at that frame.
///
/// Returns `None` past the last action's bucket and for every frame when
/// `frames_per_action` is 0.
pub fn active_label<S: AsRef<str>>(
    frame_index: usize,
    frames_per_action: usize,
    actions: &[S],
) -> Option<&str> {
    if frames_per_action == 0 {
        return None;
    }
    actions
        .get(frame_index / frames_per_action)
        .map(|a| a.as_ref())
}
