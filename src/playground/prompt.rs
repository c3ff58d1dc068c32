//! Prompt showing the session phase

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use crate::session::Phase;

/// Prompt for the interactive playground
pub struct PlaygroundPrompt {
    /// Live capture, e.g. `@al`, or `None` when idle
    capture: Option<String>,
    /// Whether the menu is open for the capture
    open: bool,
}

impl PlaygroundPrompt {
    pub fn new(phase: &Phase) -> Self {
        match phase {
            Phase::Idle => Self {
                capture: None,
                open: false,
            },
            Phase::Pending(m) => Self {
                capture: Some(format!("{}{}", m.key, m.text)),
                open: false,
            },
            Phase::Active(m) => Self {
                capture: Some(format!("{}{}", m.key, m.text)),
                open: true,
            },
        }
    }
}

impl Prompt for PlaygroundPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        match (&self.capture, self.open) {
            (None, _) => "mentions> ".into(),
            (Some(capture), false) => format!("mentions [{capture}…]> ").into(),
            (Some(capture), true) => format!("mentions [{capture}]> ").into(),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
