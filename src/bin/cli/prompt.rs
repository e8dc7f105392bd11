use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearchStatus, PromptViMode};

/// Shows whether the form is in edit mode, e.g. `autores [g1] > `.
#[derive(Default)]
pub struct AutoresPrompt {
    pub editing: Option<String>,
}

impl Prompt for AutoresPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        match &self.editing {
            Some(guid) => Cow::Owned(format!("autores [{guid}] ")),
            None => Cow::Borrowed("autores "),
        }
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, prompt_mode: PromptEditMode) -> Cow<str> {
        match prompt_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                PromptViMode::Normal => "> ".into(),
                PromptViMode::Insert => "> ".into(),
            },
            PromptEditMode::Custom(str) => format!("({})", str).into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed(":> ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: reedline::PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}
