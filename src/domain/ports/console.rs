//! Console Port
//!
//! Renders pending actions for review and collects yes/no answers.
//! Implementations can be interactive (terminal) or automatic (policy).

use tracing::info;

use crate::domain::entities::Action;

/// Preview and confirmation channel
pub trait Console {
    /// Show the actions about to be executed for a location
    fn preview(&self, location: &str, actions: &[Action]);

    /// Ask a yes/no question
    fn confirm(&self, question: &str) -> bool;
}

impl<C: Console + ?Sized> Console for Box<C> {
    fn preview(&self, location: &str, actions: &[Action]) {
        (**self).preview(location, actions)
    }

    fn confirm(&self, question: &str) -> bool {
        (**self).confirm(question)
    }
}

/// Console answering every question with a fixed value
///
/// Use `AutoConsole::yes()` for `--yes` and in tests.
pub struct AutoConsole {
    answer: bool,
}

impl AutoConsole {
    pub fn yes() -> Self {
        Self { answer: true }
    }
}

impl Console for AutoConsole {
    fn preview(&self, location: &str, actions: &[Action]) {
        for action in actions {
            info!(location, "{}", action);
        }
    }

    fn confirm(&self, question: &str) -> bool {
        info!("{} {}", question, if self.answer { "yes" } else { "no" });
        self.answer
    }
}
