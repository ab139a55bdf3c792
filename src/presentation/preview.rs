//! Action Preview Rendering

use crossterm::style::Stylize;

use crate::domain::entities::{Action, ActionKind};

/// Lines listing the pending actions of a location
pub fn render_lines(location: &str, actions: &[Action], color: bool) -> Vec<String> {
    let adds = actions.iter().filter(|a| a.is_add()).count();
    let dels = actions.len() - adds;

    let header = format!(
        "Location '{}': {} to add, {} to delete",
        location, adds, dels
    );
    let mut lines = vec![if color {
        header.bold().to_string()
    } else {
        header
    }];

    for action in actions {
        let line = format!("  {}", action);
        lines.push(match (color, action.kind()) {
            (false, _) => line,
            (true, ActionKind::Add) => line.green().to_string(),
            (true, ActionKind::Del) => line.red().to_string(),
        });
    }

    lines
}
