//! Board label commands
//!
//! Labels belong to a board and are toggled on its cards with
//! [`ToggleCardLabel`](crate::card::ToggleCardLabel).

mod add;
mod delete;
mod list;
mod update;

pub use add::AddLabel;
pub use delete::DeleteLabel;
pub use list::ListLabels;
pub use update::UpdateLabel;

use crate::action_log::EventRegistry;
use crate::auto_color::is_valid_color;
use crate::error::{CardwallError, Result};

pub(crate) fn register_events(registry: &mut EventRegistry) {
    registry.register_template("board_add_label", "Label \"{{ label }}\" has been added");
    registry.register_template(
        "board_update_label",
        "Label \"{{ from }}\" has been changed to \"{{ to }}\"",
    );
    registry.register_template("board_delete_label", "Label \"{{ label }}\" has been deleted");
}

/// Normalize a color to lowercase hex without `#`
pub(crate) fn parse_color(color: &str) -> Result<String> {
    let color = color.trim().trim_start_matches('#');
    if !is_valid_color(color) {
        return Err(CardwallError::invalid_value(
            "color",
            format!("expected 6 hex digits, got \"{color}\""),
        ));
    }
    Ok(color.to_ascii_lowercase())
}
