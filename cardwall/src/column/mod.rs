//! Column commands

mod add;
mod delete;
mod get;
mod list;
mod mv;
mod update;

pub use add::AddColumn;
pub use delete::DeleteColumn;
pub use get::GetColumn;
pub use list::ListColumns;
pub use mv::MoveColumn;
pub use update::UpdateColumn;

use crate::action_log::EventRegistry;
use crate::context::CardwallContext;
use crate::error::Result;
use crate::security::{authorize, Permission};
use crate::types::{Board, Column, ColumnId, UserId};

pub(crate) fn register_events(registry: &mut EventRegistry) {
    registry.register_template("column_create", "Column \"{{ column }}\" has been added");
    registry.register_template("column_delete", "Column \"{{ column }}\" has been deleted");
    registry.register_template(
        "column_title",
        "Column \"{{ from }}\" has been renamed to \"{{ to }}\"",
    );
    registry.register_template(
        "column_limit",
        "Card limit of column \"{{ column }}\" is now {{ limit }}",
    );
    registry.register_template(
        "column_move",
        "Column \"{{ column }}\" has been moved to position {{ index }}",
    );
}

/// Load a column and its board, checking the user's permission on the board
pub(crate) async fn authorize_column(
    ctx: &CardwallContext,
    id: &ColumnId,
    user: &UserId,
    permission: Permission,
) -> Result<(Board, Column)> {
    let column = ctx.read_column(id).await?;
    let board = authorize(ctx, &column.board, user, permission).await?;
    Ok((board, column))
}
