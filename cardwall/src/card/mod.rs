//! Card commands

mod add;
mod cover;
mod delete;
mod due_date;
mod get;
mod history;
mod label;
mod list;
mod members;
mod mv;
mod update;
mod vote;
mod weight;

pub use add::AddCard;
pub use cover::{RemoveCardCover, SetCardCover};
pub use delete::DeleteCard;
pub use due_date::SetCardDueDate;
pub use get::GetCard;
pub use history::GetCardHistory;
pub use label::ToggleCardLabel;
pub use list::ListCards;
pub use members::{
    available_users, favorites, AddCardMember, GetAvailableUsers, GetFavorites, RemoveCardMember,
};
pub use mv::{ArchiveCard, MoveCard};
pub use update::UpdateCard;
pub use vote::ToggleVote;
pub use weight::SetCardWeight;

use crate::action_log::{ActionLog, EventRegistry};
use crate::context::CardwallContext;
use crate::error::Result;
use crate::security::{authorize, Permission};
use crate::types::{Board, Card, CardId, ColumnId, UserId};

pub(crate) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "card_create",
        "Card \"{{ card }}\" has been added to column \"{{ column }}\"",
    );
    registry.register_template(
        "card_title",
        "Card \"{{ from }}\" has been renamed to \"{{ to }}\"",
    );
    registry.register_template(
        "card_description",
        "Description of card \"{{ card }}\" has been changed",
    );
    registry.register_template(
        "card_weight",
        "Card \"{{ card }}\" has been weighted from ({{ from }}) to ({{ to }})",
    );
    registry.register_template(
        "card_move",
        "Card \"{{ card }}\" has been moved from column \"{{ from }}\" to column \"{{ to }}\"",
    );
    registry.register_template("card_archive", "Card \"{{ card }}\" has been archived");
    registry.register_template("card_delete", "Card \"{{ card }}\" has been deleted");

    due_date::register_events(registry);
    members::register_events(registry);
    label::register_events(registry);
    vote::register_events(registry);
    cover::register_events(registry);
}

/// Load a card and its board, checking the user's permission on the board
pub(crate) async fn authorize_card(
    ctx: &CardwallContext,
    id: &CardId,
    user: &UserId,
    permission: Permission,
) -> Result<(Board, Card)> {
    let card = ctx.read_card(id).await?;
    let board = authorize(ctx, &card.board, user, permission).await?;
    Ok((board, card))
}

/// History of the card's board, projected onto the card
pub(crate) fn card_log(card: &Card) -> ActionLog {
    ActionLog::for_board(card.board.clone()).for_card(card.id.clone())
}

/// Put `card` at `index` in `column` (appended when absent) and renumber the
/// column. Writes every card whose position changed, `card` included.
pub(crate) async fn place_card(
    ctx: &CardwallContext,
    card: &mut Card,
    column: &ColumnId,
    index: Option<usize>,
) -> Result<()> {
    let mut cards = ctx.read_column_cards(column).await?;
    cards.retain(|c| c.id != card.id);
    let index = index.unwrap_or(cards.len()).min(cards.len());

    card.column = column.clone();
    cards.insert(index, card.clone());

    for (position, other) in cards.iter_mut().enumerate() {
        if other.id == card.id {
            card.index = position;
            ctx.write_card(card).await?;
        } else if other.index != position {
            other.index = position;
            ctx.write_card(other).await?;
        }
    }
    Ok(())
}

/// Renumber the cards of a column from zero
pub(crate) async fn reindex_column(ctx: &CardwallContext, column: &ColumnId) -> Result<()> {
    let cards = ctx.read_column_cards(column).await?;
    for (position, mut card) in cards.into_iter().enumerate() {
        if card.index != position {
            card.index = position;
            ctx.write_card(&card).await?;
        }
    }
    Ok(())
}
