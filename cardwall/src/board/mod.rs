//! Board commands

mod access;
mod archive;
mod create;
mod delete;
mod get;
mod history;
mod manager;
mod template;
mod update;

pub use access::SetBoardAccess;
pub use archive::{ArchiveBoard, RestoreBoard};
pub use create::CreateBoard;
pub use delete::DeleteBoard;
pub use get::{GetBoard, ListTemplates};
pub use history::GetBoardHistory;
pub use manager::BoardsManager;
pub use template::{InstallTemplates, SaveAsTemplate, EMPTY_TEMPLATE, TODO_TEMPLATE};
pub use update::UpdateBoard;

use crate::action_log::EventRegistry;
use crate::context::CardwallContext;
use crate::error::Result;
use crate::types::{Board, Card, Column, Label};
use serde_json::{json, Value};
use std::collections::HashMap;

pub(crate) fn register_events(registry: &mut EventRegistry) {
    registry.register_template("board_create", "Board \"{{ board }}\" has been created");
    registry.register_template(
        "board_title",
        "Board \"{{ from }}\" has been renamed to \"{{ to }}\"",
    );
    registry.register_template(
        "board_description",
        "Description of board \"{{ board }}\" has been changed",
    );
    registry.register_template(
        "board_weighting",
        "Card weighting on board \"{{ board }}\" is now {{ state }}",
    );
    registry.register_template(
        "board_visibility",
        concat!(
            "Board \"{{ board }}\" is now {{ visibility }} ",
            "(comments: {{ comments }}, votes: {{ votes }})"
        ),
    );
    registry.register_template("board_archive", "Board \"{{ board }}\" has been archived");
    registry.register_template("board_restore", "Board \"{{ board }}\" has been restored");
}

/// Write the columns of a new board, then its archive column and the board
pub(crate) async fn write_scaffold(
    ctx: &CardwallContext,
    board: &mut Board,
    columns: &[Column],
) -> Result<()> {
    for column in columns {
        board.insert_column(board.count_columns(), column.id.clone());
        ctx.write_column(column).await?;
    }

    let mut archive = Column::new(board.id.clone(), &ctx.config().archive_column_title);
    archive.id = board.archive_column.clone();
    archive.archive = true;
    ctx.write_column(&archive).await?;

    ctx.write_board(board).await
}

/// Copy the non-archived cards of `source` into the matching new columns
pub(crate) async fn copy_cards(
    ctx: &CardwallContext,
    source: &Board,
    target: &Board,
    column_map: &[(Column, Column)],
) -> Result<usize> {
    let mut copied = 0;
    for (from, to) in column_map {
        for card in ctx.read_column_cards(&from.id).await? {
            if card.archived || card.board != source.id {
                continue;
            }
            let copy = card.copy_to(target.id.clone(), to.id.clone());
            ctx.write_card(&copy).await?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Fresh columns mirroring the visible columns of `source`
pub(crate) async fn mirror_columns(
    ctx: &CardwallContext,
    source: &Board,
    target: &Board,
) -> Result<Vec<(Column, Column)>> {
    let mut pairs = Vec::new();
    for id in source.visible_columns() {
        let from = ctx.read_column(id).await?;
        let mut to = Column::new(target.id.clone(), from.title.clone());
        to.nb_max_cards = from.nb_max_cards;
        pairs.push((from, to));
    }
    Ok(pairs)
}

/// Labels of `source` with fresh ids
pub(crate) fn mirror_labels(source: &Board) -> Vec<Label> {
    source
        .labels
        .iter()
        .map(|label| Label::new(label.title.clone()).with_color(label.color.clone()))
        .collect()
}

/// Board with its columns expanded and card counts
pub(crate) async fn board_view(ctx: &CardwallContext, board: &Board) -> Result<Value> {
    let cards = ctx.read_board_cards(&board.id).await?;
    let mut counts: HashMap<_, usize> = HashMap::new();
    for card in &cards {
        *counts.entry(card.column.clone()).or_default() += 1;
    }

    let columns = ctx.read_board_columns(board).await?;
    let columns: Vec<Value> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            json!({
                "id": column.id,
                "title": column.title,
                "index": index,
                "archive": column.archive,
                "nb_max_cards": column.nb_max_cards,
                "cards": counts.get(&column.id).copied().unwrap_or(0),
            })
        })
        .collect();

    let mut value = serde_json::to_value(board)?;
    value["columns"] = json!(columns);
    value["count_columns"] = json!(board.count_columns());
    Ok(value)
}

/// Delete a card through its extensions
pub(crate) async fn purge_card(ctx: &CardwallContext, card: Card) -> Result<Card> {
    crate::extension::CardView::new(ctx, card).delete(ctx).await
}
