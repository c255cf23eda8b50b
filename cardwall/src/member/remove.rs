//! RemoveBoardMember command

use super::display_name;
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::extension::{CardView, BOARD_MEMBER_REMOVED};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{Board, BoardId, CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Remove a user from a board and from every card of the board.
///
/// `user` may also be the email of a pending invitation, which is then
/// cancelled. Members may remove themselves; removing anyone else takes a
/// manager.
#[operation(
    verb = "remove",
    noun = "member",
    description = "Remove a user or a pending invitation from a board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveBoardMember {
    /// The acting user
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// Username, or email of a pending invitation
    pub user: String,
}

impl RemoveBoardMember {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            user: user.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let user = UserId::from(self.user.as_str());
        let permission = if user == self.actor {
            Permission::Edit
        } else {
            Permission::Manage
        };
        let mut board = authorize(ctx, &self.board, &self.actor, permission).await?;

        if board.has_member(&user) {
            self.remove_member(ctx, &mut board, user).await
        } else {
            self.cancel_invitation(ctx, &mut board).await
        }
    }

    async fn remove_member(
        &self,
        ctx: &CardwallContext,
        board: &mut Board,
        user: UserId,
    ) -> Result<Value> {
        if board.has_manager(&user) && board.managers.len() == 1 {
            return Err(CardwallError::invalid_operation(
                "cannot remove the last manager of a board",
            ));
        }
        board.remove_member(&user);
        ctx.write_board(board).await?;
        let cards = detach_from_cards(ctx, board, &user).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_remove_member",
                payload(json!({
                    "user_id": user,
                    "user": display_name(ctx, &user).await?,
                    "board": board.title,
                })),
            )
            .await?;
        info!(board = %board.id, user = %user, cards = cards.len(), "removed board member");
        Ok(json!({ "removed": true, "user": user, "cards": cards }))
    }

    async fn cancel_invitation(&self, ctx: &CardwallContext, board: &mut Board) -> Result<Value> {
        let token = ctx
            .read_board_tokens(board)
            .await?
            .into_iter()
            .find(|t| t.email.eq_ignore_ascii_case(&self.user))
            .ok_or_else(|| {
                CardwallError::invalid_operation(format!(
                    "{} is not a member of board \"{}\"",
                    self.user, board.title
                ))
            })?;
        if !board.has_manager(&self.actor) {
            return Err(CardwallError::permission_denied(
                &self.actor,
                Permission::Manage.as_str(),
            ));
        }

        board.pending.remove(&token.id);
        ctx.write_board(board).await?;
        ctx.delete_token_file(&token.id).await?;

        // a registered invitee may already be assigned to cards
        let cards = match ctx.find_user_by_email(&token.email).await? {
            Some(invitee) if !board.has_member(&invitee.username) => {
                detach_from_cards(ctx, board, &invitee.username).await?
            }
            _ => Vec::new(),
        };

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_cancel_invitation",
                payload(json!({ "email": token.email, "board": board.title })),
            )
            .await?;
        info!(board = %board.id, email = %token.email, cards = cards.len(), "cancelled invitation");
        Ok(json!({ "removed": true, "invitation": token.id, "cards": cards }))
    }
}

/// Notify every card of the board that `user` left, returning the cards that changed
async fn detach_from_cards(
    ctx: &CardwallContext,
    board: &Board,
    user: &UserId,
) -> Result<Vec<CardId>> {
    let event = payload(json!({ "user_id": user }));
    let mut cards = Vec::new();
    for card in ctx.read_board_cards(&board.id).await? {
        let mut view = CardView::new(ctx, card);
        if view.emit_event(ctx, BOARD_MEMBER_REMOVED, &event).await? {
            cards.push(view.card().id.clone());
        }
    }
    Ok(cards)
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for RemoveBoardMember {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result["cards"]
            .as_array()
            .map(|cards| {
                cards
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::{AddCard, AddCardMember};
    use crate::member::{AddBoardMember, InviteMember};
    use crate::types::User;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CardwallContext, String, String) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        for name in ["bob", "carol"] {
            ctx.write_user(&User::external(name, format!("{name}@example.com"), name))
                .await
                .unwrap();
        }
        let board = CreateBoard::new("alice", "Squad")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = board["id"].as_str().unwrap().to_string();
        for name in ["bob", "carol"] {
            AddBoardMember::new("alice", id.as_str(), name)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }
        let column = board["columns"][0]["id"].as_str().unwrap().to_string();
        (temp, ctx, id, column)
    }

    #[tokio::test]
    async fn test_remove_cascades_to_cards() {
        let (_temp, ctx, board, column) = setup().await;
        let mut cards = Vec::new();
        for title in ["a", "b", "c"] {
            let card = AddCard::new("alice", column.as_str(), title)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
            cards.push(card["id"].as_str().unwrap().to_string());
        }
        for card in &cards[..2] {
            AddCardMember::new("alice", card.as_str(), "bob")
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }
        AddCardMember::new("alice", cards[2].as_str(), "carol")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = RemoveBoardMember::new("alice", board.as_str(), "bob")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let mut affected: Vec<_> = result["cards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c.as_str().unwrap().to_string())
            .collect();
        affected.sort();
        let mut expected = cards[..2].to_vec();
        expected.sort();
        assert_eq!(affected, expected);

        let stored = ctx.read_board(&BoardId::from(board.as_str())).await.unwrap();
        assert!(!stored.has_member(&UserId::from("bob")));
        for card in ctx.read_board_cards(&stored.id).await.unwrap() {
            assert!(!card.has_member(&UserId::from("bob")));
        }
        let third = ctx.read_card(&CardId::from(cards[2].as_str())).await.unwrap();
        assert_eq!(third.members, vec![UserId::from("carol")]);
    }

    #[tokio::test]
    async fn test_remove_non_member_fails() {
        let (_temp, ctx, board, _column) = setup().await;
        let result = RemoveBoardMember::new("alice", board.as_str(), "mallory")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(CardwallError::InvalidOperation { .. })));
    }

    #[tokio::test]
    async fn test_last_manager_cannot_leave() {
        let (_temp, ctx, board, _column) = setup().await;
        let result = RemoveBoardMember::new("alice", board.as_str(), "alice")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(CardwallError::InvalidOperation { .. })));

        // members may leave on their own
        RemoveBoardMember::new("carol", board.as_str(), "carol")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let denied = RemoveBoardMember::new("bob", board.as_str(), "alice")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(denied, Err(CardwallError::PermissionDenied { .. })));
    }

    #[tokio::test]
    async fn test_remove_pending_cancels_invitation() {
        let (_temp, ctx, board, _column) = setup().await;
        let invited = InviteMember::new("alice", board.as_str(), "dave@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let token = invited["token"].as_str().unwrap();

        RemoveBoardMember::new("alice", board.as_str(), "DAVE@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let stored = ctx.read_board(&BoardId::from(board.as_str())).await.unwrap();
        assert!(stored.pending.is_empty());
        let gone = ctx.read_token(&crate::types::TokenId::from(token)).await;
        assert!(matches!(gone, Err(CardwallError::TokenNotFound { .. })));
    }

    #[tokio::test]
    async fn test_cancel_invitation_unassigns_registered_invitee() {
        let (_temp, ctx, board, column) = setup().await;
        ctx.write_user(&User::external("dave", "dave@example.com", "Dave"))
            .await
            .unwrap();
        InviteMember::new("alice", board.as_str(), "dave@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let card = AddCard::new("alice", column.as_str(), "Pairing")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let card_id = card["id"].as_str().unwrap().to_string();
        let assigned = AddCardMember::new("alice", card_id.as_str(), "dave")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(assigned["added"], true);

        let result = RemoveBoardMember::new("alice", board.as_str(), "dave@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["cards"], json!([card_id]));

        let stored = ctx.read_card(&CardId::from(card_id.as_str())).await.unwrap();
        assert!(!stored.has_member(&UserId::from("dave")));
    }
}
