//! Board lookups

use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::security::{has_permission, Permission};
use crate::types::{Board, BoardId, UserId};

/// Read-side access to boards
#[derive(Debug, Clone, Copy)]
pub struct BoardsManager<'a> {
    ctx: &'a CardwallContext,
}

impl<'a> BoardsManager<'a> {
    pub fn new(ctx: &'a CardwallContext) -> Self {
        Self { ctx }
    }

    pub async fn get_by_id(&self, id: &BoardId) -> Result<Board> {
        self.ctx.read_board(id).await
    }

    pub async fn get_by_uri(&self, uri: &str) -> Result<Board> {
        self.ctx
            .read_all_boards()
            .await?
            .into_iter()
            .find(|board| board.uri == uri)
            .ok_or_else(|| CardwallError::BoardNotFound { id: uri.to_string() })
    }

    /// Lookup on behalf of a viewer.
    ///
    /// A board that exists but is hidden from the viewer yields
    /// `PermissionDenied`, never `BoardNotFound`.
    pub async fn get_by_id_for(&self, id: &BoardId, viewer: Option<&UserId>) -> Result<Board> {
        let board = self.get_by_id(id).await?;
        if has_permission(&board, viewer, Permission::View) {
            Ok(board)
        } else {
            Err(CardwallError::permission_denied(
                viewer.map_or("anonymous", UserId::as_str),
                Permission::View.as_str(),
            ))
        }
    }

    /// Templates the viewer can see, by title
    pub async fn templates(&self, viewer: Option<&UserId>) -> Result<Vec<Board>> {
        let mut templates: Vec<Board> = self
            .ctx
            .read_all_boards()
            .await?
            .into_iter()
            .filter(|board| board.is_template)
            .filter(|board| has_permission(board, viewer, Permission::View))
            .collect();
        templates.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(templates)
    }

    /// Non-template boards `user` belongs to
    pub async fn boards_of(&self, user: &UserId) -> Result<Vec<Board>> {
        Ok(self
            .ctx
            .read_all_boards()
            .await?
            .into_iter()
            .filter(|board| !board.is_template && board.has_member(user))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::types::Visibility;
    use cardwall_operations::Execute;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CardwallContext, Board) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let result = CreateBoard::new("alice", "Lookup")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board = ctx
            .read_board(&BoardId::from_string(result["id"].as_str().unwrap()))
            .await
            .unwrap();
        (temp, ctx, board)
    }

    #[tokio::test]
    async fn test_get_by_id_and_uri() {
        let (_temp, ctx, board) = setup().await;
        let manager = BoardsManager::new(&ctx);

        assert_eq!(manager.get_by_id(&board.id).await.unwrap().id, board.id);
        assert_eq!(manager.get_by_uri(&board.uri).await.unwrap().id, board.id);
        assert!(manager.get_by_uri("nope").await.unwrap_err().is_not_found());
        assert!(format!("{:?}", manager).contains("BoardsManager"));
    }

    #[tokio::test]
    async fn test_not_found_distinct_from_denied() {
        let (_temp, ctx, board) = setup().await;
        let manager = BoardsManager::new(&ctx);
        let outsider = UserId::from("mallory");

        let denied = manager.get_by_id_for(&board.id, Some(&outsider)).await;
        assert!(matches!(denied, Err(CardwallError::PermissionDenied { .. })));

        let missing = manager.get_by_id_for(&BoardId::new(), Some(&outsider)).await;
        assert!(matches!(missing, Err(CardwallError::BoardNotFound { .. })));

        let mut public = board.clone();
        public.set_visibility(Visibility::Public);
        ctx.write_board(&public).await.unwrap();
        assert!(manager.get_by_id_for(&board.id, None).await.is_ok());
    }
}
