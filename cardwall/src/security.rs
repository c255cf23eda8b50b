//! Board permission policy

use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::types::{Access, Board, BoardId, UserId, Visibility};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a user may want to do on a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    View,
    Edit,
    Manage,
    AddUsers,
    Comment,
    Vote,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Manage => "manage",
            Self::AddUsers => "add users",
            Self::Comment => "comment",
            Self::Vote => "vote",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `user` holds `permission` on `board`.
///
/// `None` is an anonymous visitor: it may view public boards and nothing else.
pub fn has_permission(board: &Board, user: Option<&UserId>, permission: Permission) -> bool {
    let member = user.is_some_and(|u| board.has_member(u));
    match permission {
        Permission::View => board.visibility == Visibility::Public || member,
        Permission::Edit => member,
        Permission::Manage | Permission::AddUsers => user.is_some_and(|u| board.has_manager(u)),
        Permission::Comment => access_allows(board.comments_allowed, user.is_some(), member),
        Permission::Vote => access_allows(board.votes_allowed, user.is_some(), member),
    }
}

fn access_allows(access: Access, registered: bool, member: bool) -> bool {
    match access {
        Access::Off => false,
        Access::Members => member,
        Access::Public => registered,
    }
}

/// Fail with `PermissionDenied` unless `user` holds `permission`
pub fn require(board: &Board, user: &UserId, permission: Permission) -> Result<()> {
    if has_permission(board, Some(user), permission) {
        Ok(())
    } else {
        Err(CardwallError::permission_denied(user, permission.as_str()))
    }
}

/// Load a board and check that `user` may act on it
pub(crate) async fn authorize(
    ctx: &CardwallContext,
    board: &BoardId,
    user: &UserId,
    permission: Permission,
) -> Result<Board> {
    let board = ctx.read_board(board).await?;
    require(&board, user, permission)?;
    Ok(board)
}
