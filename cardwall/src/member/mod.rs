//! Board membership commands
//!
//! A user is either a member or a manager of a board. Invitations are
//! addressed to an email and stay pending on the board until accepted or
//! cancelled.

mod add;
mod invite;
mod list;
mod remove;
mod role;

pub use add::AddBoardMember;
pub use invite::{AcceptInvitation, InviteMember};
pub use list::ListBoardMembers;
pub use remove::RemoveBoardMember;
pub use role::ToggleRole;

use crate::action_log::EventRegistry;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::types::UserId;

pub(crate) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "board_add_member",
        "User {{ user }} has been added to board \"{{ board }}\"",
    );
    registry.register_template(
        "board_remove_member",
        "User {{ user }} has been removed from board \"{{ board }}\"",
    );
    registry.register_template(
        "board_role",
        "User {{ user }} is now {{ role }} of board \"{{ board }}\"",
    );
    registry.register_template(
        "board_invite",
        "{{ email }} has been invited to board \"{{ board }}\"",
    );
    registry.register_template("board_accept", "User {{ user }} has joined board \"{{ board }}\"");
    registry.register_template(
        "board_cancel_invitation",
        "Invitation of {{ email }} to board \"{{ board }}\" has been cancelled",
    );
}

/// Full name of a registered user, or the username for unknown users
pub(crate) async fn display_name(ctx: &CardwallContext, user: &UserId) -> Result<String> {
    match ctx.read_user(user).await {
        Ok(user) => Ok(user.fullname),
        Err(CardwallError::UserNotFound { .. }) => Ok(user.to_string()),
        Err(e) => Err(e),
    }
}
