//! Core types for the board engine

mod action;
mod board;
mod card;
mod ids;
mod user;

pub use action::{ActionLogEntry, ActionTarget, Payload};
pub use board::{Access, Board, Column, Label, Role, Visibility};
pub use card::{Card, Comment};
pub use ids::{ActionId, AssetId, BoardId, CardId, ColumnId, CommentId, LabelId, TokenId, UserId};
pub use user::{InvitationToken, PendingUser, User, UserSource};
