//! Board-level types: Board, Column, Label and the access-control enums

use super::ids::{BoardId, ColumnId, LabelId, TokenId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who can see a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// Who may comment on / vote for cards of a board.
///
/// Ordered from most to least restrictive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Off,
    #[default]
    Members,
    Public,
}

impl Access {
    /// The setting after the board becomes private
    pub fn for_private_board(self) -> Self {
        match self {
            Self::Public => Self::Members,
            other => other,
        }
    }
}

/// Role of a user on a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Manager => "manager",
        }
    }
}

/// The board: root aggregate for columns, membership and access settings.
///
/// Columns and cards live in their own files; the board keeps the column
/// order. A user sits in at most one of `members` / `managers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    /// Stable, human-readable address of the board
    pub uri: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub comments_allowed: Access,
    #[serde(default)]
    pub votes_allowed: Access,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub archived: bool,
    /// Whether cards carry a weight
    #[serde(default)]
    pub weighting_cards: bool,
    #[serde(default)]
    pub members: BTreeSet<UserId>,
    #[serde(default)]
    pub managers: BTreeSet<UserId>,
    /// Outstanding invitations
    #[serde(default)]
    pub pending: BTreeSet<TokenId>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Column order, archive column included
    #[serde(default)]
    pub columns: Vec<ColumnId>,
    pub archive_column: ColumnId,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Board {
    /// Create a board with a fresh id; the archive column id is reserved but
    /// the column itself must still be written.
    pub fn new(title: impl Into<String>) -> Self {
        let id = BoardId::new();
        let title = title.into();
        let uri = Self::make_uri(&title, &id);
        let archive_column = ColumnId::new();
        let now = Utc::now();
        Self {
            id,
            uri,
            title,
            description: String::new(),
            visibility: Visibility::Private,
            comments_allowed: Access::Members,
            votes_allowed: Access::Members,
            is_template: false,
            archived: false,
            weighting_cards: false,
            members: BTreeSet::new(),
            managers: BTreeSet::new(),
            pending: BTreeSet::new(),
            labels: Vec::new(),
            columns: vec![archive_column.clone()],
            archive_column,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Slug of the title followed by the tail of the id.
    fn make_uri(title: &str, id: &BoardId) -> String {
        let slug: String = title
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let suffix = &id.as_str()[id.as_str().len().saturating_sub(8)..];
        if slug.is_empty() {
            suffix.to_lowercase()
        } else {
            format!("{}-{}", slug, suffix.to_lowercase())
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Member in either role
    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user) || self.managers.contains(user)
    }

    pub fn has_manager(&self, user: &UserId) -> bool {
        self.managers.contains(user)
    }

    pub fn role_of(&self, user: &UserId) -> Option<Role> {
        if self.managers.contains(user) {
            Some(Role::Manager)
        } else if self.members.contains(user) {
            Some(Role::Member)
        } else {
            None
        }
    }

    /// Everyone on the board, managers included
    pub fn all_members(&self) -> BTreeSet<UserId> {
        self.members.union(&self.managers).cloned().collect()
    }

    /// Add a user with the given role. Existing members are left untouched;
    /// returns whether the user was inserted.
    pub fn add_member(&mut self, user: UserId, role: Role) -> bool {
        if self.has_member(&user) {
            return false;
        }
        match role {
            Role::Member => self.members.insert(user),
            Role::Manager => self.managers.insert(user),
        }
    }

    /// Drop a user from both roles; returns whether they were on the board
    pub fn remove_member(&mut self, user: &UserId) -> bool {
        let was_member = self.members.remove(user);
        let was_manager = self.managers.remove(user);
        was_member || was_manager
    }

    /// Swap a user between the member and manager sets, returning the new
    /// role. Fails for non-members and for the last manager.
    pub fn toggle_role(&mut self, user: &UserId) -> Option<Role> {
        match self.role_of(user)? {
            Role::Member => {
                self.members.remove(user);
                self.managers.insert(user.clone());
                Some(Role::Manager)
            }
            Role::Manager => {
                if self.managers.len() == 1 {
                    return None;
                }
                self.managers.remove(user);
                self.members.insert(user.clone());
                Some(Role::Member)
            }
        }
    }

    // =========================================================================
    // Visibility and access
    // =========================================================================

    /// Change visibility. Going private downgrades public comment/vote
    /// access to members; going public keeps the current settings.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.visibility == Visibility::Public && visibility == Visibility::Private {
            self.comments_allowed = self.comments_allowed.for_private_board();
            self.votes_allowed = self.votes_allowed.for_private_board();
        }
        self.visibility = visibility;
    }

    /// Set comment access, clamped for private boards
    pub fn set_comments_allowed(&mut self, access: Access) {
        self.comments_allowed = self.clamp_access(access);
    }

    /// Set vote access, clamped for private boards
    pub fn set_votes_allowed(&mut self, access: Access) {
        self.votes_allowed = self.clamp_access(access);
    }

    fn clamp_access(&self, access: Access) -> Access {
        match self.visibility {
            Visibility::Private => access.for_private_board(),
            Visibility::Public => access,
        }
    }

    // =========================================================================
    // Columns and labels
    // =========================================================================

    /// Number of columns, the archive column excluded
    pub fn count_columns(&self) -> usize {
        self.visible_columns().count()
    }

    /// Columns in display order, the archive column excluded
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnId> {
        self.columns.iter().filter(move |id| **id != self.archive_column)
    }

    pub fn is_archive_column(&self, id: &ColumnId) -> bool {
        self.archive_column == *id
    }

    /// Insert a column at `index` among visible columns (clamped); the
    /// archive column stays last.
    pub fn insert_column(&mut self, index: usize, id: ColumnId) {
        self.columns.retain(|c| *c != self.archive_column);
        let index = index.min(self.columns.len());
        self.columns.insert(index, id);
        self.columns.push(self.archive_column.clone());
    }

    pub fn find_label(&self, id: &LabelId) -> Option<&Label> {
        self.labels.iter().find(|label| label.id == *id)
    }

    pub fn find_label_mut(&mut self, id: &LabelId) -> Option<&mut Label> {
        self.labels.iter_mut().find(|label| label.id == *id)
    }

    /// Bump the modification time
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// A column: an ordered stage of the board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub board: BoardId,
    pub title: String,
    /// True only for the board's archive column
    #[serde(default)]
    pub archive: bool,
    /// Maximum number of cards, unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_max_cards: Option<usize>,
}

impl Column {
    pub fn new(board: BoardId, title: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(),
            board,
            title: title.into(),
            archive: false,
            nb_max_cards: None,
        }
    }

    /// Whether a column holding `count` cards takes one more; 0 means no limit
    pub fn accepts(&self, count: usize) -> bool {
        self.nb_max_cards
            .filter(|&max| max > 0)
            .map_or(true, |max| count < max)
    }
}

/// A board label that can be put on cards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub id: LabelId,
    pub title: String,
    /// 6-character hex color code without #
    pub color: String,
}

impl Label {
    /// Create a label colored from its title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let color = crate::auto_color::auto_color(&title).to_string();
        Self {
            id: LabelId::new(),
            title,
            color,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(visibility: Visibility, comments: Access, votes: Access) -> Board {
        let mut board = Board::new("Test");
        board.visibility = visibility;
        board.comments_allowed = comments;
        board.votes_allowed = votes;
        board
    }

    #[test]
    fn test_private_to_public_keeps_access() {
        let mut board = board_with(Visibility::Private, Access::Off, Access::Members);
        board.set_visibility(Visibility::Public);
        assert_eq!(board.visibility, Visibility::Public);
        assert_eq!(board.comments_allowed, Access::Off);
        assert_eq!(board.votes_allowed, Access::Members);
    }

    #[test]
    fn test_public_to_private_downgrades_public_access() {
        let mut board = board_with(Visibility::Public, Access::Public, Access::Public);
        board.set_visibility(Visibility::Private);
        assert_eq!(board.visibility, Visibility::Private);
        assert_eq!(board.comments_allowed, Access::Members);
        assert_eq!(board.votes_allowed, Access::Members);
    }

    #[test]
    fn test_public_to_private_keeps_lower_access() {
        let mut board = board_with(Visibility::Public, Access::Members, Access::Off);
        board.set_visibility(Visibility::Private);
        assert_eq!(board.comments_allowed, Access::Members);
        assert_eq!(board.votes_allowed, Access::Off);
    }

    #[test]
    fn test_round_trip_never_upgrades() {
        let mut board = board_with(Visibility::Public, Access::Public, Access::Members);
        board.set_visibility(Visibility::Private);
        assert_eq!(
            (board.comments_allowed, board.votes_allowed),
            (Access::Members, Access::Members)
        );
        board.set_visibility(Visibility::Public);
        assert_eq!(board.visibility, Visibility::Public);
        assert_eq!(
            (board.comments_allowed, board.votes_allowed),
            (Access::Members, Access::Members)
        );
    }

    #[test]
    fn test_transition_table_is_total() {
        let accesses = [Access::Off, Access::Members, Access::Public];
        let visibilities = [Visibility::Private, Visibility::Public];
        for from in visibilities {
            for to in visibilities {
                for comments in accesses {
                    for votes in accesses {
                        let mut board = board_with(from, comments, votes);
                        board.set_visibility(to);
                        assert_eq!(board.visibility, to);
                        let downgrade = from == Visibility::Public && to == Visibility::Private;
                        let expect = |a: Access| if downgrade { a.for_private_board() } else { a };
                        assert_eq!(board.comments_allowed, expect(comments));
                        assert_eq!(board.votes_allowed, expect(votes));
                    }
                }
            }
        }
    }

    #[test]
    fn test_private_board_clamps_public_access() {
        let mut board = Board::new("Test");
        board.set_comments_allowed(Access::Public);
        assert_eq!(board.comments_allowed, Access::Members);
        board.set_visibility(Visibility::Public);
        board.set_votes_allowed(Access::Public);
        assert_eq!(board.votes_allowed, Access::Public);
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut board = Board::new("Test");
        let alice = UserId::from("alice");
        assert!(board.add_member(alice.clone(), Role::Member));
        assert!(!board.add_member(alice.clone(), Role::Manager));
        assert_eq!(board.role_of(&alice), Some(Role::Member));
        assert_eq!(board.members.len(), 1);
        assert!(board.managers.is_empty());
    }

    #[test]
    fn test_has_member_covers_managers() {
        let mut board = Board::new("Test");
        let boss = UserId::from("boss");
        board.add_member(boss.clone(), Role::Manager);
        assert!(board.has_member(&boss));
        assert!(board.has_manager(&boss));
        assert!(!board.has_member(&UserId::from("stranger")));
    }

    #[test]
    fn test_toggle_role_twice_restores() {
        let mut board = Board::new("Test");
        let boss = UserId::from("boss");
        let alice = UserId::from("alice");
        board.add_member(boss.clone(), Role::Manager);
        board.add_member(alice.clone(), Role::Member);
        let (members, managers) = (board.members.clone(), board.managers.clone());

        assert_eq!(board.toggle_role(&alice), Some(Role::Manager));
        assert!(board.members.is_empty());
        assert_eq!(board.managers.len(), 2);

        assert_eq!(board.toggle_role(&alice), Some(Role::Member));
        assert_eq!(board.members, members);
        assert_eq!(board.managers, managers);
    }

    #[test]
    fn test_toggle_last_manager_refused() {
        let mut board = Board::new("Test");
        let boss = UserId::from("boss");
        board.add_member(boss.clone(), Role::Manager);
        assert_eq!(board.toggle_role(&boss), None);
        assert!(board.has_manager(&boss));
        assert_eq!(board.toggle_role(&UserId::from("nobody")), None);
    }

    #[test]
    fn test_archive_column_stays_last() {
        let mut board = Board::new("Test");
        let a = ColumnId::new();
        let b = ColumnId::new();
        board.insert_column(0, a.clone());
        board.insert_column(0, b.clone());
        assert_eq!(board.count_columns(), 2);
        assert_eq!(board.columns, vec![b, a, board.archive_column.clone()]);
    }

    #[test]
    fn test_uri_from_title() {
        let board = Board::new("My Project!");
        assert!(board.uri.starts_with("my-project-"));
        assert_eq!(board.uri.len(), "my-project-".len() + 8);
    }

    #[test]
    fn test_column_capacity() {
        let mut column = Column::new(BoardId::new(), "Doing");
        assert!(column.accepts(100));
        column.nb_max_cards = Some(2);
        assert!(column.accepts(1));
        assert!(!column.accepts(2));
    }
}
