//! Card types: Card, Comment

use super::ids::{AssetId, BoardId, CardId, ColumnId, CommentId, LabelId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A card: the unit of work on a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board: BoardId,
    pub column: ColumnId,
    /// Position inside the column
    #[serde(default)]
    pub index: usize,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<AssetId>,
    /// Assigned users, in assignment order
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default)]
    pub labels: BTreeSet<LabelId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub votes: BTreeSet<UserId>,
    /// Set while the card sits in the archive column
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(board: BoardId, column: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            board,
            column,
            index: 0,
            title: title.into(),
            description: String::new(),
            due_date: None,
            weight: None,
            cover: None,
            members: Vec::new(),
            labels: BTreeSet::new(),
            comments: Vec::new(),
            votes: BTreeSet::new(),
            archived: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Remove a user from the card; returns whether they were assigned
    pub fn remove_member(&mut self, user: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user);
        self.members.len() != before
    }

    pub fn find_comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == *id)
    }

    pub fn find_comment_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == *id)
    }

    /// Whether the due date is strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.archived && self.due_date.is_some_and(|due| due < today)
    }

    /// A copy for another board/column: same content, fresh id, no people.
    pub fn copy_to(&self, board: BoardId, column: ColumnId) -> Self {
        Self {
            id: CardId::new(),
            board,
            column,
            index: self.index,
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            weight: self.weight,
            cover: None,
            members: Vec::new(),
            labels: BTreeSet::new(),
            comments: Vec::new(),
            votes: BTreeSet::new(),
            archived: self.archived,
            created_at: Utc::now(),
        }
    }
}

/// A comment in a card's discussion thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(author: UserId, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            author,
            text: text.into(),
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.modified_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::new(BoardId::new(), ColumnId::new(), "Write docs")
    }

    #[test]
    fn test_remove_member() {
        let mut card = card();
        card.members.push(UserId::from("alice"));
        assert!(card.remove_member(&UserId::from("alice")));
        assert!(!card.remove_member(&UserId::from("alice")));
        assert!(card.members.is_empty());
    }

    #[test]
    fn test_overdue() {
        let mut card = card();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(!card.is_overdue(today));
        card.due_date = NaiveDate::from_ymd_opt(2024, 5, 9);
        assert!(card.is_overdue(today));
        card.archived = true;
        assert!(!card.is_overdue(today));
    }

    #[test]
    fn test_copy_drops_people() {
        let mut original = card();
        original.members.push(UserId::from("alice"));
        original.votes.insert(UserId::from("bob"));
        original.comments.push(Comment::new(UserId::from("bob"), "hi"));
        original.weight = Some(3);

        let copy = original.copy_to(BoardId::new(), ColumnId::new());
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.title, original.title);
        assert_eq!(copy.weight, Some(3));
        assert!(copy.members.is_empty());
        assert!(copy.votes.is_empty());
        assert!(copy.comments.is_empty());
    }

    #[test]
    fn test_comment_edit_sets_modified() {
        let mut comment = Comment::new(UserId::from("alice"), "first");
        assert!(comment.modified_at.is_none());
        comment.edit("second");
        assert_eq!(comment.text, "second");
        assert!(comment.modified_at.is_some());
    }
}
