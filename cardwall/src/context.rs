//! CardwallContext - storage primitives and collaborators
//!
//! The context gives commands access to entity files, the action and
//! activity logs, and the pluggable collaborators (asset store, event
//! formatters, card extensions, translator). No business rules live here:
//! commands do the work.

use crate::action_log::{EventRegistry, IdentityTranslator, Translator};
use crate::assets::{AssetStore, FileAssetStore};
use crate::config::CardwallConfig;
use crate::error::{CardwallError, Result};
use crate::extension::ExtensionSet;
use crate::types::{
    ActionLogEntry, Board, BoardId, Card, CardId, Column, ColumnId, InvitationToken, TokenId,
    User, UserId,
};
use cardwall_operations::LogEntry;
use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::trace;

/// Name of the storage directory looked up by [`CardwallContext::find`]
pub const STORE_DIR: &str = ".cardwall";

/// Context passed to every command - provides access, not logic
#[derive(Clone)]
pub struct CardwallContext {
    root: PathBuf,
    config: Arc<CardwallConfig>,
    assets: Arc<dyn AssetStore>,
    events: Arc<EventRegistry>,
    extensions: Arc<ExtensionSet>,
    translator: Arc<dyn Translator>,
}

impl std::fmt::Debug for CardwallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardwallContext")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("events", &self.events)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl CardwallContext {
    /// Context for the given storage directory with default settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = CardwallConfig {
            root: root.clone(),
            ..CardwallConfig::default()
        };
        Self::from_config(config)
    }

    /// Context for a loaded configuration
    pub fn from_config(config: CardwallConfig) -> Self {
        let root = config.root.clone();
        Self {
            assets: Arc::new(FileAssetStore::new(root.join("assets"))),
            root,
            config: Arc::new(config),
            events: Arc::new(EventRegistry::builtin()),
            extensions: Arc::new(ExtensionSet::builtin()),
            translator: Arc::new(IdentityTranslator),
        }
    }

    /// Find the storage directory from a starting path, walking up
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let store_dir = current.join(STORE_DIR);
            if store_dir.is_dir() {
                return Ok(Self::new(store_dir));
            }

            if !current.pop() {
                return Err(CardwallError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    pub fn with_asset_store(mut self, assets: Arc<dyn AssetStore>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_events(mut self, events: EventRegistry) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = Arc::new(extensions);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    pub fn config(&self) -> &CardwallConfig {
        &self.config
    }

    pub fn assets(&self) -> &dyn AssetStore {
        self.assets.as_ref()
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    pub fn board_path(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    /// Path to a board's action log
    pub fn board_log_path(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.jsonl", id))
    }

    pub fn columns_dir(&self) -> PathBuf {
        self.root.join("columns")
    }

    pub fn column_path(&self, id: &ColumnId) -> PathBuf {
        self.columns_dir().join(format!("{}.json", id))
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    pub fn card_path(&self, id: &CardId) -> PathBuf {
        self.cards_dir().join(format!("{}.json", id))
    }

    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    pub fn user_path(&self, id: &UserId) -> PathBuf {
        self.users_dir().join(format!("{}.json", id))
    }

    pub fn tokens_dir(&self) -> PathBuf {
        self.root.join("tokens")
    }

    pub fn token_path(&self, id: &TokenId) -> PathBuf {
        self.tokens_dir().join(format!("{}.json", id))
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Path to the current operation activity log
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if all entity directories exist
    pub fn directories_exist(&self) -> bool {
        [
            self.boards_dir(),
            self.columns_dir(),
            self.cards_dir(),
            self.users_dir(),
            self.tokens_dir(),
            self.activity_dir(),
        ]
        .iter()
        .all(|dir| dir.is_dir())
    }

    /// Create the directory structure. Idempotent.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        for dir in [
            self.boards_dir(),
            self.columns_dir(),
            self.cards_dir(),
            self.users_dir(),
            self.tokens_dir(),
            self.activity_dir(),
        ] {
            fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// Create missing directories; fast when they already exist
    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    pub async fn read_board(&self, id: &BoardId) -> Result<Board> {
        read_json(&self.board_path(id), || CardwallError::BoardNotFound {
            id: id.to_string(),
        })
        .await
    }

    pub async fn write_board(&self, board: &Board) -> Result<()> {
        write_json(&self.board_path(&board.id), board).await
    }

    /// Delete a board file and its action log
    pub async fn delete_board_files(&self, id: &BoardId) -> Result<()> {
        remove_if_exists(&self.board_path(id)).await?;
        remove_if_exists(&self.board_log_path(id)).await
    }

    pub async fn list_board_ids(&self) -> Result<Vec<BoardId>> {
        Ok(list_stems(&self.boards_dir(), "json")
            .await?
            .into_iter()
            .map(BoardId::from_string)
            .collect())
    }

    pub async fn read_all_boards(&self) -> Result<Vec<Board>> {
        let ids = self.list_board_ids().await?;
        let mut boards = Vec::with_capacity(ids.len());
        for id in ids {
            boards.push(self.read_board(&id).await?);
        }
        Ok(boards)
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    pub async fn read_column(&self, id: &ColumnId) -> Result<Column> {
        read_json(&self.column_path(id), || CardwallError::ColumnNotFound {
            id: id.to_string(),
        })
        .await
    }

    pub async fn write_column(&self, column: &Column) -> Result<()> {
        write_json(&self.column_path(&column.id), column).await
    }

    pub async fn delete_column_file(&self, id: &ColumnId) -> Result<()> {
        remove_if_exists(&self.column_path(id)).await
    }

    /// Columns of a board in board order, archive column included
    pub async fn read_board_columns(&self, board: &Board) -> Result<Vec<Column>> {
        let mut columns = Vec::with_capacity(board.columns.len());
        for id in &board.columns {
            columns.push(self.read_column(id).await?);
        }
        Ok(columns)
    }

    // =========================================================================
    // Card I/O
    // =========================================================================

    pub async fn read_card(&self, id: &CardId) -> Result<Card> {
        read_json(&self.card_path(id), || CardwallError::CardNotFound {
            id: id.to_string(),
        })
        .await
    }

    pub async fn write_card(&self, card: &Card) -> Result<()> {
        write_json(&self.card_path(&card.id), card).await
    }

    pub async fn delete_card_file(&self, id: &CardId) -> Result<()> {
        remove_if_exists(&self.card_path(id)).await
    }

    pub async fn list_card_ids(&self) -> Result<Vec<CardId>> {
        Ok(list_stems(&self.cards_dir(), "json")
            .await?
            .into_iter()
            .map(CardId::from_string)
            .collect())
    }

    pub async fn read_all_cards(&self) -> Result<Vec<Card>> {
        let ids = self.list_card_ids().await?;
        let mut cards = Vec::with_capacity(ids.len());
        for id in ids {
            cards.push(self.read_card(&id).await?);
        }
        Ok(cards)
    }

    /// Every card of a board, archived ones included
    pub async fn read_board_cards(&self, board: &BoardId) -> Result<Vec<Card>> {
        let mut cards = self.read_all_cards().await?;
        cards.retain(|card| card.board == *board);
        Ok(cards)
    }

    /// Cards of a column in position order
    pub async fn read_column_cards(&self, column: &ColumnId) -> Result<Vec<Card>> {
        let mut cards = self.read_all_cards().await?;
        cards.retain(|card| card.column == *column);
        cards.sort_by_key(|card| card.index);
        Ok(cards)
    }

    // =========================================================================
    // User I/O
    // =========================================================================

    pub async fn read_user(&self, id: &UserId) -> Result<User> {
        read_json(&self.user_path(id), || CardwallError::UserNotFound {
            id: id.to_string(),
        })
        .await
    }

    pub async fn write_user(&self, user: &User) -> Result<()> {
        write_json(&self.user_path(&user.username), user).await
    }

    pub async fn user_exists(&self, id: &UserId) -> bool {
        self.user_path(id).exists()
    }

    pub async fn read_all_users(&self) -> Result<Vec<User>> {
        let stems = list_stems(&self.users_dir(), "json").await?;
        let mut users = Vec::with_capacity(stems.len());
        for stem in stems {
            users.push(self.read_user(&UserId::from_string(stem)).await?);
        }
        Ok(users)
    }

    /// Look a user up by email, case-insensitively
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.read_all_users().await?;
        Ok(users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    // =========================================================================
    // Invitation tokens
    // =========================================================================

    pub async fn read_token(&self, id: &TokenId) -> Result<InvitationToken> {
        read_json(&self.token_path(id), || CardwallError::TokenNotFound {
            id: id.to_string(),
        })
        .await
    }

    pub async fn write_token(&self, token: &InvitationToken) -> Result<()> {
        write_json(&self.token_path(&token.id), token).await
    }

    pub async fn delete_token_file(&self, id: &TokenId) -> Result<()> {
        remove_if_exists(&self.token_path(id)).await
    }

    /// Pending invitations of a board; tokens whose file vanished are skipped
    pub async fn read_board_tokens(&self, board: &Board) -> Result<Vec<InvitationToken>> {
        let mut tokens = Vec::with_capacity(board.pending.len());
        for id in &board.pending {
            match self.read_token(id).await {
                Ok(token) => tokens.push(token),
                Err(CardwallError::TokenNotFound { .. }) => {
                    trace!(token = %id, board = %board.id, "dangling invitation token");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(tokens)
    }

    // =========================================================================
    // Action log
    // =========================================================================

    /// Append an entry to its board's action log
    pub async fn append_action(&self, entry: &ActionLogEntry) -> Result<()> {
        append_line(&self.board_log_path(&entry.target.board), entry).await
    }

    /// Action log of a board, newest first
    pub async fn read_actions(&self, board: &BoardId) -> Result<Vec<ActionLogEntry>> {
        read_lines(&self.board_log_path(board)).await
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append an operation entry to the global activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        append_line(&self.activity_path(), entry).await
    }

    /// Activity log entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = read_lines(&self.activity_path()).await?;
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire an exclusive lock (non-blocking)
    pub async fn lock(&self) -> Result<CardwallLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(CardwallLock { file }),
            Err(_) => Err(CardwallError::LockBusy),
        }
    }
}

/// RAII lock guard - releases on drop
pub struct CardwallLock {
    file: std::fs::File,
}

impl Drop for CardwallLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

async fn read_json<T, F>(path: &Path, missing: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> CardwallError,
{
    if !path.exists() {
        return Err(missing());
    }
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    atomic_write(path, content.as_bytes()).await
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).await?;
    }
    Ok(())
}

/// File stems in `dir` with the given extension
async fn list_stems(dir: &Path, extension: &str) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some(extension) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

/// Append one JSON line
async fn append_line<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut line = serde_json::to_string(value)?;
    line.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Read a JSONL file, newest (last written) first. Unparseable lines are skipped.
async fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    let mut entries: Vec<T> = content
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    entries.reverse();
    Ok(entries)
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionTarget, Payload};
    use tempfile::TempDir;

    fn setup() -> (TempDir, CardwallContext) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(STORE_DIR));
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_paths() {
        let (temp, ctx) = setup();
        let root = temp.path().join(STORE_DIR);
        let id = BoardId::from_string("b1");

        assert_eq!(ctx.root(), root);
        assert_eq!(ctx.board_path(&id), root.join("boards").join("b1.json"));
        assert_eq!(ctx.board_log_path(&id), root.join("boards").join("b1.jsonl"));
        assert_eq!(ctx.config().root, root);
    }

    #[tokio::test]
    async fn test_debug_shows_root() {
        let (temp, ctx) = setup();
        let text = format!("{:?}", ctx);
        assert!(text.starts_with("CardwallContext"));
        assert!(text.contains(&temp.path().join(STORE_DIR).display().to_string()));
    }

    #[tokio::test]
    async fn test_board_io() {
        let (_temp, ctx) = setup();

        let board = Board::new("Roadmap");
        ctx.write_board(&board).await.unwrap();

        let loaded = ctx.read_board(&board.id).await.unwrap();
        assert_eq!(loaded.title, "Roadmap");
        assert_eq!(ctx.list_board_ids().await.unwrap(), vec![board.id.clone()]);

        ctx.delete_board_files(&board.id).await.unwrap();
        let missing = ctx.read_board(&board.id).await;
        assert!(matches!(missing, Err(CardwallError::BoardNotFound { .. })));
    }

    #[tokio::test]
    async fn test_column_cards_sorted_by_index() {
        let (_temp, ctx) = setup();
        let board = BoardId::new();
        let column = ColumnId::new();

        for (index, title) in [(2, "c"), (0, "a"), (1, "b")] {
            let mut card = Card::new(board.clone(), column.clone(), title);
            card.index = index;
            ctx.write_card(&card).await.unwrap();
        }
        let other = Card::new(board.clone(), ColumnId::new(), "elsewhere");
        ctx.write_card(&other).await.unwrap();

        let titles: Vec<_> = ctx
            .read_column_cards(&column)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(ctx.read_board_cards(&board).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let (_temp, ctx) = setup();
        let user = User::external("alice", "Alice@Example.com", "Alice");
        ctx.write_user(&user).await.unwrap();

        let found = ctx.find_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().username, user.username);
        assert!(ctx
            .find_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
        assert!(ctx.user_exists(&UserId::from("alice")).await);
    }

    #[tokio::test]
    async fn test_action_log_newest_first() {
        let (_temp, ctx) = setup();
        let board = BoardId::new();
        for action in ["first", "second"] {
            let entry = ActionLogEntry::new(
                UserId::from("alice"),
                action,
                Payload::new(),
                ActionTarget {
                    board: board.clone(),
                    card: None,
                },
            );
            ctx.append_action(&entry).await.unwrap();
        }

        let actions = ctx.read_actions(&board).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, "second");
        assert!(ctx.read_actions(&BoardId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_locking() {
        let (_temp, ctx) = setup();

        let lock1 = ctx.lock().await.unwrap();
        let result = ctx.lock().await;
        assert!(matches!(result, Err(CardwallError::LockBusy)));

        drop(lock1);
        let _lock2 = ctx.lock().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_directories_recreates_missing() {
        let (_temp, ctx) = setup();
        assert!(!ctx.directories_exist());

        ctx.ensure_directories().await.unwrap();
        assert!(ctx.directories_exist());

        std::fs::remove_dir_all(ctx.cards_dir()).unwrap();
        assert!(!ctx.directories_exist());

        ctx.ensure_directories().await.unwrap();
        assert!(ctx.cards_dir().exists());
    }

    #[test]
    fn test_find_walks_up() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(STORE_DIR)).unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = CardwallContext::find(&nested).unwrap();
        assert_eq!(ctx.root(), temp.path().join(STORE_DIR));

        let empty = TempDir::new().unwrap();
        assert!(matches!(
            CardwallContext::find(empty.path()),
            Err(CardwallError::NotInitialized { .. })
        ));
    }
}
