// Debug logging module for move decisions and end-of-game dumps
//
// Writes are fire-and-forget on the tokio runtime so they never hold up a
// response. Each decision becomes one JSON line that the replay tool can read
// back; at game end the maze layout and tour index grid are dumped as text.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::Mutex;

use crate::config::DebugConfig;
use crate::session::Session;
use crate::types::{Battlesnake, Board, Direction};

/// Represents a single debug log entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MoveLogEntry {
    pub game_id: String,
    pub seed: u64,
    pub turn: i32,
    pub chosen_move: String,
    pub board: Board,
    pub you: Battlesnake,
    pub timestamp: String,
}

impl MoveLogEntry {
    pub fn new(session: &Session, turn: i32, board: &Board, you: &Battlesnake, chosen_move: Direction) -> Self {
        MoveLogEntry {
            game_id: session.game_id().to_string(),
            seed: session.seed(),
            turn,
            chosen_move: chosen_move.as_str().to_string(),
            board: board.clone(),
            you: you.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    /// Set when the log file was opened; used for writes made outside a runtime
    log_path: Option<PathBuf>,
    dump_dir: Option<PathBuf>,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled, initializes the log file (truncating if it exists)
    pub async fn new(config: &DebugConfig) -> Self {
        if !config.enabled {
            return DebugLogger::disabled();
        }

        let path = PathBuf::from(&config.log_file_path);
        let file = match open_truncated(&path).await {
            Ok(file) => {
                info!("Debug logging enabled: {}", config.log_file_path);
                Some(file)
            }
            Err(e) => {
                error!(
                    "Failed to create debug log file '{}': {}",
                    config.log_file_path, e
                );
                None
            }
        };
        let log_path = file.as_ref().map(|_| path);

        DebugLogger {
            file: Arc::new(Mutex::new(file)),
            log_path,
            dump_dir: Some(PathBuf::from(&config.dump_dir)),
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            log_path: None,
            dump_dir: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dump_dir.is_some()
    }

    /// Logs a move decision: fire-and-forget on the runtime when there is one,
    /// appended inline otherwise
    pub fn log_move(&self, entry: MoveLogEntry) {
        if !self.is_enabled() {
            return;
        }
        let Ok(handle) = Handle::try_current() else {
            if let Some(path) = &self.log_path {
                if let Err(e) = append_line_blocking(path, &entry) {
                    error!("Failed to write debug log entry: {}", e);
                }
            }
            return;
        };

        let file_handle = self.file.clone();
        handle.spawn(async move {
            Self::log_move_internal(file_handle, entry).await;
        });
    }

    async fn log_move_internal(file_handle: Arc<Mutex<Option<File>>>, entry: MoveLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }

    /// Writes the maze layout and tour grid of a finished game.
    /// Runs on the blocking pool when inside a runtime, inline otherwise.
    pub fn dump_session(&self, session: &Session) {
        let Some(dir) = self.dump_dir.clone() else {
            return;
        };

        let game_id = session.game_id().to_string();
        let maze = session.maze().layout_string();
        let cycle = session.tour().grid_string();

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    if let Err(e) = write_dumps(&dir, &game_id, &maze, &cycle) {
                        error!("Failed to write dumps for game {}: {}", game_id, e);
                    }
                });
            }
            Err(_) => {
                if let Err(e) = write_dumps(&dir, &game_id, &maze, &cycle) {
                    error!("Failed to write dumps for game {}: {}", game_id, e);
                }
            }
        }
    }
}

/// Truncates the log, then reopens it in append mode so that runtime and
/// inline writers never overwrite each other's lines
async fn open_truncated(path: &Path) -> std::io::Result<File> {
    File::create(path).await?;
    OpenOptions::new().append(true).open(path).await
}

fn append_line_blocking(path: &Path, entry: &MoveLogEntry) -> Result<(), String> {
    let json_line = serde_json::to_string(entry)
        .map_err(|e| format!("Failed to serialize debug log entry: {}", e))?;
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    writeln!(file, "{}", json_line).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Dump file paths for a game: `(maze, cycle)`
pub fn dump_paths(dir: &Path, game_id: &str) -> (PathBuf, PathBuf) {
    let safe_id: String = game_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    (
        dir.join(format!("{}.maze.txt", safe_id)),
        dir.join(format!("{}.cycle.txt", safe_id)),
    )
}

fn write_dumps(dir: &Path, game_id: &str, maze: &str, cycle: &str) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    let (maze_path, cycle_path) = dump_paths(dir, game_id);
    fs::write(&maze_path, maze)
        .map_err(|e| format!("Failed to write {}: {}", maze_path.display(), e))?;
    fs::write(&cycle_path, cycle)
        .map_err(|e| format!("Failed to write {}: {}", cycle_path.display(), e))?;
    info!("Wrote {} and {}", maze_path.display(), cycle_path.display());
    Ok(())
}
