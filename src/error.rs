use rusqlite::Error as RusqliteError;
use std::io;
use thiserror::Error;

use crate::prefix::PrefixRole;

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("There doesn't seem to be any SQLite database at '{0}'. Quitting")]
    MissingDatabaseFile(String),

    #[error(
        "There don't seem to be any songs (media_items). Are you sure that you specified the correct database file?"
    )]
    NoRecords,

    #[error("You didn't provide {}. Quitting", .0.missing_phrase())]
    EmptyPrefix(PrefixRole),

    #[error("You provided the same value for the old and new path prefix. Nothing to do here. Quitting")]
    NoOpRequest,

    #[error("No songs appear to be associated with the file path location prefix '{0}' you specified.")]
    NoMatch(String),

    #[error("Something went wrong. No changes were made to any of the {scanned} songs scanned.")]
    NoChangesApplied { scanned: u64 },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] RusqliteError), // Converts rusqlite::Error automatically

    #[error("Prompt error: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Error: {0}")]
    Error(String),
}

impl RelocateError {
    /// True for the precondition failures that end a session cleanly: the user
    /// is told why and the process exits with status 0.
    pub fn is_user_abort(&self) -> bool {
        matches!(
            self,
            RelocateError::MissingDatabaseFile(_)
                | RelocateError::NoRecords
                | RelocateError::EmptyPrefix(_)
                | RelocateError::NoOpRequest
                | RelocateError::NoMatch(_)
                | RelocateError::NoChangesApplied { .. }
        )
    }
}
