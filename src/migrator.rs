// Session phases
// 1. Start: ask for the library database path; it must be an existing file.
// 2. DbOpened: count all media items. Zero means the wrong file was chosen.
// 3. TotalCounted: ask for the old and new path fragments and validate them.
// 4. RequestValidated: begin the single transaction; estimate the affected
//    rows with a substring match. Zero means nothing to do.
// 5. AffectedEstimated: scan every row, rewriting those that start with the
//    old fragment.
// 6. Mutated: commit, including the no-change case.
// 7. Committed / Aborted. The connection is closed on both.

use log::{debug, info, Level};
use logging_timer::timer;
use rusqlite::Connection;
use strum::Display;

use crate::console::Console;
use crate::database::{Database, LIBRARY_DB_FILENAME};
use crate::error::RelocateError;
use crate::media_items::MediaItem;
use crate::prefix::{PrefixRequest, PrefixRole};

#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MigrationPhase {
    Start,
    DbOpened,
    TotalCounted,
    RequestValidated,
    AffectedEstimated,
    Mutated,
    Committed,
    Aborted,
}

/// Counts produced by the scan pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub changed: u64,
    pub scanned: u64,
}

/// Everything a completed session reports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub total: u64,
    pub estimated: u64,
    pub changed: u64,
    pub scanned: u64,
}

pub struct Migrator;

impl Migrator {
    pub const DB_PATH_PROMPT: &str = "Please enter the path to your main@library.songbirdnest.com.db";
    pub const OLD_PREFIX_PROMPT: &str = "Please enter the path prefix (i.e. the 'front' of the path, starting from the beginning) to your music files location which you want to replace";
    pub const NEW_PREFIX_PROMPT: &str = "Please enter the replacement path prefix (i.e. the value you want to substitute for the one you provided a moment ago)";

    /// Number of media items in the library. An empty table is an error.
    pub fn count_total(conn: &Connection) -> Result<u64, RelocateError> {
        let total = MediaItem::count_all(conn)?;
        if total == 0 {
            return Err(RelocateError::NoRecords);
        }
        Ok(total)
    }

    pub fn validate_request(old_prefix: &str, new_prefix: &str) -> Result<PrefixRequest, RelocateError> {
        PrefixRequest::new(old_prefix, new_prefix)
    }

    /// Estimated number of rows the request touches: rows whose content_url
    /// contains the old fragment anywhere. Zero is an error.
    pub fn count_affected(conn: &Connection, old_prefix: &str) -> Result<u64, RelocateError> {
        let affected = MediaItem::count_containing(conn, old_prefix)?;
        if affected == 0 {
            return Err(RelocateError::NoMatch(old_prefix.to_owned()));
        }
        Ok(affected)
    }

    /// Rewrites every row whose content_url starts with the old fragment.
    ///
    /// Runs against whatever connection or transaction it is given and never
    /// commits. A scan that changes nothing is reported through the outcome,
    /// the caller decides how to surface it.
    pub fn apply_migration(
        conn: &Connection,
        request: &PrefixRequest,
    ) -> Result<MigrationOutcome, RelocateError> {
        let _tmr = timer!(Level::Debug; "Migrator::apply_migration");
        let mut outcome = MigrationOutcome::default();

        MediaItem::for_each_media_item(conn, |item| {
            outcome.scanned += 1;

            let new_url = match item.content_url().and_then(|url| request.rewrite(url)) {
                Some(new_url) => new_url,
                None => return Ok(()),
            };

            debug!(
                "media_item {}: '{}' -> '{}'",
                item.media_item_id(),
                item.content_url().unwrap_or_default(),
                new_url
            );
            MediaItem::update_content_url(conn, item.media_item_id(), &new_url)?;
            outcome.changed += 1;

            Ok(())
        })?;

        info!("Changed {} of {} media items", outcome.changed, outcome.scanned);
        Ok(outcome)
    }

    /// Runs one interactive session end to end.
    ///
    /// The database is closed before this returns, whatever the result.
    pub fn run<C: Console>(console: &mut C) -> Result<MigrationSummary, RelocateError> {
        let _tmr = timer!(Level::Debug; "Migrator::run");
        Self::enter(MigrationPhase::Start);
        debug!("Expecting a {} library database", LIBRARY_DB_FILENAME);

        let db_path = console.ask(Self::DB_PATH_PROMPT)?;
        let mut db = Database::open(&db_path).inspect_err(|_| Self::enter(MigrationPhase::Aborted))?;
        Self::enter(MigrationPhase::DbOpened);

        let result = Self::migrate(&mut db, console);
        if let Err(err) = &result {
            if !matches!(err, RelocateError::NoChangesApplied { .. }) {
                Self::enter(MigrationPhase::Aborted);
            }
        }

        match db.close() {
            Ok(()) => result,
            // The session's own error is the one worth surfacing
            Err(close_err) if result.is_err() => {
                debug!("Ignoring close failure after aborted session: {}", close_err);
                result
            }
            Err(close_err) => Err(close_err),
        }
    }

    fn migrate<C: Console>(db: &mut Database, console: &mut C) -> Result<MigrationSummary, RelocateError> {
        let total = Self::count_total(db.conn())?;
        Self::enter(MigrationPhase::TotalCounted);

        let old_prefix = console.ask(Self::OLD_PREFIX_PROMPT)?;
        PrefixRequest::require_fragment(&old_prefix, PrefixRole::Old)?;
        let new_prefix = console.ask(Self::NEW_PREFIX_PROMPT)?;
        let request = Self::validate_request(&old_prefix, &new_prefix)?;
        info!(
            "Rewriting content_url prefix '{}' to '{}' in {}",
            request.old_prefix(),
            request.new_prefix(),
            db.db_path().display()
        );
        Self::enter(MigrationPhase::RequestValidated);

        let tx = db.begin()?;

        // Returning early drops `tx`, which rolls back. Nothing has been
        // written before the scan pass.
        let estimated = Self::count_affected(&tx, request.old_prefix())?;
        console.report(&format!(
            "{} songs (of a total of {}) appear to be associated with the old location you have specified.",
            estimated, total
        ));
        Self::enter(MigrationPhase::AffectedEstimated);

        let outcome = Self::apply_migration(&tx, &request)?;
        Self::enter(MigrationPhase::Mutated);

        // A scan that changed nothing still commits
        tx.commit()?;
        Self::enter(MigrationPhase::Committed);

        if outcome.changed == 0 {
            return Err(RelocateError::NoChangesApplied {
                scanned: outcome.scanned,
            });
        }

        console.report(&format!(
            "Changed the content_url value for {} of {} songs.",
            outcome.changed, outcome.scanned
        ));

        Ok(MigrationSummary {
            total,
            estimated,
            changed: outcome.changed,
            scanned: outcome.scanned,
        })
    }

    fn enter(phase: MigrationPhase) {
        info!("Migration phase: {}", phase);
    }
}
