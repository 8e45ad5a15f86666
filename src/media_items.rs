use rusqlite::{params, Connection};

use crate::error::RelocateError;

/// One row of the `media_items` table, reduced to the columns this tool reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaItem {
    media_item_id: i64,
    content_url: Option<String>,
}

impl MediaItem {
    pub fn new(media_item_id: i64, content_url: Option<String>) -> Self {
        MediaItem {
            media_item_id,
            content_url,
        }
    }

    pub fn media_item_id(&self) -> i64 {
        self.media_item_id
    }

    pub fn content_url(&self) -> Option<&str> {
        self.content_url.as_deref()
    }

    pub fn count_all(conn: &Connection) -> Result<u64, RelocateError> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM media_items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counts rows whose content_url contains `fragment` anywhere.
    ///
    /// Uses SQL LIKE, so the count is ASCII case-insensitive and treats `%`
    /// and `_` inside the fragment as wildcards. It is only an estimate.
    pub fn count_containing(conn: &Connection, fragment: &str) -> Result<u64, RelocateError> {
        let pattern = format!("%{}%", fragment);
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM media_items WHERE content_url LIKE ?",
            [&pattern],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Reads every row up front so that updates issued by `func` never run
    /// against a live cursor on the same table.
    pub fn for_each_media_item<F>(conn: &Connection, mut func: F) -> Result<(), RelocateError>
    where
        F: FnMut(&MediaItem) -> Result<(), RelocateError>,
    {
        let items = {
            let mut stmt = conn.prepare(
                "SELECT media_item_id, content_url
                FROM media_items
                ORDER BY media_item_id ASC",
            )?;

            let rows = stmt.query_map([], |row| {
                Ok(MediaItem::new(
                    row.get::<_, i64>("media_item_id")?,
                    row.get::<_, Option<String>>("content_url")?,
                ))
            })?;

            let items: Vec<MediaItem> = rows.collect::<Result<_, _>>()?;
            items
        };

        for item in &items {
            func(item)?;
        }

        Ok(())
    }

    pub fn update_content_url(
        conn: &Connection,
        media_item_id: i64,
        content_url: &str,
    ) -> Result<(), RelocateError> {
        let updated = conn.execute(
            "UPDATE media_items SET content_url = ? WHERE media_item_id = ?",
            params![content_url, media_item_id],
        )?;

        if updated != 1 {
            return Err(RelocateError::Error(format!(
                "Expected to update one media item with id {}, updated {}",
                media_item_id, updated
            )));
        }

        Ok(())
    }
}
