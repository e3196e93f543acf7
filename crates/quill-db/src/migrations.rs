use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS articles (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT NOT NULL,
            thumbnail       TEXT NOT NULL,
            date_published  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            description     TEXT NOT NULL,
            content         TEXT NOT NULL,
            view_count      TEXT NOT NULL DEFAULT '0',
            catelogy_id     INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_articles_catelogy
            ON articles(catelogy_id, date_published);

        -- No foreign key on comment_to_post: comments survive article removal.
        CREATE TABLE IF NOT EXISTS comments (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id          TEXT NOT NULL,
            content          TEXT NOT NULL,
            comment_to_post  INTEGER NOT NULL,
            created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments(comment_to_post, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
