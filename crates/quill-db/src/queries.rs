use std::str::FromStr;

use crate::models::{ArticleRow, CommentRow, NewArticle};
use crate::Database;
use anyhow::{Context, Result};
use num_bigint::BigUint;
use rusqlite::{Connection, Row};

const ARTICLE_COLUMNS: &str =
    "id, title, thumbnail, date_published, description, content, view_count, catelogy_id";

const SUMMARY_COLUMNS: &str =
    "id, title, thumbnail, date_published, description, '', view_count, catelogy_id";

const COMMENT_COLUMNS: &str = "id, user_id, content, comment_to_post, created_at";

impl Database {
    // -- Articles --

    pub fn insert_article(&self, article: &NewArticle) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO articles (title, thumbnail, description, content, catelogy_id, date_published)
                 VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))",
                rusqlite::params![
                    article.title,
                    article.thumbnail,
                    article.description,
                    article.content,
                    article.catelogy_id,
                    article.date_published,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_article(&self, id: i64) -> Result<Option<ArticleRow>> {
        self.with_conn(|conn| query_article(conn, id))
    }

    /// Bump the view counter of an article by one and return the updated row,
    /// or `None` if the article does not exist.
    ///
    /// The counter is a decimal string of unbounded size. Read, increment and
    /// write happen in one transaction while the connection lock is held, so
    /// concurrent viewers are serialized.
    pub fn record_view(&self, id: i64) -> Result<Option<ArticleRow>> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            let Some(mut article) = query_article(&tx, id)? else {
                return Ok(None);
            };

            article.view_count = increment_count(&article.view_count)
                .with_context(|| format!("corrupt view count on article {}", id))?;

            tx.execute(
                "UPDATE articles SET view_count = ?1 WHERE id = ?2",
                rusqlite::params![article.view_count, id],
            )?;
            tx.commit()?;

            Ok(Some(article))
        })
    }

    /// Articles without their content, newest first. `catelogy_id = None`
    /// lists every category.
    pub fn list_articles(&self, catelogy_id: Option<i64>, limit: Option<u32>) -> Result<Vec<ArticleRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM articles
                 WHERE (?1 IS NULL OR catelogy_id = ?1)
                 ORDER BY date_published DESC, id DESC
                 LIMIT ?2",
                SUMMARY_COLUMNS
            );
            // SQLite treats a negative LIMIT as no limit
            let limit = limit.map(i64::from).unwrap_or(-1);

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![catelogy_id, limit], map_article)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// How many articles a listing would hold before any limit is applied.
    pub fn count_articles(&self, catelogy_id: Option<i64>) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM articles WHERE (?1 IS NULL OR catelogy_id = ?1)",
                [catelogy_id],
                |row| row.get(0),
            )?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }

    /// Articles whose title matches `%term%`. The term is bound as a
    /// parameter, but `%` and `_` inside it keep their LIKE meaning.
    pub fn search_articles(&self, term: &str) -> Result<Vec<ArticleRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM articles WHERE title LIKE ?1 ORDER BY id", ARTICLE_COLUMNS);
            let pattern = format!("%{}%", term);

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([pattern], map_article)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Returns whether a row was removed.
    pub fn delete_article(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM articles WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    // -- Comments --

    pub fn insert_comment(&self, user_id: &str, content: &str, post_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (user_id, content, comment_to_post) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, content, post_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_comment(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM comments WHERE id = ?1", COMMENT_COLUMNS);
            conn.query_row(&sql, [id], map_comment).optional()
        })
    }

    /// Comments of one article, newest first.
    pub fn list_comments(&self, post_id: i64) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM comments WHERE comment_to_post = ?1 ORDER BY created_at DESC, id DESC",
                COMMENT_COLUMNS
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([post_id], map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Returns whether a row was removed.
    pub fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }
}

fn query_article(conn: &Connection, id: i64) -> Result<Option<ArticleRow>> {
    let sql = format!("SELECT {} FROM articles WHERE id = ?1", ARTICLE_COLUMNS);
    conn.query_row(&sql, [id], map_article).optional()
}

fn map_article(row: &Row<'_>) -> rusqlite::Result<ArticleRow> {
    Ok(ArticleRow {
        id: row.get(0)?,
        title: row.get(1)?,
        thumbnail: row.get(2)?,
        date_published: row.get(3)?,
        description: row.get(4)?,
        content: row.get(5)?,
        view_count: row.get(6)?,
        catelogy_id: row.get(7)?,
    })
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        comment_to_post: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Add one to a decimal counter of arbitrary size.
pub fn increment_count(current: &str) -> Result<String> {
    let value = BigUint::from_str(current.trim())?;
    Ok((value + 1u32).to_string())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, catelogy_id: i64, date_published: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            thumbnail: format!("{}.png", title),
            description: format!("about {}", title),
            content: format!("body of {}", title),
            catelogy_id,
            date_published: Some(date_published.to_string()),
        }
    }

    #[test]
    fn increment_count_handles_unbounded_values() {
        assert_eq!(increment_count("0").unwrap(), "1");
        assert_eq!(
            increment_count("999999999999999999999").unwrap(),
            "1000000000000000000000"
        );
        assert!(increment_count("twelve").is_err());
    }

    #[test]
    fn new_articles_start_at_zero_views() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .insert_article(&NewArticle {
                title: "hello".into(),
                thumbnail: "t.png".into(),
                description: "d".into(),
                content: "c".into(),
                catelogy_id: 1,
                date_published: None,
            })
            .unwrap();

        let row = db.get_article(id).unwrap().unwrap();
        assert_eq!(row.view_count, "0");
        assert!(row.date_published.ends_with('Z'));
    }

    #[test]
    fn record_view_increments_by_one() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_article(&article("a", 1, "2024-01-01T00:00:00.000Z")).unwrap();

        for expected in ["1", "2", "3"] {
            let row = db.record_view(id).unwrap().unwrap();
            assert_eq!(row.view_count, expected);
        }
        assert_eq!(db.get_article(id).unwrap().unwrap().view_count, "3");
        assert!(db.record_view(id + 100).unwrap().is_none());
    }

    #[test]
    fn list_articles_filters_and_orders() {
        let db = Database::open_in_memory().unwrap();
        db.insert_article(&article("old", 1, "2024-01-01T00:00:00.000Z")).unwrap();
        db.insert_article(&article("new", 1, "2024-03-01T00:00:00.000Z")).unwrap();
        db.insert_article(&article("other", 2, "2024-02-01T00:00:00.000Z")).unwrap();

        let all: Vec<String> = db.list_articles(None, None).unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(all, vec!["new", "other", "old"]);

        let cat1: Vec<String> = db.list_articles(Some(1), None).unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(cat1, vec!["new", "old"]);

        let limited = db.list_articles(None, Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].title, "new");
        assert!(limited[0].content.is_empty());

        assert_eq!(db.count_articles(None).unwrap(), 3);
        assert_eq!(db.count_articles(Some(1)).unwrap(), 2);
        assert_eq!(db.count_articles(Some(9)).unwrap(), 0);
    }

    #[test]
    fn search_matches_substrings_of_title() {
        let db = Database::open_in_memory().unwrap();
        db.insert_article(&article("xxabcxx", 1, "2024-01-01T00:00:00.000Z")).unwrap();
        db.insert_article(&article("abc", 2, "2024-01-02T00:00:00.000Z")).unwrap();
        db.insert_article(&article("ab-c", 1, "2024-01-03T00:00:00.000Z")).unwrap();

        let found: Vec<String> = db.search_articles("abc").unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(found, vec!["xxabcxx", "abc"]);
        assert_eq!(db.search_articles("abc").unwrap()[0].content, "body of xxabcxx");
    }

    #[test]
    fn comments_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let post = db.insert_article(&article("a", 1, "2024-01-01T00:00:00.000Z")).unwrap();

        let first = db.insert_comment("uid-1", "first", post).unwrap();
        let second = db.insert_comment("uid-2", "second", post).unwrap();
        db.insert_comment("uid-1", "elsewhere", post + 1).unwrap();

        let listed: Vec<i64> = db.list_comments(post).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(listed, vec![second, first]);

        let comment = db.get_comment(first).unwrap().unwrap();
        assert_eq!(comment.user_id, "uid-1");
        assert_eq!(comment.comment_to_post, post);

        assert!(db.delete_comment(first).unwrap());
        assert!(!db.delete_comment(first).unwrap());
        assert!(db.get_comment(first).unwrap().is_none());
    }

    #[test]
    fn deleting_an_article_leaves_its_comments() {
        let db = Database::open_in_memory().unwrap();
        let post = db.insert_article(&article("a", 1, "2024-01-01T00:00:00.000Z")).unwrap();
        let comment = db.insert_comment("uid-1", "orphan", post).unwrap();

        assert!(db.delete_article(post).unwrap());
        assert!(db.get_article(post).unwrap().is_none());
        assert!(db.get_comment(comment).unwrap().is_some());
    }
}
