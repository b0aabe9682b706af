use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;

use crate::domain::{HistoryFilters, HistoryPage, PageRequest, StatsOverview, VisitRecord};
use crate::error::Result;
use crate::query::{Predicate, SortDirection, SortField, SqlParam};
use crate::site;

pub type Pool = sqlx::SqlitePool;

/// Turn a filesystem path into a sqlite URL that creates the file when
/// missing.
pub fn sqlite_url(path: &str) -> String {
    format!("sqlite:{path}?mode=rwc")
}

pub async fn create_pool(url: &str) -> Result<Pool> {
    // A pooled in-memory database is per-connection; keep it on one.
    let max_connections = if url.contains(":memory:") { 1 } else { 10 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    let sql = include_str!("../../migrations/sqlite/001_initial.sql");
    sqlx::raw_sql(sql).execute(pool).await?;
    Ok(())
}

/// Probe whether `path` points at a readable history database. Bad paths and
/// unreadable files report `false` rather than erroring.
pub async fn validate_database(path: &str) -> bool {
    if !std::path::Path::new(path).is_file() {
        return false;
    }

    let url = format!("sqlite:{path}");
    let Ok(pool) = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
    else {
        return false;
    };

    let row: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'navigation_history'",
    )
    .fetch_optional(&pool)
    .await
    .ok()
    .flatten();

    pool.close().await;
    row.is_some()
}

/// Read gateway for one history database.
///
/// A repo is constructed once per data source; switching sources means
/// building a new repo and swapping the reference (`AppState::swap_repo`),
/// never re-pointing a live one.
#[derive(Clone)]
pub struct HistoryRepo {
    pool: Pool,
    source: String,
}

impl HistoryRepo {
    /// Connect to an explicit sqlite URL and bootstrap the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        run_migrations(&pool).await?;
        Ok(Self {
            pool,
            source: url.to_string(),
        })
    }

    /// Open (creating if missing) a history database file.
    pub async fn open(path: &str) -> Result<Self> {
        let mut repo = Self::connect(&sqlite_url(path)).await?;
        repo.source = path.to_string();
        Ok(repo)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// One filtered, sorted, bounded slice plus the unbounded match count.
    ///
    /// The count and the fetch are two independent reads; a write landing
    /// between them can make `total` momentarily inconsistent with `items`.
    pub async fn list_history(
        &self,
        page: PageRequest,
        filters: &HistoryFilters,
    ) -> Result<HistoryPage> {
        let predicate = Predicate::from_filters(filters, Utc::now().timestamp());
        let field = SortField::parse(filters.sort_by.as_deref());
        let direction = SortDirection::parse(filters.sort_order.as_deref());

        let count_sql = format!(
            "SELECT COUNT(*) FROM navigation_history{}",
            predicate.where_sql()
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in predicate.params() {
            count_query = match param {
                SqlParam::Text(text) => count_query.bind(text.clone()),
                SqlParam::Int(value) => count_query.bind(*value),
            };
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT url, title, last_visited_time, num_visits, locale \
             FROM navigation_history{} ORDER BY {} {} LIMIT ? OFFSET ?",
            predicate.where_sql(),
            field.as_sql(),
            direction.as_sql(),
        );
        let mut data_query = sqlx::query_as::<_, VisitRecord>(&data_sql);
        for param in predicate.params() {
            data_query = match param {
                SqlParam::Text(text) => data_query.bind(text.clone()),
                SqlParam::Int(value) => data_query.bind(*value),
            };
        }
        let items = data_query
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(HistoryPage {
            items,
            total,
            page: page.page(),
            page_size: page.page_size(),
        })
    }

    /// Activity summary for a time-range token: summed visits, distinct URL
    /// count, and the top `top_n` site identities by summed visit weight.
    pub async fn stats_overview(&self, time_range: &str, top_n: usize) -> Result<StatsOverview> {
        let filters = HistoryFilters {
            time_range: Some(time_range.to_string()),
            ..Default::default()
        };
        let predicate = Predicate::from_filters(&filters, Utc::now().timestamp());

        let visits_sql = format!(
            "SELECT COALESCE(SUM(num_visits), 0) FROM navigation_history{}",
            predicate.where_sql()
        );
        let mut visits_query = sqlx::query_scalar::<_, i64>(&visits_sql);
        for param in predicate.params() {
            visits_query = match param {
                SqlParam::Text(text) => visits_query.bind(text.clone()),
                SqlParam::Int(value) => visits_query.bind(*value),
            };
        }
        let total_visits = visits_query.fetch_one(&self.pool).await?;

        let sites_sql = format!(
            "SELECT COUNT(DISTINCT url) FROM navigation_history{}",
            predicate.where_sql()
        );
        let mut sites_query = sqlx::query_scalar::<_, i64>(&sites_sql);
        for param in predicate.params() {
            sites_query = match param {
                SqlParam::Text(text) => sites_query.bind(text.clone()),
                SqlParam::Int(value) => sites_query.bind(*value),
            };
        }
        let distinct_sites = sites_query.fetch_one(&self.pool).await?;

        let rows_sql = format!(
            "SELECT url, num_visits FROM navigation_history{}",
            predicate.where_sql()
        );
        let mut rows_query = sqlx::query_as::<_, (String, i64)>(&rows_sql);
        for param in predicate.params() {
            rows_query = match param {
                SqlParam::Text(text) => rows_query.bind(text.clone()),
                SqlParam::Int(value) => rows_query.bind(*value),
            };
        }
        let rows = rows_query.fetch_all(&self.pool).await?;

        let top_entities = site::top_sites(
            rows.iter().map(|(url, visits)| (url.as_str(), *visits)),
            top_n,
        );

        Ok(StatsOverview {
            total_visits,
            distinct_sites,
            top_entities,
        })
    }

    /// Upsert one record, keyed by URL, returning the affected row count.
    /// Ingestion belongs to external collaborators (the seeder, tests); the
    /// query path never writes.
    pub async fn record_visit(&self, record: &VisitRecord) -> Result<u64> {
        let result = sqlx::query(
            r#"INSERT INTO navigation_history (url, title, last_visited_time, num_visits, locale)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(url) DO UPDATE SET
                   title = excluded.title,
                   last_visited_time = excluded.last_visited_time,
                   num_visits = excluded.num_visits,
                   locale = excluded.locale"#,
        )
        .bind(&record.url)
        .bind(&record.title)
        .bind(record.last_visited_time)
        .bind(record.num_visits)
        .bind(&record.locale)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
