//! Sample-data seeder for webtrail.
//!
//! Creates (or reuses) a history database and fills it with browsing
//! activity spread over the last 90 days.
//!
//! # Usage
//!
//! ```bash
//! # Seed the default database
//! cargo run --bin seed
//!
//! # Seed a specific file with more generated records
//! cargo run --bin seed -- --db ./demo.db --visits 500
//!
//! # Then point the server at it:
//! WEBTRAIL__DATABASE_PATH=./demo.db cargo run
//! ```

use rand::prelude::*;

use webtrail::db::HistoryRepo;
use webtrail::domain::VisitRecord;

// (url, title, age in seconds, visit count, locale)
const CURATED: &[(&str, &str, i64, i64, &str)] = &[
    ("https://www.google.com", "Google", 3_600, 50, "zh-CN"),
    ("https://github.com", "GitHub", 7_200, 25, "en-US"),
    (
        "https://stackoverflow.com",
        "Stack Overflow",
        10_800,
        30,
        "en-US",
    ),
    (
        "https://www.baidu.com",
        "百度一下，你就知道",
        1_800,
        40,
        "zh-CN",
    ),
    (
        "https://www.zhihu.com",
        "知乎 - 有问题，就会有答案",
        900,
        20,
        "zh-CN",
    ),
    (
        "https://doc.rust-lang.org",
        "Rust Documentation",
        14_400,
        15,
        "en-US",
    ),
    ("https://docs.rs", "Docs.rs", 21_600, 10, "en-US"),
    ("https://www.youtube.com", "YouTube", 12_600, 18, "en-US"),
    ("https://crates.io", "crates.io", 18_000, 8, "en-US"),
];

const SITES: &[(&str, &str, &str)] = &[
    ("github.com", "GitHub", "en-US"),
    ("news.ycombinator.com", "Hacker News", "en-US"),
    ("en.wikipedia.org", "Wikipedia", "en-US"),
    ("doc.rust-lang.org", "Rust Documentation", "en-US"),
    ("www.reddit.com", "Reddit", "en-US"),
    ("lobste.rs", "Lobsters", "en-US"),
    ("www.zhihu.com", "知乎", "zh-CN"),
    ("www.bilibili.com", "哔哩哔哩", "zh-CN"),
    ("developer.mozilla.org", "MDN Web Docs", "en-US"),
    ("blog.rust-lang.org", "Rust Blog", "en-US"),
];

const PAGES: &[&str] = &[
    "",
    "/",
    "/about",
    "/search",
    "/docs",
    "/docs/api",
    "/docs/quickstart",
    "/blog",
    "/blog/release-notes",
    "/settings",
    "/trending",
    "/wiki/Rust_(programming_language)",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut db_path = String::from("data/history.db");
    let mut visits: usize = 200;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = args.next().ok_or("--db requires a path")?,
            "--visits" => {
                visits = args
                    .next()
                    .ok_or("--visits requires a count")?
                    .parse()?
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let repo = HistoryRepo::open(&db_path).await?;
    let now = chrono::Utc::now().timestamp();

    for (url, title, age_secs, num_visits, locale) in CURATED {
        repo.record_visit(&VisitRecord {
            url: (*url).to_string(),
            title: Some((*title).to_string()),
            last_visited_time: now - age_secs,
            num_visits: *num_visits,
            locale: Some((*locale).to_string()),
        })
        .await?;
    }

    let mut rng = rand::rng();
    for _ in 0..visits {
        let (host, title, locale) = SITES[rng.random_range(0..SITES.len())];
        let page = PAGES[rng.random_range(0..PAGES.len())];

        repo.record_visit(&VisitRecord {
            url: format!("https://{host}{page}"),
            title: Some(title.to_string()),
            last_visited_time: now - rng.random_range(0..90 * 86_400),
            num_visits: rng.random_range(1..60),
            locale: Some(locale.to_string()),
        })
        .await?;
    }

    println!(
        "Seeded {} curated and up to {} generated records into {}",
        CURATED.len(),
        visits,
        db_path
    );

    Ok(())
}
