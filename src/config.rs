use std::path::PathBuf;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "ledger.duckdb";

/// The demo user seeded at schema bootstrap. Every accessor takes an
/// explicit [`UserScope`](crate::UserScope); this id is only the
/// out-of-the-box default.
pub const DEFAULT_USER_ID: i64 = 1;

/// Default lookback window for trend queries, in days.
pub const DEFAULT_TREND_WINDOW_DAYS: i64 = 30;

/// Group name used for expenses without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// System categories seeded for the demo user: (name, color, icon).
pub fn system_categories() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("Food & Dining", "#FF6B6B", "🍽️"),
        ("Transportation", "#4ECDC4", "🚗"),
        ("Shopping", "#45B7D1", "🛍️"),
        ("Entertainment", "#FFA07A", "🎬"),
        ("Bills & Utilities", "#98D8C8", "💡"),
        ("Health & Fitness", "#F7DC6F", "💪"),
        ("Other", "#95A5A6", "📌"),
    ]
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("ledgerkit")
    } else {
        PathBuf::from(".ledgerkit-data")
    }
}
