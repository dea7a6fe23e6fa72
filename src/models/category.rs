use serde::{Deserialize, Serialize};

/// A spending category. System categories are seeded at bootstrap and
/// cannot be renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_system: bool,
    pub created_at: Option<String>,
}

/// Payload for creating a user-defined category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Partial update; `None` fields leave their columns untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}
