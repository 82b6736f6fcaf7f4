use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Which application surface a token, preference, or send-log row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppType {
    /// Headquarters back office.
    Hq,
    /// Franchise store app.
    Store,
}

impl AppType {
    /// Canonical string stored in `app_type` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Hq => "HQ",
            AppType::Store => "STORE",
        }
    }
}

impl std::fmt::Display for AppType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_type_column_values() {
        assert_eq!(AppType::Hq.as_str(), "HQ");
        assert_eq!(AppType::Store.as_str(), "STORE");
    }

    #[test]
    fn app_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AppType::Hq).unwrap(), "\"HQ\"");
    }
}
