//! Run Context: identity of one refinement run
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    /// Render reports but do not post them
    pub dry_run: bool,
}

impl RunContext {
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            dry_run,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(false)
    }
}
