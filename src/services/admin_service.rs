//! Admin service - platform metrics for allow-listed principals

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use crate::db::metrics::{self, AdminMetrics};
use crate::db::Database;
use crate::error::GenmaveError;

/// Longest window accepted for metrics
pub const MAX_WINDOW_DAYS: u32 = 365;

pub struct AdminService {
    db: Arc<Database>,
    admins: HashSet<String>,
    default_window_days: u32,
}

impl AdminService {
    pub fn new(db: Arc<Database>, admin_user_ids: &[String], default_window_days: u32) -> Self {
        Self {
            db,
            admins: admin_user_ids.iter().cloned().collect(),
            default_window_days,
        }
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.contains(user_id)
    }

    pub fn metrics(&self, principal: &str, window_days: Option<u32>) -> Result<AdminMetrics, GenmaveError> {
        if !self.is_admin(principal) {
            warn!(user_id = %principal, "Non-admin requested platform metrics");
            return Err(GenmaveError::Forbidden("admin only".into()));
        }

        let days = window_days.unwrap_or(self.default_window_days);
        if days == 0 || days > MAX_WINDOW_DAYS {
            return Err(GenmaveError::InvalidInput(format!(
                "days must be in 1..={}, got {}",
                MAX_WINDOW_DAYS, days
            )));
        }

        let since = (Utc::now() - Duration::days(i64::from(days)))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        self.db.with_conn(|conn| metrics::platform_metrics(conn, days, &since))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AdminService {
        let db = Arc::new(Database::open_in_memory().unwrap());
        AdminService::new(db, &["root".to_string()], 7)
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let svc = service();
        assert!(matches!(svc.metrics("u1", None), Err(GenmaveError::Forbidden(_))));
    }

    #[test]
    fn test_window_bounds() {
        let svc = service();
        assert_eq!(svc.metrics("root", None).unwrap().window_days, 7);
        assert_eq!(svc.metrics("root", Some(30)).unwrap().window_days, 30);
        assert!(matches!(svc.metrics("root", Some(0)), Err(GenmaveError::InvalidInput(_))));
        assert!(svc.metrics("root", Some(366)).is_err());
    }
}
