use std::env;

/// Labels of the daily schedule, half-hour steps from opening to noon.
const DEFAULT_SLOT_TIMES: &[&str] = &[
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM", "12:00 PM",
];

const DEFAULT_SLOT_CAPACITY: u32 = 2;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub slot_times: Vec<String>,
    pub slot_capacity: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "branchbook.db".to_string()),
            slot_times: env::var("SLOT_TIMES")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_SLOT_TIMES.iter().map(|s| s.to_string()).collect()),
            slot_capacity: env::var("SLOT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SLOT_CAPACITY),
        }
    }
}
