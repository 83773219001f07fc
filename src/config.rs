//! Configuration (C10): the small env-driven `ServerConfig`.

use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 7860;
const DEFAULT_SOLVE_BUDGET_SECS: u64 = 30;

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub port: u16,
    pub solve_budget: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let solve_budget_secs = env::var("SOLVE_BUDGET_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SOLVE_BUDGET_SECS);
        Self {
            port,
            solve_budget: Duration::from_secs(solve_budget_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            solve_budget: Duration::from_secs(DEFAULT_SOLVE_BUDGET_SECS),
        }
    }
}
