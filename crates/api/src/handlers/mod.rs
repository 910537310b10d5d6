pub mod health;
pub mod metrics;
pub mod proxy;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use proxy::{
    drain_queue_handler, queue_stats_handler, user_addresses_handler, user_balance_handler,
};

use serde::Serialize;

/// JSON body returned when the gateway itself fails (502 responses).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
