//! Query timing and pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Times a single repository query.
///
/// Construct before issuing the query and call [`record`](Self::record)
/// once it resolves (on success or failure), so slow failing queries show
/// up in the histogram too:
///
/// ```ignore
/// let timer = QueryTimer::new("find_user_by_email");
/// let row = sqlx::query_as::<_, UserEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// row
/// ```
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    /// Consumes the timer and emits the elapsed seconds labelled by query.
    pub fn record(self) {
        histogram!("db_query_duration_seconds", "query" => self.query)
            .record(self.started.elapsed().as_secs_f64());
    }
}

/// Samples the connection pool into gauges. Invoked from the health probe
/// rather than a dedicated ticker.
pub fn record_pool_metrics(pool: &PgPool) {
    let total = pool.size();
    let idle = pool.num_idle() as u32;

    gauge!("db_pool_connections", "state" => "busy").set(total.saturating_sub(idle) as f64);
    gauge!("db_pool_connections", "state" => "idle").set(idle as f64);
    gauge!("db_pool_connections_total").set(total as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_tracks_elapsed_time() {
        let timer = QueryTimer::new("list_prices");
        assert_eq!(timer.query, "list_prices");
        assert!(timer.started.elapsed().as_secs() < 1);
        timer.record();
    }
}
