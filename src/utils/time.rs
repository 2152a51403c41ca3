use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision Postgres `timestamptz` keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
