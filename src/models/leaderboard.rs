use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub player_id: Uuid,
    pub player_name: String,
    pub session_id: Uuid,
    pub final_score: i32,
    /// Milliseconds since the session started; lower wins ties.
    pub completion_time_ms: i64,
    pub achieved_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn new(
        player_id: Uuid,
        player_name: String,
        session_id: Uuid,
        final_score: i32,
        completion_time: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            player_name,
            session_id,
            final_score,
            completion_time_ms: completion_time.num_milliseconds(),
            achieved_at: now,
        }
    }

    pub fn completion_time(&self) -> Duration {
        Duration::milliseconds(self.completion_time_ms)
    }
}

pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then(a.completion_time_ms.cmp(&b.completion_time_ms))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: i32, secs: i64) -> LeaderboardEntry {
        LeaderboardEntry::new(
            Uuid::new_v4(),
            format!("p{}", score),
            Uuid::new_v4(),
            score,
            Duration::seconds(secs),
            Utc::now(),
        )
    }

    #[test]
    fn ranks_by_score_then_time() {
        let mut entries = vec![entry(300, 50), entry(500, 90), entry(500, 40), entry(100, 10)];
        rank_entries(&mut entries);
        let order: Vec<(i32, i64)> = entries
            .iter()
            .map(|e| (e.final_score, e.completion_time().num_seconds()))
            .collect();
        assert_eq!(order, vec![(500, 40), (500, 90), (300, 50), (100, 10)]);
    }
}
