use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::LEADERBOARD_TOP_ENTRIES;
use crate::database::repository::{GameStore, LeaderboardRepository};
use crate::error::Result;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::player::Player;
use crate::models::session::Session;

#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn GameStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub async fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.store.get_top(LEADERBOARD_TOP_ENTRIES).await
    }

    pub fn entry_for_session(session: &Session, player: &Player, now: DateTime<Utc>) -> LeaderboardEntry {
        LeaderboardEntry::new(
            player.id,
            player.name.clone(),
            session.id,
            session.score.final_score,
            session.elapsed_at(now),
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use chrono::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn leaderboard_holds_top_ten_in_rank_order() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        for i in 0..12 {
            let entry = LeaderboardEntry::new(
                Uuid::new_v4(),
                format!("p{}", i),
                Uuid::new_v4(),
                if i % 2 == 0 { 500 } else { 300 },
                Duration::seconds(100 + i),
                now,
            );
            store.upsert_entry(&entry).await.unwrap();
        }

        let svc = LeaderboardService::new(store);
        let top = svc.get_leaderboard().await.unwrap();
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| {
            w[0].final_score > w[1].final_score
                || (w[0].final_score == w[1].final_score
                    && w[0].completion_time_ms <= w[1].completion_time_ms)
        }));
        assert_eq!(top[0].player_name, "p0");
    }
}
