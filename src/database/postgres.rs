use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgExecutor, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::FUN_CATEGORY_NAME;
use crate::database::repository::{
    AttemptRepository, CatalogRepository, GameStore, LeaderboardRepository, PlayerRepository,
    SessionRepository,
};
use crate::error::{Error, GameError, Result};
use crate::models::attempt::Attempt;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::player::Player;
use crate::models::question::{Category, Question};
use crate::models::session::{Score, Session};

const QUESTION_COLUMNS: &str = "q.id, q.text, q.option_a, q.option_b, q.option_c, q.option_d, q.correct, q.explanation, q.category_id";

#[derive(Debug, FromRow)]
struct SessionRow {
    id: Uuid,
    player_id: Uuid,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    current_node: i32,
    correct: i32,
    total: i32,
    time_penalty: i32,
    final_score: i32,
    categories: Json<Vec<String>>,
    node_start_times: Json<BTreeMap<i32, i64>>,
    version: i64,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            player_id: row.player_id,
            started_at: row.started_at,
            finished_at: row.finished_at,
            current_node: row.current_node,
            score: Score {
                correct: row.correct,
                total: row.total,
                time_penalty: row.time_penalty,
                final_score: row.final_score,
            },
            categories: row.categories.0,
            node_start_times: row.node_start_times.0,
            version: row.version,
        }
    }
}

fn map_unique_violation(err: sqlx::Error, on_conflict: GameError) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return on_conflict.into();
        }
    }
    err.into()
}

async fn insert_attempt<'e, E: PgExecutor<'e>>(executor: E, attempt: &Attempt) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO attempts (id, session_id, question_id, answer, is_correct, attempted_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(attempt.id)
    .bind(attempt.session_id)
    .bind(attempt.question_id)
    .bind(&attempt.answer)
    .bind(attempt.is_correct)
    .bind(attempt.attempted_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, GameError::AlreadyAnswered))?;
    Ok(())
}

async fn update_session_row<'e, E: PgExecutor<'e>>(executor: E, session: &Session) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET finished_at = $3, current_node = $4, correct = $5, total = $6,
            time_penalty = $7, final_score = $8, categories = $9, node_start_times = $10,
            version = version + 1
        WHERE id = $1 AND version = $2
        "#,
    )
    .bind(session.id)
    .bind(session.version)
    .bind(session.finished_at)
    .bind(session.current_node)
    .bind(session.score.correct)
    .bind(session.score.total)
    .bind(session.score.time_penalty)
    .bind(session.score.final_score)
    .bind(Json(&session.categories))
    .bind(Json(&session.node_start_times))
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(GameError::SessionConflict.into());
    }
    Ok(())
}

async fn upsert_entry_row<'e, E: PgExecutor<'e>>(executor: E, entry: &LeaderboardEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO leaderboard_entries (id, player_id, player_name, session_id, final_score, completion_time_ms, achieved_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (session_id) DO UPDATE
        SET final_score = EXCLUDED.final_score,
            completion_time_ms = EXCLUDED.completion_time_ms,
            achieved_at = EXCLUDED.achieved_at
        "#,
    )
    .bind(entry.id)
    .bind(entry.player_id)
    .bind(&entry.player_name)
    .bind(entry.session_id)
    .bind(entry.final_score)
    .bind(entry.completion_time_ms)
    .bind(entry.achieved_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgStore {
    async fn get_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, title, description, is_phdt FROM categories ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_questions_by_category(&self, category_id: Uuid, limit: i64) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions q WHERE q.category_id = $1 ORDER BY RANDOM() LIMIT $2",
            QUESTION_COLUMNS
        ))
        .bind(category_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_unused_fun_questions_for_session(&self, session_id: Uuid, limit: i64) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {} FROM questions q
            JOIN categories c ON q.category_id = c.id
            WHERE c.name = $1
              AND q.id NOT IN (SELECT question_id FROM attempts WHERE session_id = $2)
            LIMIT $3
            "#,
            QUESTION_COLUMNS
        ))
        .bind(FUN_CATEGORY_NAME)
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_question_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        let row = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions q WHERE q.id = $1",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO categories (id, name, title, description, is_phdt) VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.title)
        .bind(&category.description)
        .bind(category.is_phdt)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_question(&self, question: &Question) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, text, option_a, option_b, option_c, option_d, correct, explanation, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(question.id)
        .bind(&question.text)
        .bind(&question.option_a)
        .bind(&question.option_b)
        .bind(&question.option_c)
        .bind(&question.option_d)
        .bind(&question.correct)
        .bind(&question.explanation)
        .bind(question.category_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for PgStore {
    async fn save_player(&self, player: &Player) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO players (id, name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(&player.email)
        .bind(&player.password_hash)
        .bind(player.created_at)
        .bind(player.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, GameError::PlayerAlreadyExists))?;
        Ok(())
    }

    async fn find_player_by_id(&self, id: Uuid) -> Result<Option<Player>> {
        let row = sqlx::query_as::<_, Player>(r#"SELECT * FROM players WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_player_by_email(&self, email: &str) -> Result<Option<Player>> {
        let row = sqlx::query_as::<_, Player>(r#"SELECT * FROM players WHERE email = $1"#)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl AttemptRepository for PgStore {
    async fn save_attempt(&self, attempt: &Attempt) -> Result<()> {
        insert_attempt(&self.pool, attempt).await
    }

    async fn has_answered_question(&self, session_id: Uuid, question_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM attempts WHERE session_id = $1 AND question_id = $2)"#,
        )
        .bind(session_id)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn count_attempts_by_category(&self, session_id: Uuid, category_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM attempts a
            JOIN questions q ON a.question_id = q.id
            WHERE a.session_id = $1 AND q.category_id = $2
            "#,
        )
        .bind(session_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn save_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, player_id, started_at, finished_at, current_node,
                correct, total, time_penalty, final_score,
                categories, node_start_times, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(session.id)
        .bind(session.player_id)
        .bind(session.started_at)
        .bind(session.finished_at)
        .bind(session.current_node)
        .bind(session.score.correct)
        .bind(session.score.total)
        .bind(session.score.time_penalty)
        .bind(session.score.final_score)
        .bind(Json(&session.categories))
        .bind(Json(&session.node_start_times))
        .bind(session.version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(r#"SELECT * FROM sessions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Session::from))
    }

    async fn update_session(&self, session: &mut Session) -> Result<()> {
        update_session_row(&self.pool, session).await?;
        session.version += 1;
        Ok(())
    }
}

#[async_trait]
impl LeaderboardRepository for PgStore {
    async fn upsert_entry(&self, entry: &LeaderboardEntry) -> Result<()> {
        upsert_entry_row(&self.pool, entry).await
    }

    async fn get_top(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT id, player_id, player_name, session_id, final_score, completion_time_ms, achieved_at
            FROM leaderboard_entries
            ORDER BY final_score DESC, completion_time_ms ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl GameStore for PgStore {
    async fn commit_answer(
        &self,
        attempt: &Attempt,
        session: &mut Session,
        entry: Option<&LeaderboardEntry>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        insert_attempt(&mut *tx, attempt).await?;
        update_session_row(&mut *tx, session).await?;
        if let Some(entry) = entry {
            upsert_entry_row(&mut *tx, entry).await?;
        }

        tx.commit().await?;
        session.version += 1;
        Ok(())
    }
}
