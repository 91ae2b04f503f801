use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: String, email: String, password: &str, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: hash_password(password)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn validate_password(&self, password: &str) -> Result<bool> {
        verify_password(password, &self.password_hash)
    }

    pub fn update_password(&mut self, new_password: &str, now: DateTime<Utc>) -> Result<()> {
        self.password_hash = hash_password(new_password)?;
        self.updated_at = now;
        Ok(())
    }
}
