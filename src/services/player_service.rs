use std::sync::Arc;

use crate::database::repository::{GameStore, PlayerRepository};
use crate::error::{GameError, Result};
use crate::models::player::Player;
use crate::utils::time::Clock;
use crate::utils::token::TokenKeys;

#[derive(Debug, Clone)]
pub struct AuthenticatedPlayer {
    pub player: Player,
    pub token: String,
}

#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn GameStore>,
    keys: TokenKeys,
    clock: Arc<dyn Clock>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn GameStore>, keys: TokenKeys, clock: Arc<dyn Clock>) -> Self {
        Self { store, keys, clock }
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Player> {
        let email = normalize_email(email);
        if self.store.find_player_by_email(&email).await?.is_some() {
            return Err(GameError::PlayerAlreadyExists.into());
        }

        let player = Player::new(name.trim().to_string(), email, password, self.clock.now())?;
        self.store.save_player(&player).await?;
        tracing::info!(player_id = %player.id, "player registered");
        Ok(player)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedPlayer> {
        let player = self
            .store
            .find_player_by_email(&normalize_email(email))
            .await?
            .ok_or(GameError::InvalidCredentials)?;

        if !player.validate_password(password)? {
            tracing::warn!(player_id = %player.id, "login rejected");
            return Err(GameError::InvalidCredentials.into());
        }

        let token = self.keys.issue(&player, self.clock.as_ref())?;
        Ok(AuthenticatedPlayer { player, token })
    }

    pub fn token_expiry_seconds(&self) -> i64 {
        self.keys.expiry_seconds()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::error::Error;
    use crate::utils::time::ManualClock;
    use chrono::Utc;

    fn service() -> (PlayerService, TokenKeys) {
        let keys = TokenKeys::new("test-secret", 3600);
        let svc = PlayerService::new(
            Arc::new(MemoryStore::new()),
            keys.clone(),
            Arc::new(ManualClock::new(Utc::now())),
        );
        (svc, keys)
    }

    #[tokio::test]
    async fn signup_then_login_issues_tokens_for_same_player() {
        let (svc, keys) = service();

        let signed_up = svc.signup(" Gordafarid ", "G@Example.com", "s3cret-pass").await.unwrap();
        assert_eq!(signed_up.name, "Gordafarid");
        assert_eq!(signed_up.email, "g@example.com");

        let logged_in = tokio_test::assert_ok!(svc.login("g@example.com", "s3cret-pass").await);
        assert_eq!(logged_in.player.id, signed_up.id);

        let claims = keys.verify(&logged_in.token).unwrap();
        assert_eq!(claims.sub, signed_up.id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (svc, _) = service();
        svc.signup("A", "a@example.com", "password1").await.unwrap();

        let err = svc.signup("B", "A@example.com", "password2").await.unwrap_err();
        assert!(matches!(err, Error::Game(GameError::PlayerAlreadyExists)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (svc, _) = service();
        svc.signup("A", "a@example.com", "password1").await.unwrap();

        let wrong = svc.login("a@example.com", "nope-nope").await.unwrap_err();
        let unknown = svc.login("z@example.com", "password1").await.unwrap_err();
        assert!(matches!(wrong, Error::Game(GameError::InvalidCredentials)));
        assert!(matches!(unknown, Error::Game(GameError::InvalidCredentials)));
    }
}
