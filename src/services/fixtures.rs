use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::FUN_CATEGORY_NAME;
use crate::database::memory::MemoryStore;
use crate::database::repository::{CatalogRepository, PlayerRepository};
use crate::models::player::Player;
use crate::models::question::{Category, Question};

pub(crate) const CORRECT: &str = "A";
pub(crate) const WRONG: &str = "B";

pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub player: Player,
    pub general: Vec<Category>,
    pub fun: Category,
}

impl Fixture {
    pub fn category(&self, name: &str) -> &Category {
        self.general
            .iter()
            .chain(std::iter::once(&self.fun))
            .find(|c| c.name == name)
            .expect("category in fixture")
    }

    pub async fn questions_in(&self, category_id: Uuid) -> Vec<Question> {
        self.store.get_questions_by_category(category_id, 1_000).await.unwrap()
    }

    pub async fn second_player(&self, now: DateTime<Utc>) -> Player {
        let other = Player::new("Tahmineh".into(), "t@example.com".into(), "pass-word", now).unwrap();
        self.store.save_player(&other).await.unwrap();
        other
    }
}

fn category(name: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        title: name.to_string(),
        description: format!("{} questions", name),
        is_phdt: false,
    }
}

fn question(category_id: Uuid, n: usize) -> Question {
    Question {
        id: Uuid::new_v4(),
        text: format!("Question {}", n),
        option_a: "Right".into(),
        option_b: "Wrong".into(),
        option_c: None,
        option_d: None,
        correct: CORRECT.to_string(),
        explanation: String::new(),
        category_id,
    }
}

pub(crate) async fn catalog(general: usize, per_category: usize, fun: usize, now: DateTime<Utc>) -> Fixture {
    let store = Arc::new(MemoryStore::new());

    let mut general_categories = Vec::new();
    for i in 0..general {
        let c = category(&format!("General{}", i + 1));
        store.insert_category(&c).await.unwrap();
        for n in 0..per_category {
            store.insert_question(&question(c.id, n)).await.unwrap();
        }
        general_categories.push(c);
    }

    let fun_category = category(FUN_CATEGORY_NAME);
    store.insert_category(&fun_category).await.unwrap();
    for n in 0..fun {
        store.insert_question(&question(fun_category.id, n)).await.unwrap();
    }

    let player = Player::new("Rostam".into(), "rostam@example.com".into(), "pass-word", now).unwrap();
    store.save_player(&player).await.unwrap();

    Fixture {
        store,
        player,
        general: general_categories,
        fun: fun_category,
    }
}
