
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

use crate::database::repository::CatalogRepository;
use crate::error::Result;
use crate::models::question::{Category, Question};

#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_phdt: bool,
    #[serde(default)]
    pub questions: Vec<QuestionSeed>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionSeed {
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct: String,
    #[serde(default)]
    pub explanation: String,
}

/// Returns the number of questions inserted; zero when the catalog already has content.
pub async fn seed_catalog(store: &dyn CatalogRepository, seed: CatalogSeed) -> Result<usize> {
    if !store.get_categories().await?.is_empty() {
        tracing::info!("Catalog already populated, skipping seed");
        return Ok(0);
    }

    let mut inserted = 0;
    for cat in seed.categories {
        let category = Category {
            id: Uuid::new_v4(),
            title: if cat.title.is_empty() { cat.name.clone() } else { cat.title },
            name: cat.name,
            description: cat.description,
            is_phdt: cat.is_phdt,
        };
        store.insert_category(&category).await?;

        for q in cat.questions {
            let question = Question {
                id: Uuid::new_v4(),
                text: q.text,
                option_a: q.option_a,
                option_b: q.option_b,
                option_c: q.option_c,
                option_d: q.option_d,
                correct: q.correct,
                explanation: q.explanation,
                category_id: category.id,
            };
            store.insert_question(&question).await?;
            inserted += 1;
        }
    }

    tracing::info!("Seeded catalog with {} questions", inserted);
    Ok(inserted)
}

pub async fn seed_catalog_from_file(store: &dyn CatalogRepository, path: impl AsRef<Path>) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_json::from_str(&raw)?;
    seed_catalog(store, seed).await
}
