use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub genre: String,
    pub description: String,
    /// Never negative
    pub price: f64,
    pub developer: String,
    pub release_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn new(input: CreateGame) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            genre: input.genre,
            description: input.description,
            price: input.price,
            developer: input.developer,
            release_date: input.release_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateGame) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(developer) = update.developer {
            self.developer = developer;
        }
        if let Some(release_date) = update.release_date {
            self.release_date = Some(release_date);
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for adding a game to the catalog
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGame {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 200))]
    pub developer: String,
    pub release_date: Option<NaiveDate>,
}

/// DTO for updating a game; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGame {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    pub developer: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// Query filters for listing games
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct GameFilter {
    /// Substring match on name
    pub name: Option<String>,
    /// Exact genre
    pub genre: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Default for GameFilter {
    fn default() -> Self {
        Self {
            name: None,
            genre: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    50
}
