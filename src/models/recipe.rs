use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::contains_ignore_case;
use super::{
    generate_id, resolve_asset_url, CatalogEntry, Document, RecipeCategory, RecipeDifficulty,
};

/// Recipe content published next to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: RecipeCategory,
    pub difficulty: RecipeDifficulty,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub description: String,
    pub category: RecipeCategory,
    pub difficulty: RecipeDifficulty,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<RecipeCategory>,
    pub difficulty: Option<RecipeDifficulty>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeFilters {
    pub category: Option<RecipeCategory>,
    pub difficulty: Option<RecipeDifficulty>,
    pub search: Option<String>,
    pub max_total_minutes: Option<u32>,
}

impl Recipe {
    pub fn total_minutes(&self) -> u32 {
        self.prep_time_minutes + self.cook_time_minutes
    }
}

impl Document for Recipe {
    const KIND: &'static str = "Recipe";
    const ID_PREFIX: char = 'R';

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CatalogEntry for Recipe {
    type Create = CreateRecipeRequest;
    type Update = UpdateRecipeRequest;
    type Filters = RecipeFilters;

    fn from_request(request: CreateRecipeRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(Self::ID_PREFIX),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            category: request.category,
            difficulty: request.difficulty,
            prep_time_minutes: request.prep_time_minutes,
            cook_time_minutes: request.cook_time_minutes,
            servings: request.servings,
            ingredients: trim_all(request.ingredients),
            instructions: trim_all(request.instructions),
            image: request.image,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: UpdateRecipeRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = request.category {
            self.category = category;
        }
        if let Some(difficulty) = request.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(prep) = request.prep_time_minutes {
            self.prep_time_minutes = prep;
        }
        if let Some(cook) = request.cook_time_minutes {
            self.cook_time_minutes = cook;
        }
        if let Some(servings) = request.servings {
            self.servings = servings;
        }
        if let Some(ingredients) = request.ingredients {
            self.ingredients = trim_all(ingredients);
        }
        if let Some(instructions) = request.instructions {
            self.instructions = trim_all(instructions);
        }
        if let Some(image) = request.image {
            self.image = Some(image);
        }
        self.updated_at = Utc::now();
    }

    fn matches_filters(&self, filters: &RecipeFilters) -> bool {
        if let Some(category) = filters.category {
            if self.category != category {
                return false;
            }
        }

        if let Some(difficulty) = filters.difficulty {
            if self.difficulty != difficulty {
                return false;
            }
        }

        if let Some(max_total) = filters.max_total_minutes {
            if self.total_minutes() > max_total {
                return false;
            }
        }

        if let Some(search) = &filters.search {
            let search_lower = search.trim().to_lowercase();
            if !contains_ignore_case(&self.name, &search_lower)
                && !contains_ignore_case(&self.description, &search_lower)
                && !self
                    .ingredients
                    .iter()
                    .any(|ingredient| contains_ignore_case(ingredient, &search_lower))
            {
                return false;
            }
        }

        true
    }

    fn with_resolved_assets(&self, assets_cdn_url: &str) -> Self {
        Self {
            image: self
                .image
                .as_deref()
                .map(|image| resolve_asset_url(assets_cdn_url, image)),
            ..self.clone()
        }
    }
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_recipe_request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: "Buttermilk Pancakes".to_string(),
            description: "Fluffy weekend pancakes with a crisp edge".to_string(),
            category: RecipeCategory::Breakfast,
            difficulty: RecipeDifficulty::Easy,
            prep_time_minutes: 10,
            cook_time_minutes: 15,
            servings: 4,
            ingredients: vec![
                " flour ".to_string(),
                "buttermilk".to_string(),
                "eggs".to_string(),
            ],
            instructions: vec![
                "Whisk the dry ingredients".to_string(),
                "Fold in buttermilk and eggs".to_string(),
                "Cook on a hot griddle".to_string(),
            ],
            image: None,
        }
    }

    #[test]
    fn test_recipe_creation_keeps_order() {
        let recipe = Recipe::from_request(create_test_recipe_request());

        assert!(recipe.id.starts_with('R'));
        assert_eq!(recipe.ingredients[0], "flour");
        assert_eq!(recipe.instructions[2], "Cook on a hot griddle");
        assert_eq!(recipe.total_minutes(), 25);
    }

    #[test]
    fn test_recipe_filters() {
        let recipe = Recipe::from_request(create_test_recipe_request());

        assert!(recipe.matches_filters(&RecipeFilters {
            category: Some(RecipeCategory::Breakfast),
            difficulty: Some(RecipeDifficulty::Easy),
            search: Some("BUTTERMILK".to_string()),
            max_total_minutes: Some(25),
        }));
        assert!(!recipe.matches_filters(&RecipeFilters {
            category: Some(RecipeCategory::Dinner),
            ..Default::default()
        }));
        assert!(!recipe.matches_filters(&RecipeFilters {
            max_total_minutes: Some(20),
            ..Default::default()
        }));
        assert!(!recipe.matches_filters(&RecipeFilters {
            search: Some("chocolate".to_string()),
            ..Default::default()
        }));
    }

    #[test]
    fn test_recipe_update_replaces_lists() {
        let mut recipe = Recipe::from_request(create_test_recipe_request());

        recipe.apply_update(UpdateRecipeRequest {
            difficulty: Some(RecipeDifficulty::Medium),
            instructions: Some(vec!["Mix".to_string(), "Cook".to_string()]),
            ..Default::default()
        });

        assert_eq!(recipe.difficulty, RecipeDifficulty::Medium);
        assert_eq!(recipe.instructions, vec!["Mix", "Cook"]);
        assert_eq!(recipe.ingredients.len(), 3);
    }
}
