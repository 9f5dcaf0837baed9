use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of catalog entries that can be placed in a cart or favorited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Product,
    Book,
}

impl ItemType {
    /// Leading character of ids generated for this item type
    pub fn id_prefix(&self) -> char {
        match self {
            ItemType::Product => 'P',
            ItemType::Book => 'B',
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Product => write!(f, "product"),
            ItemType::Book => write!(f, "book"),
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "product" => Ok(ItemType::Product),
            "book" => Ok(ItemType::Book),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

/// Meal categories used to group recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Beverage,
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeCategory::Breakfast => write!(f, "breakfast"),
            RecipeCategory::Lunch => write!(f, "lunch"),
            RecipeCategory::Dinner => write!(f, "dinner"),
            RecipeCategory::Dessert => write!(f, "dessert"),
            RecipeCategory::Snack => write!(f, "snack"),
            RecipeCategory::Beverage => write!(f, "beverage"),
        }
    }
}

impl FromStr for RecipeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(RecipeCategory::Breakfast),
            "lunch" => Ok(RecipeCategory::Lunch),
            "dinner" => Ok(RecipeCategory::Dinner),
            "dessert" => Ok(RecipeCategory::Dessert),
            "snack" => Ok(RecipeCategory::Snack),
            "beverage" => Ok(RecipeCategory::Beverage),
            _ => Err(format!("Invalid recipe category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeDifficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for RecipeDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeDifficulty::Easy => write!(f, "easy"),
            RecipeDifficulty::Medium => write!(f, "medium"),
            RecipeDifficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for RecipeDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(RecipeDifficulty::Easy),
            "medium" => Ok(RecipeDifficulty::Medium),
            "hard" => Ok(RecipeDifficulty::Hard),
            _ => Err(format!("Invalid recipe difficulty: {}", s)),
        }
    }
}

/// Handling status of a contact submission. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Resolved,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [
        ContactStatus::New,
        ContactStatus::InProgress,
        ContactStatus::Resolved,
    ];
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactStatus::New => write!(f, "new"),
            ContactStatus::InProgress => write!(f, "in_progress"),
            ContactStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(ContactStatus::New),
            "in_progress" => Ok(ContactStatus::InProgress),
            "resolved" => Ok(ContactStatus::Resolved),
            _ => Err(format!("Invalid contact status: {}", s)),
        }
    }
}

/// Moderation status of a product review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Pending,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
    ];
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "pending"),
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(format!("Invalid review status: {}", s)),
        }
    }
}
