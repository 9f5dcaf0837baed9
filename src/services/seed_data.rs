use rust_decimal_macros::dec;

use crate::models::{
    CreateBookRequest, CreateProductRequest, CreateRecipeRequest, RecipeCategory,
    RecipeDifficulty,
};

/// Create the relative asset path for a seeded image
fn asset_path(folder: &str, image_name: &str) -> String {
    format!("{}/{}", folder, image_name)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn sample_products() -> Vec<CreateProductRequest> {
    vec![
        CreateProductRequest {
            name: "Cast Iron Skillet".to_string(),
            description: "Pre-seasoned 10 inch skillet that goes from stovetop to oven."
                .to_string(),
            price: dec!(39.99),
            category: "Kitchen".to_string(),
            stock: 40,
            images: vec![
                asset_path("products", "cast-iron-skillet.jpg"),
                asset_path("products", "cast-iron-skillet-side.jpg"),
            ],
            is_featured: true,
            is_new_arrival: false,
            on_sale: false,
        },
        CreateProductRequest {
            name: "Linen Table Runner".to_string(),
            description: "Stonewashed linen runner in oat, 14 by 90 inches.".to_string(),
            price: dec!(28.00),
            category: "Dining".to_string(),
            stock: 25,
            images: vec![asset_path("products", "linen-runner.jpg")],
            is_featured: false,
            is_new_arrival: true,
            on_sale: false,
        },
        CreateProductRequest {
            name: "Ceramic Pour-Over Set".to_string(),
            description: "Hand-thrown dripper with matching carafe for two cups.".to_string(),
            price: dec!(54.50),
            category: "Kitchen".to_string(),
            stock: 12,
            images: vec![asset_path("products", "pour-over-set.jpg")],
            is_featured: true,
            is_new_arrival: true,
            on_sale: false,
        },
        CreateProductRequest {
            name: "Wool Throw Blanket".to_string(),
            description: "Herringbone lambswool throw, warm without the weight.".to_string(),
            price: dec!(89.00),
            category: "Living".to_string(),
            stock: 8,
            images: vec![asset_path("products", "wool-throw.jpg")],
            is_featured: false,
            is_new_arrival: false,
            on_sale: true,
        },
        CreateProductRequest {
            name: "Beeswax Pillar Candles".to_string(),
            description: "Set of three unscented pillars poured from local beeswax.".to_string(),
            price: dec!(24.00),
            category: "Living".to_string(),
            stock: 60,
            images: vec![asset_path("products", "beeswax-pillars.jpg")],
            is_featured: false,
            is_new_arrival: false,
            on_sale: false,
        },
        CreateProductRequest {
            name: "Olive Wood Utensil Set".to_string(),
            description: "Spoon, spatula and server carved from a single olive branch."
                .to_string(),
            price: dec!(32.00),
            category: "Kitchen".to_string(),
            stock: 0,
            images: vec![asset_path("products", "olive-wood-utensils.jpg")],
            is_featured: false,
            is_new_arrival: false,
            on_sale: true,
        },
    ]
}

pub fn sample_books() -> Vec<CreateBookRequest> {
    vec![
        CreateBookRequest {
            title: "The Unhurried Kitchen".to_string(),
            author: "Marguerite Vale".to_string(),
            description: "Seasonal cooking built around a well-stocked pantry.".to_string(),
            price: dec!(29.95),
            category: "Cookbooks".to_string(),
            stock: 15,
            cover_image: Some(asset_path("books", "unhurried-kitchen.jpg")),
            pages: Some(288),
            isbn: Some("978-0-00-000001-1".to_string()),
        },
        CreateBookRequest {
            title: "Rooms That Breathe".to_string(),
            author: "Tomas Lindqvist".to_string(),
            description: "A practical guide to light, texture and calm in small homes."
                .to_string(),
            price: dec!(34.00),
            category: "Home & Design".to_string(),
            stock: 9,
            cover_image: Some(asset_path("books", "rooms-that-breathe.jpg")),
            pages: Some(224),
            isbn: None,
        },
        CreateBookRequest {
            title: "Bread Every Day".to_string(),
            author: "Priya Okafor".to_string(),
            description: "Same-day and overnight loaves for a home oven.".to_string(),
            price: dec!(22.50),
            category: "Cookbooks".to_string(),
            stock: 20,
            cover_image: Some(asset_path("books", "bread-every-day.jpg")),
            pages: Some(196),
            isbn: None,
        },
    ]
}

pub fn sample_recipes() -> Vec<CreateRecipeRequest> {
    vec![
        CreateRecipeRequest {
            name: "Skillet Cornbread".to_string(),
            description: "Crisp-edged cornbread baked in a preheated cast iron pan.".to_string(),
            category: RecipeCategory::Snack,
            difficulty: RecipeDifficulty::Easy,
            prep_time_minutes: 10,
            cook_time_minutes: 25,
            servings: 8,
            ingredients: strings(&[
                "1 cup cornmeal",
                "1 cup flour",
                "1 tbsp baking powder",
                "1 cup buttermilk",
                "2 eggs",
                "4 tbsp butter",
            ]),
            instructions: strings(&[
                "Heat the buttered skillet in a 220C oven.",
                "Whisk dry ingredients, then stir in buttermilk and eggs.",
                "Pour into the hot skillet and bake until golden.",
            ]),
            image: Some(asset_path("recipes", "skillet-cornbread.jpg")),
        },
        CreateRecipeRequest {
            name: "Shakshuka".to_string(),
            description: "Eggs poached in a spiced tomato and pepper sauce.".to_string(),
            category: RecipeCategory::Breakfast,
            difficulty: RecipeDifficulty::Medium,
            prep_time_minutes: 15,
            cook_time_minutes: 20,
            servings: 4,
            ingredients: strings(&[
                "2 tbsp olive oil",
                "1 onion",
                "1 red pepper",
                "2 cloves garlic",
                "1 tsp cumin",
                "800 g crushed tomatoes",
                "6 eggs",
            ]),
            instructions: strings(&[
                "Soften onion and pepper in oil.",
                "Add garlic and cumin, then tomatoes, and simmer 10 minutes.",
                "Make wells, crack in the eggs, cover until just set.",
            ]),
            image: Some(asset_path("recipes", "shakshuka.jpg")),
        },
        CreateRecipeRequest {
            name: "Braised Short Ribs".to_string(),
            description: "Slow oven-braised short ribs with red wine and root vegetables."
                .to_string(),
            category: RecipeCategory::Dinner,
            difficulty: RecipeDifficulty::Hard,
            prep_time_minutes: 30,
            cook_time_minutes: 180,
            servings: 6,
            ingredients: strings(&[
                "2 kg bone-in short ribs",
                "2 carrots",
                "1 onion",
                "2 tbsp tomato paste",
                "500 ml red wine",
                "500 ml beef stock",
            ]),
            instructions: strings(&[
                "Season and sear the ribs on all sides.",
                "Soften vegetables, add tomato paste, then deglaze with wine.",
                "Add stock, cover and braise at 160C until tender.",
            ]),
            image: None,
        },
        CreateRecipeRequest {
            name: "Iced Hibiscus Tea".to_string(),
            description: "Tart ruby-red tea steeped from dried hibiscus and honey.".to_string(),
            category: RecipeCategory::Beverage,
            difficulty: RecipeDifficulty::Easy,
            prep_time_minutes: 5,
            cook_time_minutes: 10,
            servings: 4,
            ingredients: strings(&["1/2 cup dried hibiscus", "4 cups water", "3 tbsp honey"]),
            instructions: strings(&[
                "Bring water to a boil and pour over the hibiscus.",
                "Steep 10 minutes, strain and stir in honey.",
                "Chill and serve over ice.",
            ]),
            image: Some(asset_path("recipes", "hibiscus-tea.jpg")),
        },
    ]
}
