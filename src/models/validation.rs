use rust_decimal::Decimal;
use std::collections::HashSet;

use super::{
    AddCartItemRequest, AddFavoriteRequest, CreateBookRequest, CreateContactRequest,
    CreateProductRequest, CreateRecipeRequest, CreateReviewRequest, ItemType, PageRequest,
    UpdateBookRequest, UpdateCartItemRequest, UpdateProductRequest, UpdateRecipeRequest,
    ValidationError, ValidationResult, MAX_PAGE_SIZE,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MAX_NAME_LENGTH: usize = 200;
pub const MIN_NAME_LENGTH: usize = 1;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_CATEGORY_LENGTH: usize = 100;
pub const MAX_IMAGES_COUNT: usize = 10;
pub const MAX_IMAGE_URL_LENGTH: usize = 500;
pub const MAX_LIST_ENTRY_LENGTH: usize = 500;
pub const MAX_INGREDIENTS_COUNT: usize = 100;
pub const MAX_INSTRUCTIONS_COUNT: usize = 100;
pub const MAX_SERVINGS: u32 = 100;
pub const MAX_RECIPE_MINUTES: u32 = 1440;
pub const MAX_BOOK_PAGES: u32 = 10000;
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01
pub const MAX_PRICE: Decimal = Decimal::from_parts(9999999, 0, 0, false, 2); // 99999.99
pub const MAX_STOCK_QUANTITY: u32 = 999999;
pub const MAX_CART_QUANTITY: u32 = 1000;
pub const MIN_CART_QUANTITY: u32 = 1;
pub const MAX_USER_ID_LENGTH: usize = 100;
pub const DOCUMENT_ID_SUFFIX_LENGTH: usize = 8;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_SUBJECT_LENGTH: usize = 200;
pub const MAX_MESSAGE_LENGTH: usize = 5000;
pub const MAX_COMMENT_LENGTH: usize = 2000;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

impl Validate for CreateProductRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_description(&self.description)?;
        validate_price(&self.price)?;
        validate_category(&self.category)?;
        validate_stock_quantity(self.stock)?;
        validate_images(&self.images)?;
        Ok(())
    }
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(stock) = self.stock {
            validate_stock_quantity(stock)?;
        }
        if let Some(images) = &self.images {
            validate_images(images)?;
        }
        Ok(())
    }
}

impl Validate for CreateBookRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("title", &self.title)?;
        validate_name("author", &self.author)?;
        validate_description(&self.description)?;
        validate_price(&self.price)?;
        validate_category(&self.category)?;
        validate_stock_quantity(self.stock)?;
        if let Some(cover_image) = &self.cover_image {
            validate_image(cover_image)?;
        }
        if let Some(pages) = self.pages {
            validate_pages(pages)?;
        }
        if let Some(isbn) = &self.isbn {
            validate_isbn(isbn)?;
        }
        Ok(())
    }
}

impl Validate for UpdateBookRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(title) = &self.title {
            validate_name("title", title)?;
        }
        if let Some(author) = &self.author {
            validate_name("author", author)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(stock) = self.stock {
            validate_stock_quantity(stock)?;
        }
        if let Some(cover_image) = &self.cover_image {
            validate_image(cover_image)?;
        }
        if let Some(pages) = self.pages {
            validate_pages(pages)?;
        }
        if let Some(isbn) = &self.isbn {
            validate_isbn(isbn)?;
        }
        Ok(())
    }
}

impl Validate for CreateRecipeRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_description(&self.description)?;
        validate_minutes("prep_time_minutes", self.prep_time_minutes)?;
        validate_minutes("cook_time_minutes", self.cook_time_minutes)?;
        validate_servings(self.servings)?;
        validate_ingredients(&self.ingredients)?;
        validate_instructions(&self.instructions)?;
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        Ok(())
    }
}

impl Validate for UpdateRecipeRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(prep) = self.prep_time_minutes {
            validate_minutes("prep_time_minutes", prep)?;
        }
        if let Some(cook) = self.cook_time_minutes {
            validate_minutes("cook_time_minutes", cook)?;
        }
        if let Some(servings) = self.servings {
            validate_servings(servings)?;
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        if let Some(instructions) = &self.instructions {
            validate_instructions(instructions)?;
        }
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        Ok(())
    }
}

impl Validate for AddCartItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_item_id(&self.item_id, self.item_type)?;
        validate_cart_quantity(self.quantity)?;
        Ok(())
    }
}

impl Validate for UpdateCartItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        // Non-positive values are a removal, only the upper bound applies
        if self.quantity > i64::from(MAX_CART_QUANTITY) {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: "0".to_string(),
                max: MAX_CART_QUANTITY.to_string(),
                value: self.quantity.to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for AddFavoriteRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_item_id(&self.item_id, self.item_type)
    }
}

impl Validate for CreateContactRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_email(&self.email)?;
        if let Some(subject) = &self.subject {
            validate_max_length("subject", subject, MAX_SUBJECT_LENGTH)?;
        }
        validate_text("message", &self.message, MAX_MESSAGE_LENGTH)?;
        Ok(())
    }
}

impl Validate for CreateReviewRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(user_id) = &self.user_id {
            validate_user_id(user_id)?;
        }
        validate_name("author_name", &self.author_name)?;
        validate_rating(self.rating)?;
        validate_text("comment", &self.comment, MAX_COMMENT_LENGTH)?;
        Ok(())
    }
}

impl Validate for PageRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_PAGE_SIZE {
                return Err(ValidationError::OutOfRange {
                    field: "limit".to_string(),
                    min: "1".to_string(),
                    max: MAX_PAGE_SIZE.to_string(),
                    value: limit.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Validate a display name or title
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    let length = trimmed.chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min_length: MIN_NAME_LENGTH,
            actual_length: length,
        });
    }

    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length: MAX_NAME_LENGTH,
            actual_length: length,
        });
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

pub fn validate_description(description: &str) -> ValidationResult<()> {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "description".to_string(),
        });
    }

    let length = trimmed.chars().count();
    if length < MIN_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooShort {
            field: "description".to_string(),
            min_length: MIN_DESCRIPTION_LENGTH,
            actual_length: length,
        });
    }

    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max_length: MAX_DESCRIPTION_LENGTH,
            actual_length: length,
        });
    }

    Ok(())
}

pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "category".to_string(),
        });
    }
    validate_max_length("category", category, MAX_CATEGORY_LENGTH)
}

/// Price must be positive, bounded and carry at most 2 decimal places
pub fn validate_price(price: &Decimal) -> ValidationResult<()> {
    if *price < MIN_PRICE || *price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: MIN_PRICE.to_string(),
            max: MAX_PRICE.to_string(),
            value: price.to_string(),
        });
    }

    if price.normalize().scale() > 2 {
        return Err(ValidationError::InvalidValue {
            field: "price".to_string(),
            value: price.to_string(),
            reason: "Price cannot have more than 2 decimal places".to_string(),
        });
    }

    Ok(())
}

pub fn validate_stock_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity > MAX_STOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: "0".to_string(),
            max: MAX_STOCK_QUANTITY.to_string(),
            value: quantity.to_string(),
        });
    }

    Ok(())
}

/// Validate a stored image path or absolute image url
pub fn validate_image(image: &str) -> ValidationResult<()> {
    let trimmed = image.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "image".to_string(),
        });
    }

    if trimmed.len() > MAX_IMAGE_URL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "image".to_string(),
            max_length: MAX_IMAGE_URL_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            expected: "Asset path or URL without whitespace".to_string(),
        });
    }

    Ok(())
}

pub fn validate_images(images: &[String]) -> ValidationResult<()> {
    if images.len() > MAX_IMAGES_COUNT {
        return Err(ValidationError::InvalidValue {
            field: "images".to_string(),
            value: images.len().to_string(),
            reason: format!("Too many images, maximum allowed: {}", MAX_IMAGES_COUNT),
        });
    }

    images.iter().try_for_each(|image| validate_image(image))
}

pub fn validate_pages(pages: u32) -> ValidationResult<()> {
    if pages == 0 || pages > MAX_BOOK_PAGES {
        return Err(ValidationError::OutOfRange {
            field: "pages".to_string(),
            min: "1".to_string(),
            max: MAX_BOOK_PAGES.to_string(),
            value: pages.to_string(),
        });
    }
    Ok(())
}

/// ISBN-10 or ISBN-13, hyphens and spaces ignored. ISBN-10 may end in `X`.
pub fn validate_isbn(isbn: &str) -> ValidationResult<()> {
    let compact: Vec<char> = isbn
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect();

    let valid = match compact.len() {
        13 => compact.iter().all(|c| c.is_ascii_digit()),
        10 => {
            compact[..9].iter().all(|c| c.is_ascii_digit())
                && (compact[9].is_ascii_digit() || compact[9] == 'X' || compact[9] == 'x')
        }
        _ => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "isbn".to_string(),
            expected: "ISBN-10 or ISBN-13 (hyphens allowed)".to_string(),
        });
    }

    Ok(())
}

pub fn validate_minutes(field: &str, minutes: u32) -> ValidationResult<()> {
    if minutes > MAX_RECIPE_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: MAX_RECIPE_MINUTES.to_string(),
            value: minutes.to_string(),
        });
    }
    Ok(())
}

pub fn validate_servings(servings: u32) -> ValidationResult<()> {
    if servings == 0 || servings > MAX_SERVINGS {
        return Err(ValidationError::OutOfRange {
            field: "servings".to_string(),
            min: "1".to_string(),
            max: MAX_SERVINGS.to_string(),
            value: servings.to_string(),
        });
    }
    Ok(())
}

/// Validate ingredients list
pub fn validate_ingredients(ingredients: &[String]) -> ValidationResult<()> {
    validate_entry_list("ingredients", ingredients, MAX_INGREDIENTS_COUNT)?;

    let mut seen_ingredients = HashSet::new();
    for ingredient in ingredients {
        // Check for duplicates (case-insensitive)
        let ingredient_lower = ingredient.trim().to_lowercase();
        if !seen_ingredients.insert(ingredient_lower) {
            return Err(ValidationError::InvalidValue {
                field: "ingredients".to_string(),
                value: ingredient.clone(),
                reason: "Duplicate ingredient found".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_instructions(instructions: &[String]) -> ValidationResult<()> {
    validate_entry_list("instructions", instructions, MAX_INSTRUCTIONS_COUNT)
}

fn validate_entry_list(field: &str, entries: &[String], max_count: usize) -> ValidationResult<()> {
    if entries.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if entries.len() > max_count {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: entries.len().to_string(),
            reason: format!("Too many entries, maximum allowed: {}", max_count),
        });
    }

    for (index, entry) in entries.iter().enumerate() {
        let trimmed = entry.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}[{}]", field, index),
                value: entry.clone(),
                reason: "Entry cannot be empty".to_string(),
            });
        }

        if trimmed.len() > MAX_LIST_ENTRY_LENGTH {
            return Err(ValidationError::TooLong {
                field: format!("{}[{}]", field, index),
                max_length: MAX_LIST_ENTRY_LENGTH,
                actual_length: trimmed.len(),
            });
        }
    }

    Ok(())
}

/// Validate a document id: its collection prefix followed by 8 alphanumerics
pub fn validate_document_id(field: &str, id: &str, prefix: char) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    let well_formed = id
        .strip_prefix(prefix)
        .map(|suffix| {
            suffix.len() == DOCUMENT_ID_SUFFIX_LENGTH
                && suffix.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or(false);

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            expected: format!(
                "Format: {} followed by {} alphanumeric characters (e.g., {}1a2b3c4d)",
                prefix, DOCUMENT_ID_SUFFIX_LENGTH, prefix
            ),
        });
    }

    Ok(())
}

pub fn validate_item_id(item_id: &str, item_type: ItemType) -> ValidationResult<()> {
    validate_document_id("item_id", item_id, item_type.id_prefix())
}

/// Validate cart item quantity
pub fn validate_cart_quantity(quantity: u32) -> ValidationResult<()> {
    if !(MIN_CART_QUANTITY..=MAX_CART_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_CART_QUANTITY.to_string(),
            max: MAX_CART_QUANTITY.to_string(),
            value: quantity.to_string(),
        });
    }

    Ok(())
}

/// Validate user ID format. Ids are used as storage keys exactly as given.
pub fn validate_user_id(user_id: &str) -> ValidationResult<()> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "user_id".to_string(),
        });
    }

    if !user_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "user_id".to_string(),
            expected: "User ID must contain only alphanumeric characters, hyphens, and underscores"
                .to_string(),
        });
    }

    if user_id.len() > MAX_USER_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "user_id".to_string(),
            max_length: MAX_USER_ID_LENGTH,
            actual_length: user_id.len(),
        });
    }

    Ok(())
}

/// Non-empty local part, `@`, and a dotted domain with no empty labels
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "email".to_string(),
        });
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max_length: MAX_EMAIL_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
                && !trimmed.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            expected: "name@domain.tld".to_string(),
        });
    }

    Ok(())
}

pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING.to_string(),
            max: MAX_RATING.to_string(),
            value: rating.to_string(),
        });
    }
    Ok(())
}

/// Required free-form text with an upper bound
pub fn validate_text(field: &str, text: &str, max_length: usize) -> ValidationResult<()> {
    if text.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    validate_max_length(field, text, max_length)
}

fn validate_max_length(field: &str, value: &str, max_length: usize) -> ValidationResult<()> {
    let length = value.trim().chars().count();
    if length > max_length {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length,
            actual_length: length,
        });
    }
    Ok(())
}
