use aws_sdk_dynamodb::types::AttributeValue;

use crate::models::{Book, Contact, Document, Product, Recipe, RepositoryResult, Review};

use super::dynamodb::{
    bool_or_false, number_attr, optional_number, optional_string, required_number,
    required_parsed, required_string, required_timestamp, string_attr, string_list,
    string_list_attr, timestamp_attr, Item,
};

/// Conversion between a document and its DynamoDB item. Every table is keyed by `id`.
pub trait DynamoRecord: Document {
    fn to_item(&self) -> Item;
    fn from_item(item: &Item) -> RepositoryResult<Self>;
}

fn insert_optional_string(item: &mut Item, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        item.insert(key.to_string(), string_attr(value.clone()));
    }
}

impl DynamoRecord for Product {
    fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), string_attr(&self.id));
        item.insert("name".to_string(), string_attr(&self.name));
        item.insert("description".to_string(), string_attr(&self.description));
        item.insert("price".to_string(), number_attr(self.price));
        item.insert("category".to_string(), string_attr(&self.category));
        item.insert("stock".to_string(), number_attr(self.stock));
        item.insert("images".to_string(), string_list_attr(&self.images));
        item.insert(
            "is_featured".to_string(),
            AttributeValue::Bool(self.is_featured),
        );
        item.insert(
            "is_new_arrival".to_string(),
            AttributeValue::Bool(self.is_new_arrival),
        );
        item.insert(
            "on_sale".to_string(),
            AttributeValue::Bool(self.on_sale),
        );
        item.insert("created_at".to_string(), timestamp_attr(&self.created_at));
        item.insert("updated_at".to_string(), timestamp_attr(&self.updated_at));
        item
    }

    fn from_item(item: &Item) -> RepositoryResult<Self> {
        let created_at = required_timestamp(item, "created_at")?;
        Ok(Self {
            id: required_string(item, "id")?,
            name: required_string(item, "name")?,
            description: required_string(item, "description")?,
            price: required_number(item, "price")?,
            category: required_string(item, "category")?,
            stock: optional_number(item, "stock")?.unwrap_or(0),
            images: string_list(item, "images"),
            is_featured: bool_or_false(item, "is_featured"),
            is_new_arrival: bool_or_false(item, "is_new_arrival"),
            on_sale: bool_or_false(item, "on_sale"),
            created_at,
            // Older items may lack updated_at
            updated_at: required_timestamp(item, "updated_at").unwrap_or(created_at),
        })
    }
}

impl DynamoRecord for Book {
    fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), string_attr(&self.id));
        item.insert("title".to_string(), string_attr(&self.title));
        item.insert("author".to_string(), string_attr(&self.author));
        item.insert("description".to_string(), string_attr(&self.description));
        item.insert("price".to_string(), number_attr(self.price));
        item.insert("category".to_string(), string_attr(&self.category));
        item.insert("stock".to_string(), number_attr(self.stock));
        insert_optional_string(&mut item, "cover_image", &self.cover_image);
        if let Some(pages) = self.pages {
            item.insert("pages".to_string(), number_attr(pages));
        }
        insert_optional_string(&mut item, "isbn", &self.isbn);
        item.insert("created_at".to_string(), timestamp_attr(&self.created_at));
        item.insert("updated_at".to_string(), timestamp_attr(&self.updated_at));
        item
    }

    fn from_item(item: &Item) -> RepositoryResult<Self> {
        let created_at = required_timestamp(item, "created_at")?;
        Ok(Self {
            id: required_string(item, "id")?,
            title: required_string(item, "title")?,
            author: required_string(item, "author")?,
            description: required_string(item, "description")?,
            price: required_number(item, "price")?,
            category: required_string(item, "category")?,
            stock: optional_number(item, "stock")?.unwrap_or(0),
            cover_image: optional_string(item, "cover_image"),
            pages: optional_number(item, "pages")?,
            isbn: optional_string(item, "isbn"),
            created_at,
            updated_at: required_timestamp(item, "updated_at").unwrap_or(created_at),
        })
    }
}

impl DynamoRecord for Recipe {
    fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), string_attr(&self.id));
        item.insert("name".to_string(), string_attr(&self.name));
        item.insert("description".to_string(), string_attr(&self.description));
        item.insert("category".to_string(), string_attr(self.category.to_string()));
        item.insert(
            "difficulty".to_string(),
            string_attr(self.difficulty.to_string()),
        );
        item.insert(
            "prep_time_minutes".to_string(),
            number_attr(self.prep_time_minutes),
        );
        item.insert(
            "cook_time_minutes".to_string(),
            number_attr(self.cook_time_minutes),
        );
        item.insert("servings".to_string(), number_attr(self.servings));
        item.insert("ingredients".to_string(), string_list_attr(&self.ingredients));
        item.insert(
            "instructions".to_string(),
            string_list_attr(&self.instructions),
        );
        insert_optional_string(&mut item, "image", &self.image);
        item.insert("created_at".to_string(), timestamp_attr(&self.created_at));
        item.insert("updated_at".to_string(), timestamp_attr(&self.updated_at));
        item
    }

    fn from_item(item: &Item) -> RepositoryResult<Self> {
        let created_at = required_timestamp(item, "created_at")?;
        Ok(Self {
            id: required_string(item, "id")?,
            name: required_string(item, "name")?,
            description: required_string(item, "description")?,
            category: required_parsed(item, "category")?,
            difficulty: required_parsed(item, "difficulty")?,
            prep_time_minutes: optional_number(item, "prep_time_minutes")?.unwrap_or(0),
            cook_time_minutes: optional_number(item, "cook_time_minutes")?.unwrap_or(0),
            servings: required_number(item, "servings")?,
            ingredients: string_list(item, "ingredients"),
            instructions: string_list(item, "instructions"),
            image: optional_string(item, "image"),
            created_at,
            updated_at: required_timestamp(item, "updated_at").unwrap_or(created_at),
        })
    }
}

impl DynamoRecord for Contact {
    fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), string_attr(&self.id));
        item.insert("name".to_string(), string_attr(&self.name));
        item.insert("email".to_string(), string_attr(&self.email));
        insert_optional_string(&mut item, "subject", &self.subject);
        item.insert("message".to_string(), string_attr(&self.message));
        item.insert("status".to_string(), string_attr(self.status.to_string()));
        item.insert("created_at".to_string(), timestamp_attr(&self.created_at));
        item.insert("updated_at".to_string(), timestamp_attr(&self.updated_at));
        item
    }

    fn from_item(item: &Item) -> RepositoryResult<Self> {
        let created_at = required_timestamp(item, "created_at")?;
        Ok(Self {
            id: required_string(item, "id")?,
            name: required_string(item, "name")?,
            email: required_string(item, "email")?,
            subject: optional_string(item, "subject"),
            message: required_string(item, "message")?,
            status: required_parsed(item, "status")?,
            created_at,
            updated_at: required_timestamp(item, "updated_at").unwrap_or(created_at),
        })
    }
}

impl DynamoRecord for Review {
    fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), string_attr(&self.id));
        item.insert("product_id".to_string(), string_attr(&self.product_id));
        insert_optional_string(&mut item, "user_id", &self.user_id);
        item.insert("author_name".to_string(), string_attr(&self.author_name));
        item.insert("rating".to_string(), number_attr(self.rating));
        item.insert("comment".to_string(), string_attr(&self.comment));
        item.insert("status".to_string(), string_attr(self.status.to_string()));
        item.insert("created_at".to_string(), timestamp_attr(&self.created_at));
        item.insert("updated_at".to_string(), timestamp_attr(&self.updated_at));
        item
    }

    fn from_item(item: &Item) -> RepositoryResult<Self> {
        let created_at = required_timestamp(item, "created_at")?;
        Ok(Self {
            id: required_string(item, "id")?,
            product_id: required_string(item, "product_id")?,
            user_id: optional_string(item, "user_id"),
            author_name: required_string(item, "author_name")?,
            rating: required_number(item, "rating")?,
            comment: required_string(item, "comment")?,
            status: required_parsed(item, "status")?,
            created_at,
            updated_at: required_timestamp(item, "updated_at").unwrap_or(created_at),
        })
    }
}
