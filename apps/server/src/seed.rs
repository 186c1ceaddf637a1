//! Demo data seeding.
//!
//! Populates an empty database with a small bookshop catalog: an admin
//! account, 4 categories, 12 products, and 5 customers. Seeding is
//! idempotent; once any category exists it becomes a no-op.

use chrono::Utc;
use tracing::info;

use infinity_core::{Category, Customer, Product, User};
use infinity_db::repository::generate_id;
use infinity_db::Database;

use crate::auth::hash_password;
use crate::error::ApiResult;

/// Default admin credentials created by seeding.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// What seeding did.
#[derive(Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Data was already present; nothing changed.
    AlreadyExists,
    /// Fresh demo dataset created.
    Created,
}

/// Stock images reused across the demo products.
const PRODUCT_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1497633762265-9d179a990aa6?crop=entropy&cs=srgb&fm=jpg&ixid=M3w3NDQ2Mzl8MHwxfHNlYXJjaHwxfHxzY2hvb2wlMjBib29rc3xlbnwwfHx8fDE3NTgxOTc4Nzh8MA&ixlib=rb-4.1.0&q=85",
    "https://images.unsplash.com/photo-1565022536102-f7645c84354a?crop=entropy&cs=srgb&fm=jpg&ixid=M3w3NDQ2Mzl8MHwxfHNlYXJjaHwyfHxzY2hvb2wlMjBib29rc3xlbnwwfHx8fDE3NTgxOTc4Nzh8MA&ixlib=rb-4.1.0&q=85",
    "https://images.unsplash.com/photo-1631173716529-fd1696a807b0?crop=entropy&cs=srgb&fm=jpg&ixid=M3w3NDk1ODB8MHwxfHNlYXJjaHwxfHxzdGF0aW9uZXJ5fGVufDB8fHx8MTc1ODE5Nzg4M3ww&ixlib=rb-4.1.0&q=85",
    "https://images.unsplash.com/photo-1456735190827-d1262f71b8a3?crop=entropy&cs=srgb&fm=jpg&ixid=M3w3NDk1ODB8MHwxfHNlYXJjaHwyfHxzdGF0aW9uZXJ5fGVufDB8fHx8MTc1ODE5Nzg4M3ww&ixlib=rb-4.1.0&q=85",
];

/// Populates the database with the demo bookshop dataset.
pub async fn initialize_sample_data(db: &Database) -> ApiResult<SeedOutcome> {
    // Any existing category means the shop is already set up.
    if db.categories().count().await? > 0 {
        return Ok(SeedOutcome::AlreadyExists);
    }

    info!("Seeding demo data");

    // Admin account. Skipped if someone already registered the name.
    if !db.users().username_exists(ADMIN_USERNAME).await? {
        let admin = User {
            id: generate_id(),
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD)?,
            created_at: Utc::now(),
        };
        db.users().insert(&admin).await?;
    }

    let categories_data = [
        ("School Books", "Academic textbooks and educational materials"),
        ("Stationery", "Pens, pencils, notebooks and office supplies"),
        ("Educational Materials", "Learning aids and educational resources"),
        ("Art Supplies", "Drawing and creative materials"),
    ];

    let mut categories = Vec::with_capacity(categories_data.len());
    for (name, description) in categories_data {
        let category = Category {
            id: generate_id(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        db.categories().insert(&category).await?;
        categories.push(category);
    }

    // (name, category index, price in cents, quantity, image index, description)
    let products_data: [(&str, usize, i64, i64, usize, &str); 12] = [
        ("Mathematics Textbook Grade 10", 0, 85_000, 50, 0, "Comprehensive mathematics textbook for grade 10 students"),
        ("English Grammar Workbook", 0, 65_000, 75, 1, "Interactive English grammar exercises and activities"),
        ("Science Laboratory Manual", 0, 95_000, 30, 0, "Practical science experiments and laboratory procedures"),
        ("History of Sri Lanka", 0, 75_000, 40, 1, "Comprehensive history book covering Sri Lankan heritage"),
        ("Blue Ballpoint Pens (Pack of 10)", 1, 20_000, 100, 2, "High-quality ballpoint pens for everyday writing"),
        ("HB Pencils (Pack of 12)", 1, 15_000, 120, 3, "Standard HB pencils perfect for writing and drawing"),
        ("A4 Ruled Notebooks", 1, 30_000, 80, 2, "200-page ruled notebooks suitable for all subjects"),
        ("Geometry Set", 1, 45_000, 60, 3, "Complete geometry set with compass, protractor, and rulers"),
        ("Educational World Map", 2, 120_000, 25, 0, "Large educational world map for classroom use"),
        ("Calculator Scientific", 2, 250_000, 35, 1, "Advanced scientific calculator for mathematics and science"),
        ("Colored Pencils Set (24 colors)", 3, 80_000, 45, 2, "Professional colored pencils for art and drawing"),
        ("Art Sketchbook A3", 3, 60_000, 30, 3, "High-quality drawing paper for sketching and artwork"),
    ];

    for (name, cat_idx, price_cents, quantity, img_idx, description) in products_data {
        let product = Product {
            id: generate_id(),
            name: name.to_string(),
            category_id: categories[cat_idx].id.clone(),
            category_name: categories[cat_idx].name.clone(),
            price_cents,
            quantity,
            image_url: PRODUCT_IMAGES[img_idx].to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        db.products().insert(&product).await?;
    }

    let customers_data = [
        ("Amal Perera", "0771234567", "amal@email.com", "123 Main Street, Colombo 07"),
        ("Nimal Silva", "0779876543", "nimal@email.com", "456 Galle Road, Dehiwala"),
        ("Kamala Jayawardena", "0763456789", "kamala@email.com", "789 Kandy Road, Peradeniya"),
        ("Sunil Fernando", "0785551234", "sunil@email.com", "321 High Level Road, Nugegoda"),
        ("Priya Rajapaksa", "0771119999", "priya@email.com", "654 Temple Road, Mount Lavinia"),
    ];

    for (name, contact, email, address) in customers_data {
        let customer = Customer {
            id: generate_id(),
            name: name.to_string(),
            contact: contact.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
        };
        db.customers().insert(&customer).await?;
    }

    info!("Demo data seeded");
    Ok(SeedOutcome::Created)
}
