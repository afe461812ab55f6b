//! Database seed script: staff account plus a starter catalogue
//! Run with: cargo run --bin seed

use sqlx::postgres::PgPoolOptions;

use blog_service::models::{NewCategory, NewLocation, NewUser};
use blog_service::repository::{BlogRepository, PostgresBlogRepository};
use blog_service::security::hash_password;

const STARTER_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Travel", "Trips, routes and places worth the detour", "travel"),
    ("Food", "Recipes and restaurant notes", "food"),
    ("Notes", "Everything else", "notes"),
];

const STARTER_LOCATIONS: &[&str] = &["Moscow", "Saint Petersburg", "Kamchatka"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/blogicum".to_string());

    println!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    println!("Connected, schema up to date");

    let repo = PostgresBlogRepository::new(pool);

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@blogicum.local".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@12345".to_string());

    if repo.find_user_by_username(&username).await?.is_some() {
        println!("Staff user '{}' already exists, skipping", username);
    } else {
        repo.create_user(NewUser {
            username: username.clone(),
            email: email.clone(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: hash_password(&password)?,
            is_staff: true,
        })
        .await?;
        println!("Staff user '{}' created", username);
    }

    for (title, description, slug) in STARTER_CATEGORIES {
        if repo.find_category_by_slug(slug).await?.is_some() {
            continue;
        }
        repo.create_category(NewCategory {
            title: title.to_string(),
            description: description.to_string(),
            slug: slug.to_string(),
            is_published: true,
        })
        .await?;
        println!("Category '{}' created", slug);
    }

    let existing = repo.list_locations(false).await?;
    for name in STARTER_LOCATIONS {
        if existing.iter().any(|l| l.name == *name) {
            continue;
        }
        repo.create_location(NewLocation {
            name: name.to_string(),
            is_published: true,
        })
        .await?;
        println!("Location '{}' created", name);
    }

    println!("\n========================================");
    println!("Seed complete");
    println!("========================================");
    println!("Username: {}", username);
    println!("Email:    {}", email);
    println!("\nChange the default password after first login.");

    Ok(())
}
