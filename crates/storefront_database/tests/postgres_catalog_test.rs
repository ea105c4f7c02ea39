//! Tests for the PostgreSQL catalog.
//!
//! Requires `DATABASE_URL` pointing at a database with the catalog tables.
//! Run with `--features postgres-tests`.
#![cfg(feature = "postgres-tests")]

use storefront_core::{ListQuery, NewCategory, NewProduct, ProductChanges};
use storefront_database::{PostgresCatalog, create_pool};
use storefront_interface::{CategoryRepository, ProductRepository};

fn catalog() -> PostgresCatalog {
    let _ = dotenvy::dotenv();
    PostgresCatalog::new(create_pool(None, 2).expect("DATABASE_URL must point at a test database"))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn test_category_round_trip_and_uniqueness() {
    let catalog = catalog();
    let name = unique("Electronics");
    let created = catalog
        .create_category(&NewCategory {
            name: name.clone(),
            category_choix: "retail".to_string(),
        })
        .await
        .unwrap();

    let found = catalog.find_category(created.id).await.unwrap().unwrap();
    assert_eq!(found.name, name);
    assert!(catalog.category_name_taken(&name, None).await.unwrap());
    assert!(!catalog.category_name_taken(&name, Some(created.id)).await.unwrap());

    let duplicate = catalog
        .create_category(&NewCategory {
            name: name.clone(),
            category_choix: "retail".to_string(),
        })
        .await;
    assert!(duplicate.is_err());

    catalog.delete_category(created.id).await.unwrap();
}

#[tokio::test]
async fn test_product_sync_and_search() {
    let catalog = catalog();
    let a = catalog
        .create_category(&NewCategory {
            name: unique("A"),
            category_choix: "x".to_string(),
        })
        .await
        .unwrap();
    let b = catalog
        .create_category(&NewCategory {
            name: unique("B"),
            category_choix: "x".to_string(),
        })
        .await
        .unwrap();

    let name = unique("Widget_100%");
    let product = catalog
        .create_product(&NewProduct::new(name.clone(), 3), Some(&[a.id]))
        .await
        .unwrap();
    catalog
        .update_product(product.id, &ProductChanges::default(), Some(&[b.id, b.id]))
        .await
        .unwrap();

    let categories = catalog.product_categories(product.id).await.unwrap();
    assert_eq!(categories.iter().map(|c| c.id).collect::<Vec<_>>(), vec![b.id]);

    let page = catalog
        .list_products(&ListQuery::new(1, 10, name.to_uppercase()))
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    catalog.delete_product(product.id).await.unwrap();
    catalog.delete_category(a.id).await.unwrap();
    catalog.delete_category(b.id).await.unwrap();
}
