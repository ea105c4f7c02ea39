//! Tests for the in-memory catalog.

use storefront_core::{
    CategoryChanges, ListQuery, NewCategory, NewProduct, ProductChanges,
};
use storefront_error::{DatabaseErrorKind, StorefrontErrorKind};
use storefront_interface::{CategoryRepository, InMemoryCatalog, ProductRepository};

fn category(name: &str) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        category_choix: "retail".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_find_category() {
    let catalog = InMemoryCatalog::new();
    let created = catalog.create_category(&category("Electronics")).await.unwrap();

    let found = catalog.find_category(created.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Electronics");
    assert_eq!(found.category_choix, "retail");
}

#[tokio::test]
async fn test_duplicate_category_name_is_unique_violation() {
    let catalog = InMemoryCatalog::new();
    catalog.create_category(&category("Toys")).await.unwrap();

    let err = catalog.create_category(&category("Toys")).await.unwrap_err();
    match err.kind() {
        StorefrontErrorKind::Database(db) => {
            assert!(matches!(db.kind, DatabaseErrorKind::UniqueViolation(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(catalog.category_count().await, 1);
}

#[tokio::test]
async fn test_rename_to_own_name_is_allowed() {
    let catalog = InMemoryCatalog::new();
    let toys = catalog.create_category(&category("Toys")).await.unwrap();
    catalog.create_category(&category("Games")).await.unwrap();

    let changes = CategoryChanges {
        name: Some("Toys".to_string()),
        category_choix: None,
    };
    assert!(catalog.update_category(toys.id, &changes).await.is_ok());

    let clash = CategoryChanges {
        name: Some("Games".to_string()),
        category_choix: None,
    };
    assert!(catalog.update_category(toys.id, &clash).await.is_err());
}

#[tokio::test]
async fn test_list_is_newest_first_and_paginated() {
    let catalog = InMemoryCatalog::new();
    for i in 0..25 {
        catalog
            .create_product(&NewProduct::new(format!("Item {i}"), i), None)
            .await
            .unwrap();
    }

    let page = catalog
        .list_products(&ListQuery::new(3, 10, ""))
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.from, Some(21));
    assert_eq!(page.to, Some(25));
    // ids descend; the oldest rows land on the last page
    assert_eq!(page.data.last().unwrap().id, 1);
}

#[tokio::test]
async fn test_search_matches_description_and_price() {
    let catalog = InMemoryCatalog::new();
    catalog
        .create_product(
            &NewProduct::new("Lamp", 1).with_description(Some("Warm LIGHT".to_string())),
            None,
        )
        .await
        .unwrap();
    catalog
        .create_product(&NewProduct::new("Chair", 1).with_price(Some(49.5)), None)
        .await
        .unwrap();

    let page = catalog
        .list_products(&ListQuery::new(1, 10, "light"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].name, "Lamp");

    let page = catalog
        .list_products(&ListQuery::new(1, 10, "49.5"))
        .await
        .unwrap();
    assert_eq!(page.data[0].name, "Chair");
}

#[tokio::test]
async fn test_update_replaces_category_set() {
    let catalog = InMemoryCatalog::new();
    let a = catalog.create_category(&category("A")).await.unwrap();
    let b = catalog.create_category(&category("B")).await.unwrap();
    let c = catalog.create_category(&category("C")).await.unwrap();
    let product = catalog
        .create_product(&NewProduct::new("Widget", 1), Some(&[a.id, b.id]))
        .await
        .unwrap();

    catalog
        .update_product(product.id, &ProductChanges::default(), Some(&[c.id]))
        .await
        .unwrap();

    let loaded = catalog.products_with_categories().await.unwrap();
    let ids: Vec<i64> = loaded[0].categories.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c.id]);
}

#[tokio::test]
async fn test_unknown_category_id_is_rejected() {
    let catalog = InMemoryCatalog::new();
    let result = catalog
        .create_product(&NewProduct::new("Widget", 1), Some(&[42]))
        .await;
    assert!(result.is_err());
    assert_eq!(catalog.product_count().await, 0);
}

#[tokio::test]
async fn test_delete_category_detaches_products() {
    let catalog = InMemoryCatalog::new();
    let a = catalog.create_category(&category("A")).await.unwrap();
    let product = catalog
        .create_product(&NewProduct::new("Widget", 1), Some(&[a.id]))
        .await
        .unwrap();
    assert_eq!(catalog.count_category_products(a.id).await.unwrap(), 1);

    let removed = catalog.delete_category(a.id).await.unwrap();
    assert_eq!(removed.map(|c| c.name), Some("A".to_string()));
    assert!(catalog.product_categories(product.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_product_is_none() {
    let catalog = InMemoryCatalog::new();
    catalog
        .create_product(&NewProduct::new("Keep", 1), None)
        .await
        .unwrap();
    assert!(catalog.delete_product(99).await.unwrap().is_none());
    assert_eq!(catalog.product_count().await, 1);
}
