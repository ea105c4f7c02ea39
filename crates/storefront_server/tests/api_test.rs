//! End-to-end API tests against the in-memory catalog and a temporary image store.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use storefront_core::{CategoryDeletePolicy, ImageCleanupPolicy, Policies};
use storefront_interface::InMemoryCatalog;
use storefront_server::{AppState, CatalogService, StorefrontConfig, create_router};
use storefront_storage::FileSystemImageStore;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "storefront-test-boundary";

struct TestApp {
    router: Router,
    catalog: Arc<InMemoryCatalog>,
    _storage: TempDir,
}

fn test_app(policies: Policies) -> TestApp {
    let storage = tempfile::tempdir().unwrap();
    let config = StorefrontConfig::bundled().unwrap();
    let catalog = Arc::new(InMemoryCatalog::new());
    let images = Arc::new(FileSystemImageStore::new(storage.path()).unwrap());

    let service = CatalogService::new(catalog.clone(), catalog.clone(), images, policies);
    let state = AppState::new(service, config.page_limits(), catalog.clone());
    let router = create_router(state, config.server()).unwrap();

    TestApp {
        router,
        catalog,
        _storage: storage,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

fn multipart_request(method: &str, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create_category(router: &Router, name: &str) -> i64 {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/categories",
            json!({ "name": name, "CategoryChoix": "retail" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

fn category_ids(product: &Value) -> BTreeSet<i64> {
    product["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app(Policies::default());
    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn duplicate_category_is_rejected_without_write() {
    let app = test_app(Policies::default());
    let request = json!({ "name": "Electronics", "CategoryChoix": "retail" });

    let (status, body) = send(&app.router, json_request("POST", "/categories", request.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Category created successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["CategoryChoix"], "retail");

    let (status, body) = send(&app.router, json_request("POST", "/categories", request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert_eq!(body["errors"]["name"][0], "The name has already been taken.");
    assert_eq!(app.catalog.category_count().await, 1);

    let (status, body) = send(&app.router, get("/categories/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Electronics");
}

#[tokio::test]
async fn category_requires_both_fields() {
    let app = test_app(Policies::default());
    let (status, body) = send(
        &app.router,
        json_request("POST", "/categories", json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["CategoryChoix"].is_array());
    assert_eq!(app.catalog.category_count().await, 0);
}

#[tokio::test]
async fn category_update_keeps_name_unique() {
    let app = test_app(Policies::default());
    create_category(&app.router, "Books").await;
    let games = create_category(&app.router, "Games").await;

    let (status, _) = send(
        &app.router,
        json_request("PUT", &format!("/categories/{}", games), json!({ "name": "Books" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app.router,
        json_request("PUT", &format!("/categories/{}", games), json!({ "name": "Games" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category updated successfully");
}

#[tokio::test]
async fn list_paginates_and_searches() {
    let app = test_app(Policies::default());
    for i in 0..12 {
        create_category(&app.router, &format!("Category {:02}", i)).await;
    }

    let (status, body) = send(&app.router, get("/categories?page=2&per_page=5")).await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["data"];
    assert_eq!(page["current_page"], 2);
    assert_eq!(page["total"], 12);
    assert_eq!(page["last_page"], 3);
    assert_eq!(page["from"], 6);
    assert_eq!(page["to"], 10);
    assert_eq!(page["data"].as_array().unwrap().len(), 5);

    let (_, body) = send(&app.router, get("/categories?page=abc&showing=0")).await;
    assert_eq!(body["data"]["current_page"], 1);
    assert_eq!(body["data"]["per_page"], 10);

    let (_, body) = send(&app.router, get("/categories?search=category%2011")).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["name"], "Category 11");

    let (_, body) = send(&app.router, get("/categories/all")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn missing_records_answer_not_found() {
    let app = test_app(Policies::default());

    let (status, body) = send(&app.router, delete("/products/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product not found.");
    assert_eq!(app.catalog.product_count().await, 0);

    let (status, _) = send(&app.router, get("/categories/not-a-number")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, get("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn product_update_replaces_category_set() {
    let app = test_app(Policies::default());
    let a = create_category(&app.router, "A").await;
    let b = create_category(&app.router, "B").await;
    let c = create_category(&app.router, "C").await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/products",
            json!({
                "name": "Widget",
                "price": "",
                "quantity_available": 5,
                "category_id": [a, b, b],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["data"]["price"].is_null());
    assert_eq!(category_ids(&body["data"]), BTreeSet::from([a, b]));
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app.router,
        json_request(
            "PUT",
            &format!("/products/{}", id),
            json!({ "price": 9.5, "category_id": [b, c] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["price"], 9.5);

    let (_, body) = send(&app.router, get("/products/with-categories")).await;
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(category_ids(&products[0]), BTreeSet::from([b, c]));

    let (status, body) = send(&app.router, get(&format!("/products/{}/edit", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category_ids(&body["data"]), BTreeSet::from([b, c]));
}

#[tokio::test]
async fn unknown_category_ids_are_invalid() {
    let app = test_app(Policies::default());
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/products",
            json!({ "name": "Widget", "quantity_available": 1, "category_id": [42] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["category_id.0"].is_array());
    assert_eq!(app.catalog.product_count().await, 0);
}

#[tokio::test]
async fn uploaded_image_is_served_back() {
    let app = test_app(Policies::default());
    let category = create_category(&app.router, "Electronics").await;
    let image: Vec<u8> = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
        .into_iter()
        .chain((0..=255u8).cycle().take(4096))
        .collect();
    let category_text = category.to_string();

    let (status, body) = send(
        &app.router,
        multipart_request(
            "POST",
            "/products",
            &[
                Part::Text("name", "Widget"),
                Part::Text("quantity_available", "5"),
                Part::Text("category_id[]", &category_text),
                Part::File("image1", "widget.png", "image/png", &image),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Product created successfully");

    let filename = body["data"]["image1"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_eq!(filename.len(), 32 + ".png".len());

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/images/{}", filename)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.as_ref(), image.as_slice());
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let app = test_app(Policies::default());
    let (status, body) = send(
        &app.router,
        multipart_request(
            "POST",
            "/products",
            &[
                Part::Text("name", "Widget"),
                Part::Text("quantity_available", "5"),
                Part::File("image1", "notes.txt", "text/plain", b"hello"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["image1"].is_array());
}

#[tokio::test]
async fn unsafe_or_missing_images_are_not_found() {
    let app = test_app(Policies::default());

    let (status, body) = send(&app.router, get("/images/..%2F..%2Fetc%2Fpasswd")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Image not found.");

    let (status, _) = send(&app.router, get("/images/missing.png")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn restrict_policy_blocks_deleting_used_category() {
    let app = test_app(Policies {
        category_delete: CategoryDeletePolicy::Restrict,
        ..Policies::default()
    });
    let category = create_category(&app.router, "Electronics").await;
    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/products",
            json!({ "name": "Widget", "quantity_available": 1, "category_id": [category] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app.router, delete(&format!("/categories/{}", category))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(app.catalog.category_count().await, 1);
}

#[tokio::test]
async fn detach_policy_deletes_used_category() {
    let app = test_app(Policies::default());
    let category = create_category(&app.router, "Electronics").await;
    send(
        &app.router,
        json_request(
            "POST",
            "/products",
            json!({ "name": "Widget", "quantity_available": 1, "category_id": [category] }),
        ),
    )
    .await;

    let (status, body) = send(&app.router, delete(&format!("/categories/{}", category))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted successfully");

    let (_, body) = send(&app.router, get("/products/with-categories")).await;
    assert!(category_ids(&body["data"][0]).is_empty());
}

#[tokio::test]
async fn batch_is_all_or_nothing() {
    let app = test_app(Policies::default());

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/products/batch",
            json!({ "inputs": [
                { "name": "Lamp", "quantity_available": 2 },
                { "quantity_available": "many" },
            ]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["inputs.1.name"].is_array());
    assert!(body["errors"]["inputs.1.quantity_available"].is_array());
    assert_eq!(app.catalog.product_count().await, 0);

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/products/batch",
            json!({ "inputs": [
                { "name": "Lamp", "quantity_available": 2 },
                { "name": "Desk", "quantity_available": 1, "price": 120 },
            ]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Products created successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(app.catalog.product_count().await, 2);
}

fn png(seed: u8) -> Vec<u8> {
    [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
        .into_iter()
        .chain(std::iter::repeat_n(seed, 512))
        .collect()
}

async fn image_status(router: &Router, filename: &str) -> StatusCode {
    let response = router
        .clone()
        .oneshot(get(&format!("/images/{}", filename)))
        .await
        .unwrap();
    response.status()
}

/// Create a product with one image, then replace it through the multipart update route.
async fn create_then_replace_image(router: &Router) -> (i64, String, String) {
    let first = png(1);
    let (status, body) = send(
        router,
        multipart_request(
            "POST",
            "/products",
            &[
                Part::Text("name", "Widget"),
                Part::Text("quantity_available", "5"),
                Part::File("image1", "first.png", "image/png", &first),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_i64().unwrap();
    let old_image = body["data"]["image1"].as_str().unwrap().to_string();

    let second = png(2);
    let (status, body) = send(
        router,
        multipart_request(
            "POST",
            &format!("/products/{}", id),
            &[Part::File("image1", "second.png", "image/png", &second)],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["name"], "Widget");
    let new_image = body["data"]["image1"].as_str().unwrap().to_string();
    assert_ne!(old_image, new_image);

    let response = router
        .clone()
        .oneshot(get(&format!("/images/{}", new_image)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.as_ref(), second.as_slice());

    (id, old_image, new_image)
}

#[tokio::test]
async fn remove_policy_discards_replaced_and_deleted_images() {
    let app = test_app(Policies {
        image_cleanup: ImageCleanupPolicy::Remove,
        ..Policies::default()
    });
    let (id, old_image, new_image) = create_then_replace_image(&app.router).await;
    assert_eq!(image_status(&app.router, &old_image).await, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, delete(&format!("/products/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["image1"], new_image.as_str());
    assert_eq!(image_status(&app.router, &new_image).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn keep_policy_leaves_images_in_place() {
    let app = test_app(Policies {
        image_cleanup: ImageCleanupPolicy::Keep,
        ..Policies::default()
    });
    let (id, old_image, new_image) = create_then_replace_image(&app.router).await;
    assert_eq!(image_status(&app.router, &old_image).await, StatusCode::OK);

    let (status, _) = send(&app.router, delete(&format!("/products/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(image_status(&app.router, &old_image).await, StatusCode::OK);
    assert_eq!(image_status(&app.router, &new_image).await, StatusCode::OK);
}

#[tokio::test]
async fn unsupported_method_answers_enveloped_405() {
    let app = test_app(Policies::default());
    let request = Request::builder()
        .method("PATCH")
        .uri("/products/1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "Method not allowed.");
}

#[tokio::test]
async fn null_category_entry_is_reported() {
    let app = test_app(Policies::default());
    let category = create_category(&app.router, "Electronics").await;
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/products",
            json!({ "name": "Widget", "quantity_available": 1, "category_id": [category, null] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["category_id.1"].is_array());
    assert_eq!(app.catalog.product_count().await, 0);
}
