use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use configs::AppConfig;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::startup;

struct TestApp {
    base_url: String,
    data_dir: std::path::PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn serve(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}

async fn start_recipe_stub() -> anyhow::Result<String> {
    let app = Router::new().route(
        "/api/search",
        get(|| async {
            Json(json!({"recipes": [
                {"title": "Pizza Dough Deluxe", "image_url": "http://img/p.jpg"}
            ]}))
        }),
    );
    serve(app).await
}

async fn start_server_with(data_dir: std::path::PathBuf, quota_bytes: usize) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = data_dir.to_string_lossy().to_string();
    cfg.storage.quota_bytes = quota_bytes;
    cfg.ui.frontend_dir = data_dir.join("frontend").to_string_lossy().to_string();
    cfg.recipes.base_url = start_recipe_stub().await?;
    cfg.normalize_and_validate()?;

    let state = startup::build_state(&cfg).await?;
    let base_url = serve(startup::build_app(state)).await?;
    Ok(TestApp { base_url, data_dir })
}

async fn start_server() -> anyhow::Result<TestApp> {
    let data_dir = std::env::temp_dir().join(format!("shopfront-e2e-{}", Uuid::new_v4()));
    start_server_with(data_dir, 5 * 1024 * 1024).await
}

fn product_form(name: &str, price: &str, category: &str, file_name: &str) -> anyhow::Result<Form> {
    let image = Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name(file_name.to_string())
        .mime_str("image/png")?;
    Ok(Form::new()
        .text("name", name.to_string())
        .text("price", price.to_string())
        .text("category", category.to_string())
        .text("description", "A tasty classic with cheese")
        .part("image", image))
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");

    let ui = reqwest::get(format!("{}/api/ui", app.base_url)).await?.json::<Value>().await?;
    assert_eq!(ui["search_debounce_ms"], 300);
    assert_eq!(ui["notice_ttl_ms"], 3000);
    Ok(())
}

#[tokio::test]
async fn e2e_add_search_edit_delete() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    // empty catalog
    let body = c.get(format!("{}/api/products", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["empty_message"], "No products found");

    // add
    let res = c.post(format!("{}/api/products", app.base_url))
        .multipart(product_form("Burger", "9.99", "Fast Food", "burger.png")?)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["action"], "added");
    assert_eq!(body["notice"]["level"], "success");
    assert_eq!(body["notice"]["ttl_ms"], 3000);
    let card = &body["data"]["catalog"]["cards"][0];
    assert_eq!(card["price_label"], "$9.99");
    assert_eq!(card["description"], "A tasty classic ...");
    assert!(card["image"].as_str().unwrap_or_default().starts_with("data:image/png;base64,"));

    // search
    let body = c.get(format!("{}/api/products?q=FOOD", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["cards"].as_array().map(Vec::len), Some(1));
    let body = c.get(format!("{}/api/products?q=sushi", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["empty_message"], "No products found for \"sushi\"");

    // edit then submit replaces in place
    let body = c.post(format!("{}/api/products/0/edit", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "Burger");
    assert_eq!(body["data"]["submit_label"], "Update Product");
    assert_eq!(body["notice"]["level"], "info");

    let body = c.post(format!("{}/api/products", app.base_url))
        .multipart(product_form("Cheeseburger", "10", "Fast Food", "cheese.JPG")?)
        .send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["action"], "updated");
    assert_eq!(body["data"]["index"], 0);
    assert_eq!(body["data"]["catalog"]["cards"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["catalog"]["cards"][0]["name"], "Cheeseburger");

    // persisted slot holds the literal array
    let raw = tokio::fs::read_to_string(app.data_dir.join("products.json")).await?;
    let stored: Value = serde_json::from_str(&raw)?;
    assert_eq!(stored[0]["fileName"], "cheese.JPG");

    // delete, then the same index is gone
    let res = c.delete(format!("{}/api/products/0", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["deleted"]["name"], "Cheeseburger");
    let res = c.delete(format!("{}/api/products/0", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_validation_errors_are_aggregated() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/api/products", app.base_url))
        .multipart(product_form("ab", "abc", "Fast Food", "menu.pdf")?)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .map(|a| a.iter().filter_map(|f| f["field"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(fields, vec!["name", "price", "image"]);
    assert_eq!(body["notice"]["level"], "warning");

    // nothing was stored
    assert!(tokio::fs::metadata(app.data_dir.join("products.json")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn e2e_quota_failure_is_a_danger_notice() -> anyhow::Result<()> {
    let data_dir = std::env::temp_dir().join(format!("shopfront-e2e-{}", Uuid::new_v4()));
    let app = start_server_with(data_dir.clone(), 32).await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/api/products", app.base_url))
        .multipart(product_form("Burger", "9.99", "Fast Food", "burger.png")?)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["notice"]["level"], "danger");
    assert_eq!(body["notice"]["text"], "Error saving products. Storage may be full.");
    // still visible in memory
    assert_eq!(body["data"]["catalog"]["cards"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn e2e_recipes_short_query_uses_default() -> anyhow::Result<()> {
    let app = start_server().await?;
    let body = reqwest::get(format!("{}/api/recipes?q=p", app.base_url)).await?.json::<Value>().await?;
    assert_eq!(body["data"]["query"], "pizza");
    assert_eq!(body["data"]["cards"][0]["title"], "Pizza Dough");
    assert!(body.get("notice").is_none());
    Ok(())
}

#[tokio::test]
async fn e2e_live_search_runs_only_the_settled_query() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    for (name, category) in [("Burger", "Fast Food"), ("Sushi Roll", "Japanese")] {
        c.post(format!("{}/api/products", app.base_url))
            .multipart(product_form(name, "5", category, "p.png")?)
            .send().await?;
    }

    for q in ["s", "su", "sushi"] {
        let res = c.post(format!("{}/api/products/live", app.base_url))
            .json(&json!({ "q": q }))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::ACCEPTED);
    }

    let mut body = Value::Null;
    for _ in 0..40 {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        body = c.get(format!("{}/api/products/live", app.base_url)).send().await?.json::<Value>().await?;
        if body["data"]["runs"].as_u64().unwrap_or(0) > 0 { break; }
    }
    assert_eq!(body["data"]["runs"], 1);
    assert_eq!(body["data"]["query"], "sushi");
    assert_eq!(body["data"]["view"]["cards"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["view"]["cards"][0]["index"], 1);
    Ok(())
}
