//! Live searches against the OpenAIRE Graph API.
//!
//! These tests hit the public service and are ignored by default. An API key
//! is optional; to use one (or a different endpoint), create a `.env` file in
//! the openaire-lib directory with:
//!
//! ```env
//! OPENAIRE_API_KEY=your-api-key
//! OPENAIRE_BASE_URL=https://api.openaire.eu/graph/v1/
//! ```
//!
//! Then run: `cargo test -p openaire-lib -- --ignored`

use std::env;

use futures::StreamExt;
use openaire_lib::api::query::ProductType;
use openaire_lib::OpenAireClient;

fn live_client() -> OpenAireClient {
    let _ = dotenvy::dotenv();

    let mut builder = OpenAireClient::builder();
    if let Ok(api_key) = env::var("OPENAIRE_API_KEY") {
        builder = builder.api_key(api_key);
    }
    if let Ok(base_url) = env::var("OPENAIRE_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    builder.build().expect("Failed to build client")
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_execute_first_page() {
    let page = live_client()
        .research_products()
        .search("research software metadata")
        .unwrap()
        .product_type(ProductType::Publication)
        .unwrap()
        .page_size(5)
        .unwrap()
        .execute()
        .await
        .expect("Search failed");

    assert!(page.len() <= 5);
    assert!(page.total_found() >= page.len() as u64);
    println!("{} matches, first page has {}", page.total_found(), page.len());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_materialize_respects_cap() {
    let records = live_client()
        .projects()
        .funding_short_name("EC")
        .unwrap()
        .sort_by_start_date(false)
        .unwrap()
        .page_size(10)
        .unwrap()
        .materialize_all(Some(25))
        .await
        .expect("Search failed");

    assert_eq!(records.len(), 25);
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_stream_pages() {
    let stream = live_client()
        .organizations()
        .country_code("NL")
        .unwrap()
        .page_size(20)
        .unwrap()
        .iterate_pages()
        .into_stream();

    let pages: Vec<_> = stream.take(2).collect().await;
    assert_eq!(pages.len(), 2);
    for page in pages {
        assert_eq!(page.expect("Page fetch failed").len(), 20);
    }
}
