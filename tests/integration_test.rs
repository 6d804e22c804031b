use page_scraper::accounts::register_actor;
use page_scraper::admin;
use page_scraper::fetcher::FetchConfig;
use page_scraper::ingest::{Ingestor, Outcome};
use page_scraper::store::{PageScope, Store};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_scrape_example_page() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<title>Example Title</title><a href="https://www.example.com">Example</a>"#,
        ))
        .mount(&server)
        .await;

    let store = Store::in_memory(PageScope::Global).await?;
    let actor = register_actor(&store, "alice", false).await?;
    let ingestor = Ingestor::new(store, FetchConfig::new());

    let outcome = ingestor.ingest(&server.uri(), &actor).await;
    let Outcome::Scraped { page_id, links } = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert_eq!(links, 1);

    let page = ingestor.store().page(page_id).await?;
    assert_eq!(page.name, "Example Title");
    assert_eq!(page.url, server.uri());
    assert_eq!(page.created_by, actor.id);

    let stored = ingestor.store().links(page_id).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Example");
    assert_eq!(stored[0].url, "https://www.example.com");
    Ok(())
}

#[tokio::test]
async fn test_scrape_list_show_delete_on_disk() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = std::env::temp_dir().join(format!("page_scraper_{}.db", std::process::id()));
    let _ = std::fs::remove_file(&db_path);
    let database_url = format!("sqlite://{}", db_path.display());

    let server = MockServer::start().await;
    let mut body = String::from("<title>Many</title>");
    for i in 0..12 {
        body += &format!(r#"<a href="/item/{i}">Item {i}</a>"#);
    }
    Mock::given(method("GET"))
        .and(path("/many"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    let url = format!("{}/many", server.uri());

    let page_id = {
        let store = Store::connect(&database_url, PageScope::Global).await?;
        let alice = register_actor(&store, "alice", false).await?;
        register_actor(&store, "root", true).await?;
        let ingestor = Ingestor::new(store, FetchConfig::new());
        match ingestor.ingest(&url, &alice).await {
            Outcome::Scraped { page_id, links: 12 } => page_id,
            other => panic!("unexpected outcome {other:?}"),
        }
    };

    // a fresh connection sees what the first one wrote
    let store = Store::connect(&database_url, PageScope::Global).await?;
    let alice = store.find_actor("alice").await?.ok_or("alice missing")?;
    let root = store.find_actor("root").await?.ok_or("root missing")?;

    let ingestor = Ingestor::new(store.clone(), FetchConfig::new());
    assert_eq!(ingestor.ingest(&url, &alice).await, Outcome::AlreadyExists { page_id });

    let listed = admin::list_pages(&store, &alice).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].total_links, 12);

    let second_slice = admin::show_page(&store, &alice, page_id, 2).await?;
    assert_eq!(second_slice.links.num_pages, 2);
    assert_eq!(second_slice.links.links.len(), 2);
    assert_eq!(second_slice.links.links[0].name, "Item 10");
    assert_eq!(second_slice.links.links[0].url, format!("{}/item/10", server.uri()));

    admin::delete_page(&store, &root, page_id).await?;
    assert!(admin::list_pages(&store, &root).await?.is_empty());
    assert_eq!(store.total_links(page_id).await?, 0);

    store.pool().close().await;
    let _ = std::fs::remove_file(&db_path);
    server.verify().await;
    Ok(())
}
