//! Backend client and market service against an in-process stub backend.

#![allow(clippy::panic)]

mod common;

use flowstate_market::api::MarketApiClient;
use flowstate_market::domain::{
    Attachment, ListingEdit, ListingForm, MarketEvent, NotificationBus, WalletAddress,
    WalletSession, WorkflowId,
};
use flowstate_market::error::MarketError;
use flowstate_market::service::MarketService;
use flowstate_market::view::ListingAction;

use common::{BUYER, SELLER, spawn_backend};

fn client(base_url: &str) -> MarketApiClient {
    let Ok(client) = MarketApiClient::new(base_url, None) else {
        panic!("valid base url");
    };
    client
}

fn address(raw: &str) -> WalletAddress {
    let Ok(address) = raw.parse::<WalletAddress>() else {
        panic!("valid address");
    };
    address
}

fn buyer_session() -> WalletSession {
    WalletSession::connected(address(BUYER))
}

#[tokio::test]
async fn lists_all_and_top_workflows() {
    let backend = spawn_backend().await;
    let api = client(&backend.base_url);

    let Ok(all) = api.list_workflows().await else {
        panic!("getAll failed");
    };
    let names: Vec<&str> = all.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Data Workflow", "Report Tool", "Micro Flow"]);
    assert!(all.iter().any(|w| w.price.as_str() == "2.5"));
    assert!(all.iter().any(|w| w.price.as_str() == "0.0000001"));

    let Ok(top) = api.top_workflows().await else {
        panic!("getTopWorkflows failed");
    };
    assert_eq!(top.len(), 1);
}

#[tokio::test]
async fn unknown_workflow_is_backend_error() {
    let backend = spawn_backend().await;
    let api = client(&backend.base_url);
    let result = api.get_workflow(&WorkflowId::from("nope")).await;
    assert!(matches!(result, Err(MarketError::Backend { status: 404, .. })));
}

#[tokio::test]
async fn has_purchased_reads_flag() {
    let backend = spawn_backend().await;
    let api = client(&backend.base_url);
    let buyer = address(BUYER);

    let Ok(owned) = api.has_purchased(buyer, &WorkflowId::from("w1")).await else {
        panic!("hasPurchasedWorkflow failed");
    };
    let Ok(not_owned) = api.has_purchased(buyer, &WorkflowId::from("w2")).await else {
        panic!("hasPurchasedWorkflow failed");
    };
    assert!(owned);
    assert!(!not_owned);
}

#[tokio::test]
async fn dashboard_endpoints_decode() {
    let backend = spawn_backend().await;
    let api = client(&backend.base_url);
    let seller = address(SELLER);

    let Ok(stats) = api.revenue_stats(seller).await else {
        panic!("getStats failed");
    };
    assert!((stats.lifetime_revenue - 120.5).abs() < f64::EPSILON);
    assert!((stats.weekly_revenue - 40.0).abs() < f64::EPSILON);
    assert!((stats.daily_revenue - 5.0).abs() < f64::EPSILON);

    let Ok(purchases) = api.purchased_workflows(address(BUYER)).await else {
        panic!("getPurchasedWorkflows failed");
    };
    let Some(first) = purchases.first() else {
        panic!("expected one purchase");
    };
    assert_eq!(first.workflow_id, Some(WorkflowId::from("w1")));
    assert_eq!(first.buyer, Some(address(BUYER)));

    let Ok(history) = api.previous_generations(address(BUYER)).await else {
        panic!("getPrevious failed");
    };
    assert_eq!(history.first().map(|g| g.prompt.as_str()), Some("summarise my inbox"));
}

#[tokio::test]
async fn download_names_file_after_url() {
    let backend = spawn_backend().await;
    let api = client(&backend.base_url);

    let Ok(file) = api.download_workflow(&WorkflowId::from("w1")).await else {
        panic!("download failed");
    };
    assert_eq!(file.file_name, "data-flow.json");
    assert_eq!(file.bytes, br#"{"nodes":[{"id":"n1"}]}"#.to_vec());

    let missing = api.download_workflow(&WorkflowId::from("w2")).await;
    assert!(matches!(missing, Err(MarketError::MissingFile(id)) if id.as_str() == "w2"));
}

#[tokio::test]
async fn create_listing_sends_multipart_fields() {
    let backend = spawn_backend().await;
    let service = MarketService::new(client(&backend.base_url), NotificationBus::new(8), 10, 5);
    let mut rx = service.bus().subscribe();

    let form = ListingForm {
        name: "Data Workflow".into(),
        description: "Cleans CSV files".into(),
        price: "5".into(),
        image: Some(Attachment::new("cover.png", vec![0x89, 0x50, 0x4e, 0x47])),
        workflow_file: Attachment::new("flow.json", br#"{"nodes":[]}"#.to_vec()),
    };
    let Ok(()) = service.create_listing(&buyer_session(), form).await else {
        panic!("create listing failed");
    };

    let uploads = backend.recorded.uploads();
    let Some(fields) = uploads.first() else {
        panic!("no upload recorded");
    };
    assert_eq!(fields.get("name").map(String::as_str), Some("Data Workflow"));
    assert_eq!(fields.get("desc").map(String::as_str), Some("Cleans CSV files"));
    assert_eq!(fields.get("price").map(String::as_str), Some("5"));
    assert_eq!(
        fields.get("seller").map(String::as_str),
        Some(address(BUYER).to_string().as_str())
    );
    assert_eq!(
        fields.get("workflowJson").map(String::as_str),
        Some("flow.json;application/json;12")
    );
    assert_eq!(
        fields.get("image").map(String::as_str),
        Some("cover.png;image/png;4")
    );
    assert!(!fields.contains_key("id"));

    let Ok(MarketEvent::ListingCreated { name, .. }) = rx.try_recv() else {
        panic!("expected listing created event");
    };
    assert_eq!(name, "Data Workflow");
}

#[tokio::test]
async fn invalid_listing_never_reaches_backend() {
    let backend = spawn_backend().await;
    let service = MarketService::new(client(&backend.base_url), NotificationBus::new(8), 10, 5);
    let mut rx = service.bus().subscribe();

    let form = ListingForm {
        name: "Data Workflow".into(),
        description: "Cleans CSV files".into(),
        price: "0".into(),
        image: None,
        workflow_file: Attachment::new("flow.json", b"not json".to_vec()),
    };
    let result = service.create_listing(&buyer_session(), form).await;
    assert!(matches!(result, Err(MarketError::InvalidForm(_))));
    assert!(backend.recorded.uploads().is_empty());

    let Ok(MarketEvent::OperationFailed { notification, .. }) = rx.try_recv() else {
        panic!("expected failure event");
    };
    assert_eq!(notification.title, "Upload Failed");
}

#[tokio::test]
async fn edit_listing_sends_id_without_files() {
    let backend = spawn_backend().await;
    let api = client(&backend.base_url);
    let Ok(existing) = api.get_workflow(&WorkflowId::from("w1")).await else {
        panic!("getIndividual failed");
    };
    let service = MarketService::new(api, NotificationBus::new(8), 10, 5);

    let mut edit = ListingEdit::from_existing(&existing);
    edit.price = "7".into();
    let Ok(()) = service.edit_listing(&buyer_session(), edit).await else {
        panic!("edit failed");
    };

    let uploads = backend.recorded.uploads();
    let Some(fields) = uploads.first() else {
        panic!("no edit recorded");
    };
    assert_eq!(fields.get("id").map(String::as_str), Some("w1"));
    assert_eq!(fields.get("price").map(String::as_str), Some("7"));
    assert_eq!(fields.get("name").map(String::as_str), Some("Data Workflow"));
    assert!(!fields.contains_key("workflowJson"));
    assert!(!fields.contains_key("image"));
}

#[tokio::test]
async fn marketplace_marks_owned_rows_for_download() {
    let backend = spawn_backend().await;
    let service = MarketService::new(client(&backend.base_url), NotificationBus::new(8), 10, 5);

    let Ok(view) = service.marketplace(&buyer_session()).await else {
        panic!("marketplace failed");
    };
    let page = view.listing_page();
    let actions: Vec<(&str, ListingAction)> = page
        .rows
        .iter()
        .map(|r| (r.workflow.id.as_str(), r.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("w1", ListingAction::Download),
            ("w2", ListingAction::Purchase),
            ("w4", ListingAction::Purchase),
        ]
    );

    let Ok(anonymous) = service.marketplace(&WalletSession::disconnected()).await else {
        panic!("marketplace failed");
    };
    assert!(
        anonymous
            .listing_page()
            .rows
            .iter()
            .all(|r| r.action == ListingAction::Purchase)
    );
}

#[tokio::test]
async fn dashboard_requires_wallet() {
    let backend = spawn_backend().await;
    let service = MarketService::new(client(&backend.base_url), NotificationBus::new(8), 10, 5);
    let result = service.dashboard(&WalletSession::disconnected()).await;
    assert!(matches!(result, Err(MarketError::WalletNotConnected)));

    let Ok(view) = service.dashboard(&buyer_session()).await else {
        panic!("dashboard failed");
    };
    assert_eq!(view.listed().total_items, 2);
    assert_eq!(view.purchases().total_items, 1);
}

#[tokio::test]
async fn download_saves_into_directory() {
    let backend = spawn_backend().await;
    let service = MarketService::new(client(&backend.base_url), NotificationBus::new(8), 10, 5);
    let mut rx = service.bus().subscribe();
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };

    let Ok(path) = service.download(&WorkflowId::from("w1"), dir.path()).await else {
        panic!("download failed");
    };
    assert_eq!(path, dir.path().join("data-flow.json"));
    assert!(path.exists());

    let Ok(MarketEvent::DownloadStarted { file_name, .. }) = rx.try_recv() else {
        panic!("expected download event");
    };
    assert_eq!(file_name, "data-flow.json");
}

#[tokio::test]
async fn generated_workflow_downloads_by_id() {
    let backend = spawn_backend().await;
    let service = MarketService::new(client(&backend.base_url), NotificationBus::new(8), 10, 5);
    let mut rx = service.bus().subscribe();
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };

    let Ok(path) = service
        .download_generated(&buyer_session(), "g1", dir.path())
        .await
    else {
        panic!("generated download failed");
    };
    assert_eq!(path, dir.path().join("data-flow.json"));
    let Ok(contents) = tokio::fs::read_to_string(&path).await else {
        panic!("read back failed");
    };
    assert!(contents.contains("n1"));
    let Ok(MarketEvent::DownloadStarted { file_name, .. }) = rx.try_recv() else {
        panic!("expected download event");
    };
    assert_eq!(file_name, "data-flow.json");

    let missing = service
        .download_generated(&buyer_session(), "g9", dir.path())
        .await;
    assert!(matches!(missing, Err(MarketError::MissingFile(_))));
    let Ok(MarketEvent::OperationFailed { .. }) = rx.try_recv() else {
        panic!("expected failure event");
    };

    let anonymous = service
        .download_generated(&WalletSession::disconnected(), "g1", dir.path())
        .await;
    assert!(matches!(anonymous, Err(MarketError::WalletNotConnected)));
}
