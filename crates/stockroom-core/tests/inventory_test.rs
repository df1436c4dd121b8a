#![allow(clippy::unwrap_used)]
// Integration tests for the inventory controller using wiremock.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockroom_core::{
    ClientConfig, CoreError, Credentials, EmptyState, EquipmentDraft, EquipmentId, EquipmentPatch,
    EquipmentType, FilterUpdate, MemorySessionStore, ModalMode, NoticeLevel, PersistedSession,
    SessionPhase, SortDirection, SortKey, Stockroom, User,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn equipment_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "code": format!("CODE-{id}"),
        "quantity": 4,
        "type": "TOOL",
        "location": "Bay 2",
        "department": "Avionica",
        "isOperational": true,
        "lastUpdate": "2026-10-01T10:00:00.000Z",
        "createdAt": "2026-09-01T10:00:00.000Z",
        "updatedAt": "2026-10-01T10:00:00.000Z"
    })
}

fn many(n: usize) -> serde_json::Value {
    let items: Vec<_> = (1..=n)
        .map(|i| equipment_json(&format!("e{i:02}"), &format!("Item {i:02}")))
        .collect();
    json!(items)
}

fn draft() -> EquipmentDraft {
    EquipmentDraft {
        name: "Drill".into(),
        code: "T-01".into(),
        quantity: 2.0,
        equipment_type: EquipmentType::Tool,
        location: "Bay 2".into(),
        department: "Avionica".into(),
        is_operational: true,
        notes: None,
        validity: NaiveDate::from_ymd_opt(2027, 3, 1),
    }
}

fn setup_with_debounce(
    server: &MockServer,
    debounce: Duration,
) -> (Stockroom, Arc<MemorySessionStore>) {
    let mut config = ClientConfig::new(server.uri().parse().unwrap());
    config.search_debounce = debounce;
    let store = Arc::new(MemorySessionStore::new());
    let shared: Arc<MemorySessionStore> = Arc::clone(&store);
    let app = Stockroom::new(config, shared).unwrap();
    (app, store)
}

fn setup(server: &MockServer) -> (Stockroom, Arc<MemorySessionStore>) {
    setup_with_debounce(server, Duration::from_millis(300))
}

async fn mount_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/equipment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn sign_in(server: &MockServer, app: &Stockroom) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "u1", "name": "Ana", "email": "ana@example.com" },
            "token": "tok"
        })))
        .mount(server)
        .await;
    app.session()
        .login(&Credentials::new("ana", "pw"))
        .await
        .unwrap();
}

async fn equipment_queries(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/equipment" && r.method.as_str() == "GET")
        .map(|r| r.url.query().map(str::to_owned))
        .collect()
}

// ── Fetching and filters ────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_replaces_collection() {
    let server = MockServer::start().await;
    mount_list(&server, many(3)).await;
    let (app, _) = setup(&server);

    app.inventory().fetch_items().await.unwrap();

    let state = app.inventory().state();
    assert_eq!(state.items.len(), 3);
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.items[0].equipment_type, EquipmentType::Tool);
}

#[tokio::test]
async fn test_filter_change_resets_page_and_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipment"))
        .and(query_param("types", "EPI,TOOL"))
        .and(query_param("department", "Avionica"))
        .and(query_param("isOperational", "false"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(many(1)))
        .expect(1)
        .mount(&server)
        .await;
    let (app, _) = setup(&server);

    app.inventory().set_page(3);
    app.inventory()
        .set_filters(FilterUpdate {
            types: [EquipmentType::Tool, EquipmentType::Epi].into(),
            department: Some("Avionica".into()),
            is_operational: Some(false),
            search: None,
        })
        .await
        .unwrap();

    let state = app.inventory().state();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.filters.active_count(), 4);
}

#[tokio::test]
async fn test_unchanged_filters_send_identical_queries() {
    let server = MockServer::start().await;
    mount_list(&server, many(2)).await;
    let (app, _) = setup(&server);

    app.inventory().set_search("drill").await.unwrap();
    app.inventory().fetch_items().await.unwrap();

    let queries = equipment_queries(&server).await;
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0], queries[1]);
    assert_eq!(queries[0].as_deref(), Some("search=drill"));
}

#[tokio::test]
async fn test_set_search_keeps_other_filters() {
    let server = MockServer::start().await;
    mount_list(&server, many(1)).await;
    let (app, _) = setup(&server);

    app.inventory()
        .set_filters(FilterUpdate {
            department: Some("Payload".into()),
            ..FilterUpdate::default()
        })
        .await
        .unwrap();
    app.inventory().set_search("helmet").await.unwrap();

    let filters = app.inventory().state().filters;
    assert_eq!(filters.department.as_deref(), Some("Payload"));
    assert_eq!(filters.search, "helmet");
}

#[tokio::test]
async fn test_clear_filters_drops_everything() {
    let server = MockServer::start().await;
    mount_list(&server, many(1)).await;
    let (app, _) = setup(&server);

    app.inventory()
        .set_filters(FilterUpdate {
            types: [EquipmentType::Epc].into(),
            is_operational: Some(true),
            search: Some("rope".into()),
            ..FilterUpdate::default()
        })
        .await
        .unwrap();
    app.inventory().set_page(2);
    app.inventory().clear_filters().await.unwrap();

    let state = app.inventory().state();
    assert!(!state.filters.is_active());
    assert_eq!(state.current_page, 1);
    assert_eq!(equipment_queries(&server).await.last().unwrap(), &None);
}

#[tokio::test]
async fn test_debounced_search_sends_only_last_text() {
    let server = MockServer::start().await;
    mount_list(&server, many(1)).await;
    let (app, _) = setup_with_debounce(&server, Duration::from_millis(150));

    for text in ["d", "dr", "dri", "drill"] {
        app.inventory().schedule_search(text);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(app.inventory().is_search_pending());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let queries = equipment_queries(&server).await;
    assert_eq!(queries, vec![Some("search=drill".to_owned())]);
    assert_eq!(app.inventory().state().filters.search, "drill");
}

#[tokio::test]
async fn test_dropping_app_abandons_pending_search() {
    let server = MockServer::start().await;
    mount_list(&server, many(1)).await;
    let (app, _) = setup_with_debounce(&server, Duration::from_millis(150));

    app.inventory().schedule_search("drill");
    assert!(app.inventory().is_search_pending());
    drop(app);

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(equipment_queries(&server).await.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(many(2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/equipment"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database down" })),
        )
        .mount(&server)
        .await;
    let (app, _) = setup(&server);

    app.inventory().fetch_items().await.unwrap();
    let err = app.inventory().fetch_items().await.unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    let state = app.inventory().state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.error.as_deref(), Some("database down"));
    assert!(!state.loading);

    app.inventory().clear_error();
    assert!(app.inventory().state().error.is_none());
}

#[tokio::test]
async fn test_unauthorized_fetch_forces_logout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipment"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let (app, store) = setup(&server);
    sign_in(&server, &app).await;
    assert_eq!(
        store.snapshot(),
        Some(PersistedSession {
            token: Some("tok".into()),
            user: Some(User {
                id: "u1".into(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
            }),
            is_authenticated: true,
        })
    );

    let err = app.inventory().fetch_items().await.unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(app.session().phase(), SessionPhase::Unauthenticated);
    assert!(store.snapshot().is_none());
    assert!(!app.session().client().has_token());
}

#[tokio::test]
async fn test_unauthorized_delete_forces_logout() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/equipment/e1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let (app, store) = setup(&server);
    sign_in(&server, &app).await;
    let mut notices = app.inventory().notices();

    let err = app
        .inventory()
        .delete_item(&EquipmentId::from("e1"))
        .await
        .unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(app.session().phase(), SessionPhase::Unauthenticated);
    assert!(store.snapshot().is_none());
    assert!(!app.session().client().has_token());
    assert!(app.inventory().state().error.is_some());
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Error);
    // No refetch after a rejected write.
    assert!(equipment_queries(&server).await.is_empty());
}

#[tokio::test]
async fn test_unauthorized_get_item_forces_logout_and_keeps_collection() {
    let server = MockServer::start().await;
    mount_list(&server, many(2)).await;
    Mock::given(method("GET"))
        .and(path("/equipment/e7"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let (app, store) = setup(&server);
    sign_in(&server, &app).await;
    app.inventory().fetch_items().await.unwrap();

    let err = app
        .inventory()
        .get_item(&EquipmentId::from("e7"))
        .await
        .unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(app.session().phase(), SessionPhase::Unauthenticated);
    assert!(store.snapshot().is_none());
    let state = app.inventory().state();
    assert_eq!(state.items.len(), 2);
    assert!(state.error.is_none());
}

// ── View ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_thirteen_items_paginate() {
    let server = MockServer::start().await;
    mount_list(&server, many(13)).await;
    let (app, _) = setup(&server);
    app.inventory().fetch_items().await.unwrap();

    let mut sizes = Vec::new();
    for page in 1..=4 {
        app.inventory().set_page(page);
        sizes.push(app.inventory().view().page_items.len());
    }
    assert_eq!(sizes, vec![6, 6, 1, 0]);
    assert_eq!(app.inventory().view().empty_state, EmptyState::FilteredEmpty);
}

#[tokio::test]
async fn test_empty_results_are_no_data() {
    let server = MockServer::start().await;
    mount_list(&server, json!([])).await;
    let (app, _) = setup(&server);

    app.inventory().fetch_items().await.unwrap();
    assert_eq!(app.inventory().view().empty_state, EmptyState::NoData);

    app.inventory().set_search("nothing matches").await.unwrap();
    assert_eq!(app.inventory().view().empty_state, EmptyState::NoData);
}

#[tokio::test]
async fn test_sort_does_not_reset_page_or_fetch() {
    let server = MockServer::start().await;
    mount_list(&server, many(13)).await;
    let (app, _) = setup(&server);
    app.inventory().fetch_items().await.unwrap();

    app.inventory().set_page(2);
    app.inventory()
        .set_sort_config(SortKey::Name, SortDirection::Desc);

    let view = app.inventory().view();
    assert_eq!(view.current_page, 2);
    assert_eq!(view.page_items[0].name, "Item 07");
    assert_eq!(equipment_queries(&server).await.len(), 1);
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_refetches_and_closes_modal() {
    let server = MockServer::start().await;
    let created = json!({
        "id": "e9",
        "name": "Drill",
        "code": "T-01",
        "quantity": 2,
        "type": "TOOL",
        "location": "Bay 2",
        "department": "Avionica",
        "isOperational": true,
        "validity": "2027-03-01T00:00:00.000Z",
        "lastUpdate": "2026-10-18T10:00:00.000Z",
        "createdAt": "2026-10-18T10:00:00.000Z",
        "updatedAt": "2026-10-18T10:00:00.000Z"
    });
    Mock::given(method("POST"))
        .and(path("/equipment"))
        .and(body_json(json!({
            "name": "Drill",
            "code": "T-01",
            "quantity": 2.0,
            "type": "TOOL",
            "location": "Bay 2",
            "department": "Avionica",
            "isOperational": true,
            "validity": "2027-03-01T00:00:00.000Z"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created.clone()))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([created])).await;
    let (app, _) = setup(&server);
    let mut notices = app.inventory().notices();

    app.inventory().open_create_modal();
    let item = app.inventory().create_item(&draft()).await.unwrap();

    assert_eq!(item.id, EquipmentId::from("e9"));
    assert_eq!(EquipmentDraft::from_equipment(&item), draft());
    assert!(item.created_at.is_some());

    let state = app.inventory().state();
    assert!(!state.is_modal_open);
    assert!(!state.loading);
    assert_eq!(state.items.len(), 1);
    assert_eq!(EquipmentDraft::from_equipment(&state.items[0]), draft());
    assert_eq!(equipment_queries(&server).await.len(), 1);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_invalid_draft_is_rejected_without_request() {
    let server = MockServer::start().await;
    let (app, _) = setup(&server);

    app.inventory().open_create_modal();
    let bad = EquipmentDraft {
        name: " ".into(),
        quantity: -1.0,
        ..draft()
    };
    let err = app.inventory().create_item(&bad).await.unwrap_err();

    let errors = err.field_errors().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.get("name").is_some());
    assert!(errors.get("quantity").is_some());

    let state = app.inventory().state();
    assert_eq!(state.field_errors.len(), 2);
    assert!(state.is_modal_open);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_create_keeps_modal_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/equipment"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Code already in use" })),
        )
        .mount(&server)
        .await;
    let (app, _) = setup(&server);
    let mut notices = app.inventory().notices();

    app.inventory().open_create_modal();
    let err = app.inventory().create_item(&draft()).await.unwrap_err();

    assert_eq!(err.to_string(), "Code already in use");
    let state = app.inventory().state();
    assert!(state.is_modal_open);
    assert_eq!(state.modal_mode, ModalMode::Create);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Code already in use"));
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Error);
    assert!(equipment_queries(&server).await.is_empty());
}

#[tokio::test]
async fn test_update_sends_only_patch_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/equipment/e1"))
        .and(body_json(json!({ "quantity": 0.0, "isOperational": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(equipment_json("e1", "Drill")))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, many(1)).await;
    let (app, _) = setup(&server);

    let patch = EquipmentPatch {
        quantity: Some(0.0),
        is_operational: Some(false),
        ..EquipmentPatch::default()
    };
    app.inventory()
        .update_item(&EquipmentId::from("e1"), &patch)
        .await
        .unwrap();

    assert_eq!(equipment_queries(&server).await.len(), 1);
}

#[tokio::test]
async fn test_delete_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/equipment/e1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([])).await;
    let (app, _) = setup(&server);
    let mut notices = app.inventory().notices();

    app.inventory()
        .delete_item(&EquipmentId::from("e1"))
        .await
        .unwrap();

    assert_eq!(equipment_queries(&server).await.len(), 1);
    assert_eq!(app.inventory().view().empty_state, EmptyState::NoData);
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_get_item_leaves_collection_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipment/e7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(equipment_json("e7", "Harness")))
        .mount(&server)
        .await;
    let (app, _) = setup(&server);

    let item = app
        .inventory()
        .get_item(&EquipmentId::from("e7"))
        .await
        .unwrap();

    assert_eq!(item.name, "Harness");
    assert!(app.inventory().state().items.is_empty());
}

// ── Modal state ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_modal_transitions() {
    let server = MockServer::start().await;
    mount_list(&server, many(1)).await;
    let (app, _) = setup(&server);
    app.inventory().fetch_items().await.unwrap();
    let item = app.inventory().state().items[0].clone();

    app.inventory().open_view_modal(item.clone());
    let state = app.inventory().state();
    assert!(state.is_modal_open);
    assert_eq!(state.modal_mode, ModalMode::View);
    assert_eq!(state.selected_item.as_ref(), Some(&item));

    app.inventory().open_edit_modal(item.clone());
    assert_eq!(app.inventory().state().modal_mode, ModalMode::Edit);

    app.inventory().close_modal();
    let state = app.inventory().state();
    assert!(!state.is_modal_open);
    assert_eq!(state.modal_mode, ModalMode::Edit);
    assert_eq!(state.selected_item, Some(item));

    app.inventory().open_create_modal();
    assert!(app.inventory().state().selected_item.is_none());

    app.inventory().select_item(None);
    assert!(app.inventory().state().selected_item.is_none());
}
