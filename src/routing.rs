//! Application router configuration for the JSON API and the dashboard.

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{
    AppState, Error,
    dashboard::{
        create_transaction_form_handler, delete_transaction_form_handler, get_dashboard_page,
        get_edit_transaction_page, update_transaction_form_handler,
    },
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            patch(update_transaction_endpoint).delete(delete_transaction_endpoint),
        );

    let dashboard_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::DASHBOARD_TRANSACTIONS,
            post(create_transaction_form_handler),
        )
        .route(
            endpoints::DASHBOARD_EDIT_TRANSACTION,
            get(get_edit_transaction_page).post(update_transaction_form_handler),
        )
        .route(
            endpoints::DASHBOARD_DELETE_TRANSACTION,
            post(delete_transaction_form_handler),
        );

    api_routes
        .merge(dashboard_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::RouteNotFound
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        AppState, Transaction, TransactionStore,
        endpoints::{self, format_endpoint},
        routing::build_router,
    };

    fn get_test_server() -> TestServer {
        let store = TransactionStore::new(Some(":memory:")).expect("Could not create store");
        let state = AppState::new(store, "Etc/UTC").expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn create_groceries(server: &TestServer) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 50,
                "date": "2024-01-05",
                "description": "Groceries",
                "type": "expense",
                "category": "Groceries"
            }))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn create_then_list_contains_transaction_once() {
        let server = get_test_server();

        let created = create_groceries(&server).await;
        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        let listed = response.json::<Vec<Transaction>>();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created.amount, -50.0);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let server = get_test_server();
        create_groceries(&server).await;
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 100,
                "date": "2024-01-10",
                "description": "Salary",
                "type": "income"
            }))
            .await
            .assert_status_ok();

        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();

        let descriptions: Vec<&str> = listed.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Salary", "Groceries"]);
    }

    #[tokio::test]
    async fn patch_updates_supplied_fields() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let response = server
            .patch(&format_endpoint(endpoints::TRANSACTION, &created.id))
            .json(&json!({ "description": "Weekly shop" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, "Weekly shop");
        assert_eq!(updated.amount, created.amount);
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found_and_store_unchanged() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let response = server
            .patch(&format_endpoint(endpoints::TRANSACTION, "999"))
            .json(&json!({ "description": "Nope" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Transaction not found" }));
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn delete_acknowledges_and_removes() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, &created.id))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Transaction deleted" }));
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let server = get_test_server();

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, "999"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format_endpoint(endpoints::TRANSACTION, "not-a-number"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .text("{not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn zero_amount_is_bad_request() {
        let server = get_test_server();

        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 0,
                "date": "2024-01-05",
                "description": "Nothing",
                "type": "expense"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_is_html() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("Personal Finance Tracker");
    }

    #[tokio::test]
    async fn dashboard_form_creates_transaction() {
        let server = get_test_server();

        let response = server
            .post(endpoints::DASHBOARD_TRANSACTIONS)
            .form(&[
                ("amount", "12.50"),
                ("date", "2024-01-10"),
                ("description", "Lunch"),
                ("type", "expense"),
                ("category", ""),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, -12.5);
        assert_eq!(listed[0].category, None);
    }

    #[tokio::test]
    async fn dashboard_delete_button_removes_transaction() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let response = server
            .post(&format_endpoint(
                endpoints::DASHBOARD_DELETE_TRANSACTION,
                &created.id,
            ))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn patch_malformed_body_is_bad_request_and_store_unchanged() {
        let server = get_test_server();
        let created = create_groceries(&server).await;
        let url = format_endpoint(endpoints::TRANSACTION, &created.id);

        let response = server.patch(&url).json(&json!({ "amount": "abc" })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());

        let response = server
            .patch(&url)
            .text("{not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn patch_zero_amount_is_bad_request_and_store_unchanged() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let response = server
            .patch(&format_endpoint(endpoints::TRANSACTION, &created.id))
            .json(&json!({ "amount": 0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn dashboard_edit_form_updates_transaction() {
        let server = get_test_server();
        let created = create_groceries(&server).await;
        let url = format_endpoint(endpoints::DASHBOARD_EDIT_TRANSACTION, &created.id);

        server.get(&url).await.assert_status_ok();
        let response = server
            .post(&url)
            .form(&[
                ("amount", "75"),
                ("date", "2024-01-06"),
                ("description", "Big shop"),
                ("type", "expense"),
                ("category", "Groceries"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].amount, -75.0);
        assert_eq!(listed[0].description, "Big shop");
    }

    #[tokio::test]
    async fn dashboard_edit_unknown_transaction_is_not_found() {
        let server = get_test_server();
        let url = format_endpoint(endpoints::DASHBOARD_EDIT_TRANSACTION, "999");

        server.get(&url).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn category_names_are_not_run_as_script_on_dashboard() {
        let server = get_test_server();
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 10,
                "date": "2024-01-05",
                "description": "Sneaky",
                "type": "expense",
                "category": "</script><script>alert('hi')</script>"
            }))
            .await
            .assert_status_ok();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let page = response.text();
        assert!(!page.contains("<script>alert('hi')"));
        assert!(!page.contains("alert('hi')</script>"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/coffee").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Route not found" }));
    }

    #[tokio::test]
    async fn json_responses_have_json_content_type() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        assert_eq!(response.header("content-type"), "application/json");
    }
}
