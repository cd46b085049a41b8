//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    recurring::{
        create_recurring_endpoint, delete_recurring_endpoint, get_edit_recurring_page,
        get_new_recurring_page, get_recurring_page, toggle_recurring_endpoint,
        update_recurring_endpoint,
    },
    reports::get_reports_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_create_transaction_page,
        get_edit_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::RECURRING_VIEW, get(get_recurring_page))
        .route(endpoints::NEW_RECURRING_VIEW, get(get_new_recurring_page))
        .route(endpoints::EDIT_RECURRING_VIEW, get(get_edit_recurring_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(update_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
            .route(
                endpoints::CATEGORY,
                put(update_category_endpoint).delete(delete_category_endpoint),
            )
            .route(endpoints::RECURRING_API, post(create_recurring_endpoint))
            .route(
                endpoints::RECURRING_TRANSACTION,
                put(update_recurring_endpoint).delete(delete_recurring_endpoint),
            )
            .route(
                endpoints::TOGGLE_RECURRING,
                put(toggle_recurring_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        auth::{COOKIE_TOKEN, PasswordHash, ValidatedPassword, create_user},
        db::initialize,
        endpoints,
        recurring::{DayOfMonth, Frequency, NewRecurringTransaction, create_recurring_transaction},
        transaction::TransactionType,
    };

    use super::build_router;

    const PASSWORD: &str = "paracetamol-shelf-kettle-42";

    fn get_test_server(connection: Connection) -> TestServer {
        let state = AppState::new(connection, "42", "Etc/UTC").unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn connection_with_user() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let password = ValidatedPassword::new_unchecked(PASSWORD);
        create_user(PasswordHash::new(password, 4).unwrap(), &connection).unwrap();
        connection
    }

    #[tokio::test]
    async fn protected_page_redirects_to_log_in() {
        let server = get_test_server(connection_with_user());

        let response = server.get(endpoints::REPORTS_VIEW).await;

        response.assert_status_see_other();
        let location = response.header("location");
        assert!(
            location
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW),
            "got {location:?}"
        );
    }

    #[tokio::test]
    async fn protected_api_uses_hx_redirect() {
        let server = get_test_server(connection_with_user());

        let response = server
            .post(endpoints::CATEGORIES_API)
            .form(&[("name", "Rent"), ("type", "expense")])
            .await;

        response.assert_status_ok();
        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn log_in_generates_recurring_transactions_and_opens_dashboard() {
        let connection = connection_with_user();
        create_recurring_transaction(
            NewRecurringTransaction::new(
                950.0,
                TransactionType::Expense,
                Frequency::Monthly,
                DayOfMonth::new(1).unwrap(),
            )
            .description("Rent"),
            &connection,
        )
        .unwrap();
        let server = get_test_server(connection);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", PASSWORD)])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), "/dashboard?generated=1");
        let token = response.cookie(COOKIE_TOKEN);

        let response = server
            .get("/dashboard?generated=1")
            .add_cookie(token)
            .await;

        response.assert_status_ok();
        assert!(
            response
                .text()
                .contains("1 recurring transaction was generated automatically.")
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server(connection_with_user());

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }
}
