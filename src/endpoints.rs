//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/categories/{category_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the ledger transactions of a month.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for listing all categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for listing recurring transactions.
pub const RECURRING_VIEW: &str = "/recurring";
/// The page for creating a new recurring transaction.
pub const NEW_RECURRING_VIEW: &str = "/recurring/new";
/// The page for editing an existing recurring transaction.
pub const EDIT_RECURRING_VIEW: &str = "/recurring/{recurring_id}/edit";
/// The page with the yearly, category and month comparison reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register the user.
pub const USERS: &str = "/api/users";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a category.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to update or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create a recurring transaction.
pub const RECURRING_API: &str = "/api/recurring";
/// The route to update or delete a single recurring transaction.
pub const RECURRING_TRANSACTION: &str = "/api/recurring/{recurring_id}";
/// The route to switch a recurring transaction on or off.
pub const TOGGLE_RECURRING: &str = "/api/recurring/{recurring_id}/active";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{category_id}' in '/categories/{category_id}'. Only the first parameter
/// is replaced.
///
/// If no parameter is found in `endpoint_path`, the original path is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map(|offset| start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!("{}{}{}", &endpoint_path[..start], id, &endpoint_path[end..])
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::CATEGORIES_VIEW,
            endpoints::NEW_CATEGORY_VIEW,
            endpoints::EDIT_CATEGORY_VIEW,
            endpoints::RECURRING_VIEW,
            endpoints::NEW_RECURRING_VIEW,
            endpoints::EDIT_RECURRING_VIEW,
            endpoints::REPORTS_VIEW,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::FORGOT_PASSWORD_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::USERS,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
            endpoints::CATEGORIES_API,
            endpoints::CATEGORY,
            endpoints::RECURRING_API,
            endpoints::RECURRING_TRANSACTION,
            endpoints::TOGGLE_RECURRING,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, 1);

        assert_eq!(formatted_path, "/categories/1/edit");
        assert_endpoint_is_valid_uri(&formatted_path);
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_at_end() {
        let formatted_path = format_endpoint(endpoints::RECURRING_TRANSACTION, 42);

        assert_eq!(formatted_path, "/api/recurring/42");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::TOGGLE_RECURRING, 7);

        assert_eq!(formatted_path, "/api/recurring/7/active");
    }
}
