//! The log-in page and the endpoint that checks the password.
//!
//! A successful log-in starts a new session, which is when due recurring
//! transactions are added to the ledger.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        SOLE_USER_ID, get_user_by_id, invalidate_auth_cookie, normalize_redirect_url,
        set_auth_cookie,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, loading_spinner, log_in_register, password_input},
    recurring::SessionRunner,
    timezone::local_today,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub(crate) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

const AUTH_LINK_STYLE: &str = "font-semibold leading-6 text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400";

fn log_in_form(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Forgot your password? "
                a href=(endpoints::FORGOT_PASSWORD_VIEW) tabindex="0" class=(AUTH_LINK_STYLE)
                {
                    "Reset it here"
                }
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have a password? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(AUTH_LINK_STYLE)
                {
                    "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// The query string of the log-in page.
#[derive(Deserialize)]
pub struct RedirectQuery {
    /// The page to return to after logging in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = log_in_form(None, redirect_url.as_deref());
    let content = log_in_register("Log in to your account", &form);

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Password entered during log-in.
    pub password: String,

    /// Set to any value when the checkbox is ticked, missing otherwise.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

/// Add the due recurring transactions to the ledger for the new session.
///
/// Returns the number of transactions generated. Failures are logged and count as zero.
fn generate_recurring_transactions(connection: &Connection, local_timezone: &str) -> usize {
    let today = match local_today(local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Skipping recurring transactions: {error}");
            return 0;
        }
    };

    let mut runner = SessionRunner::new();
    runner.run(connection, today)
}

fn redirect_after_log_in(redirect_url: Option<&str>, generated_count: usize) -> String {
    match redirect_url {
        Some(redirect_url) => redirect_url.to_owned(),
        None if generated_count > 0 => {
            format!("{}?generated={generated_count}", endpoints::DASHBOARD_VIEW)
        }
        None => endpoints::DASHBOARD_VIEW.to_owned(),
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set, recurring transactions are generated and
/// the client is redirected to `redirect_url` or the dashboard.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return log_in_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    };

    let user = match get_user_by_id(SOLE_USER_ID, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_form(
                Some("Password not set, go to the registration page and set your password"),
                redirect_url,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    };

    match user.password_hash.verify(&user_data.password) {
        Ok(true) => {}
        Ok(false) => {
            return log_in_form(Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    }

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let jar = match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response();
        }
    };

    let generated_count = generate_recurring_transactions(&connection, &state.local_timezone);

    (
        StatusCode::SEE_OTHER,
        HxRedirect(redirect_after_log_in(redirect_url, generated_count)),
        jar,
    )
        .into_response()
}

#[cfg(test)]
mod log_in_page_tests {
    use std::iter::zip;

    use axum::extract::Query;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{RedirectQuery, get_log_in_page};

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page(Query(RedirectQuery { redirect_url: None })).await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "password", "password");

        let links = form
            .select(&Selector::parse("a[href]").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(links.len(), 2, "want 2 links, got {}", links.len());
        for (link, endpoint) in zip(
            links,
            [endpoints::FORGOT_PASSWORD_VIEW, endpoints::REGISTER_VIEW],
        ) {
            assert_eq!(link.value().attr("href"), Some(endpoint));
        }
    }

    #[tokio::test]
    async fn log_in_page_preserves_redirect_url() {
        let redirect_url = "/transactions?month=2024-03";

        let response = get_log_in_page(Query(RedirectQuery {
            redirect_url: Some(redirect_url.to_owned()),
        }))
        .await;

        let document = parse_html_document(response).await;
        let input = document
            .select(&Selector::parse("input[name=redirect_url]").unwrap())
            .next()
            .expect("redirect_url input");
        assert_eq!(input.value().attr("value"), Some(redirect_url));
    }

    #[tokio::test]
    async fn log_in_page_drops_external_redirect_url() {
        let response = get_log_in_page(Query(RedirectQuery {
            redirect_url: Some("https://example.com".to_owned()),
        }))
        .await;

        let document = parse_html_document(response).await;
        let inputs = document
            .select(&Selector::parse("input[name=redirect_url]").unwrap())
            .count();
        assert_eq!(inputs, 0);
    }
}
