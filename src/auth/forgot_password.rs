//! The page explaining how to reset a forgotten password.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, base, log_in_register},
};

fn forgot_password_view() -> Markup {
    let instructions = html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p class="text-justify"
            {
                "Passwords are reset from the machine the server runs on. Stop the server, "
                "then run the " code { "reset_password" } " program with the path to your "
                "database file:"
            }

            pre class="p-3 rounded bg-gray-100 dark:bg-gray-700 text-sm overflow-x-auto"
            {
                code { "reset_password --db-path pharmacy.db" }
            }

            p class="text-justify"
            {
                "You will be asked to type the new password twice. It must be hard to "
                "guess, the program explains how to make it stronger if it is not."
            }

            p
            {
                a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Back to log in" }
            }
        }
    };

    base(
        "Forgot Password",
        &[],
        &log_in_register("Forgot your password?", &instructions),
    )
}

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    forgot_password_view().into_response()
}

#[cfg(test)]
mod forgot_password_tests {
    use crate::test_utils::{
        assert_status_ok, assert_valid_html, must_get_text, parse_html_document,
    };

    use super::get_forgot_password_page;

    #[tokio::test]
    async fn explains_reset_password_program() {
        let response = get_forgot_password_page().await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            must_get_text(&html, "pre code"),
            "reset_password --db-path pharmacy.db"
        );
    }
}
