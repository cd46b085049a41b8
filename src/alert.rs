//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that HTMX swaps into the `#alert-container`
//! element of the base page.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An alert message to show to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with additional details.
    #[allow(dead_code)]
    Success { message: String, details: String },
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details on how to fix it.
    Error { message: String, details: String },
    /// An error message without details.
    ErrorSimple { message: String },
}

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
    dark:bg-gray-800 dark:text-green-400 border border-green-300 dark:border-green-800";
const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800";

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ERROR_STYLE, message, None),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert"
                {
                    div class="flex items-start justify-between gap-2"
                    {
                        div
                        {
                            p class="font-medium" { (message) }

                            @if let Some(details) = details
                            {
                                span class="block mt-1" { (details) }
                            }
                        }

                        button
                            type="button"
                            aria-label="Dismiss"
                            class="ms-auto font-bold"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
