//! Notices shown above the dashboard content.

use maud::{Markup, html};

use crate::{endpoints, html::link};

/// Tells the user how many recurring transactions were added when they logged in.
///
/// Renders nothing when `generated_count` is zero.
pub(super) fn generated_notice(generated_count: usize) -> Markup {
    if generated_count == 0 {
        return html! {};
    }

    let noun = if generated_count == 1 {
        "transaction was"
    } else {
        "transactions were"
    };

    html! {
        div
            id="generated-notice"
            role="status"
            class="w-full rounded-lg border border-blue-200 bg-blue-50 px-4 py-3 text-sm
                text-blue-800 dark:border-blue-800 dark:bg-blue-900/30 dark:text-blue-200"
        {
            (generated_count) " recurring " (noun) " generated automatically. "
            (link(endpoints::RECURRING_VIEW, "Manage recurring transactions"))
        }
    }
}

/// Shown in place of the breakdown and chart for a month without transactions.
pub(super) fn empty_month_view() -> Markup {
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "add a transaction");

    html! {
        div class="flex flex-col items-center py-8 text-gray-900 dark:text-white"
        {
            h3 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "There are no transactions in this month. You can "
                (new_transaction_link) " or pick another month."
            }
        }
    }
}

#[cfg(test)]
mod generated_notice_tests {
    use crate::test_utils::must_get_text;

    use super::generated_notice;

    #[test]
    fn hidden_when_nothing_was_generated() {
        assert!(generated_notice(0).into_string().is_empty());
    }

    #[test]
    fn states_count() {
        let html = scraper::Html::parse_fragment(&generated_notice(3).into_string());

        assert!(
            must_get_text(&html, "#generated-notice")
                .starts_with("3 recurring transactions were generated automatically.")
        );
    }

    #[test]
    fn uses_singular_for_one() {
        let html = scraper::Html::parse_fragment(&generated_notice(1).into_string());

        assert!(
            must_get_text(&html, "#generated-notice")
                .starts_with("1 recurring transaction was generated automatically.")
        );
    }
}
