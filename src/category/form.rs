use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction},
    transaction::{TransactionType, transaction_type_fields},
};

/// The form for creating or editing a category.
///
/// Validation errors re-render this form with `error_message` below the inputs.
pub fn category_form_view(
    action: FormAction<'_>,
    name: &str,
    kind: TransactionType,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match action {
        FormAction::Create => (Some(endpoints::CATEGORIES_API), None, "Create Category"),
        FormAction::Update { endpoint } => (None, Some(endpoint), "Save Changes"),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Prescription sales"
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (transaction_type_fields(kind))

            @if !error_message.is_empty() {
                p class="text-red-500 text-base" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
