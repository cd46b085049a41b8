use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    category::{Category, CategoryId},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction, loading_spinner,
    },
    recurring::{DayOfMonth, Frequency, NewRecurringTransaction, RecurringTransaction},
    transaction::{TransactionType, category_select, transaction_type_fields},
};

/// The form data for creating or editing a recurring transaction.
#[derive(Debug, Deserialize)]
pub struct RecurringForm {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    /// Missing for weekly transactions since the select is disabled.
    #[serde(default = "default_day_of_month")]
    pub day_of_month: u8,
}

fn default_day_of_month() -> u8 {
    DayOfMonth::default().get()
}

impl RecurringForm {
    /// # Errors
    /// Returns [crate::Error::InvalidDayOfMonth] for monthly transactions with a day outside 1 to 31.
    pub fn to_new_recurring(&self) -> Result<NewRecurringTransaction, crate::Error> {
        let day_of_month = match self.frequency {
            Frequency::Monthly => DayOfMonth::new(self.day_of_month)?,
            Frequency::Weekly => DayOfMonth::default(),
        };

        Ok(
            NewRecurringTransaction::new(self.amount, self.kind, self.frequency, day_of_month)
                .category_id(self.category_id)
                .description(&self.description),
        )
    }
}

/// The values shown in the recurring transaction form.
pub struct RecurringFormDefaults<'a> {
    pub kind: TransactionType,
    pub amount: Option<f64>,
    pub category_id: Option<CategoryId>,
    pub description: &'a str,
    pub frequency: Frequency,
    pub day_of_month: u8,
}

impl Default for RecurringFormDefaults<'_> {
    fn default() -> Self {
        Self {
            kind: TransactionType::Expense,
            amount: None,
            category_id: None,
            description: "",
            frequency: Frequency::Monthly,
            day_of_month: DayOfMonth::default().get(),
        }
    }
}

impl<'a> From<&'a RecurringTransaction> for RecurringFormDefaults<'a> {
    fn from(recurring: &'a RecurringTransaction) -> Self {
        Self {
            kind: recurring.kind,
            amount: Some(recurring.amount),
            category_id: recurring.category_id,
            description: &recurring.description,
            frequency: recurring.frequency,
            day_of_month: recurring.day_of_month.get(),
        }
    }
}

impl<'a> From<&'a RecurringForm> for RecurringFormDefaults<'a> {
    fn from(form: &'a RecurringForm) -> Self {
        Self {
            kind: form.kind,
            amount: Some(form.amount),
            category_id: form.category_id,
            description: &form.description,
            frequency: form.frequency,
            day_of_month: form.day_of_month,
        }
    }
}

// Disables the day select while weekly is chosen so it is not submitted.
const FREQUENCY_SCRIPT: &str = "const day = document.getElementById('day_of_month'); \
    day.disabled = this.querySelector('input[name=frequency]:checked')?.value === 'weekly';";

fn frequency_fields(selected: Frequency, day_of_month: u8) -> Markup {
    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Frequency" }

            div class=(FORM_RADIO_GROUP_STYLE) onchange=(FREQUENCY_SCRIPT)
            {
                @for frequency in [Frequency::Monthly, Frequency::Weekly] {
                    div class="flex flex-1"
                    {
                        input
                            name="frequency"
                            id={ "frequency-" (frequency.as_str()) }
                            type="radio"
                            value=(frequency.as_str())
                            checked[frequency == selected]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for={ "frequency-" (frequency.as_str()) } class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (frequency)
                        }
                    }
                }
            }
        }

        div
        {
            label for="day_of_month" class=(FORM_LABEL_STYLE) { "Day of the Month" }

            select
                name="day_of_month"
                id="day_of_month"
                disabled[selected == Frequency::Weekly]
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for day in 1..=31u8 {
                    option value=(day) selected[day == day_of_month] { (day) }
                }
            }

            p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
            {
                "Monthly transactions only. Days past the end of a month use its last day."
            }
        }
    }
}

/// The form for creating or editing a recurring transaction.
///
/// Validation errors re-render this form with `error_message` above the submit button.
pub fn recurring_form_view(
    action: FormAction<'_>,
    defaults: &RecurringFormDefaults<'_>,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match action {
        FormAction::Create => (
            Some(endpoints::RECURRING_API),
            None,
            "Create Recurring Transaction",
        ),
        FormAction::Update { endpoint } => (None, Some(endpoint), "Save Changes"),
    };
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (transaction_type_fields(defaults.kind))

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        min="0.01"
                        required
                        value=[amount_str.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            (category_select(categories, defaults.category_id))

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="e.g. Shop rent"
                    value=(defaults.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (frequency_fields(defaults.frequency, defaults.day_of_month))

            @if !error_message.is_empty() {
                p class="text-red-500 text-base" { (error_message) }
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (loading_spinner()) }
                " " (submit_text)
            }
        }
    }
}
