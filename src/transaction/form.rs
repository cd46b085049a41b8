use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    category::{Category, CategoryId},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::TransactionType,
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction ocurred.
    pub date: Date,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub description: String,
}

pub struct TransactionFormDefaults<'a> {
    pub kind: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category_id: Option<CategoryId>,
}

/// Radio buttons for choosing between income and expense.
pub fn transaction_type_fields(selected: TransactionType) -> Markup {
    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for kind in [TransactionType::Expense, TransactionType::Income] {
                    div class="flex flex-1"
                    {
                        input
                            name="type"
                            id={ "transaction-type-" (kind.as_str()) }
                            type="radio"
                            value=(kind.as_str())
                            checked[kind == selected]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for={ "transaction-type-" (kind.as_str()) }
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (kind)
                        }
                    }
                }
            }
        }
    }
}

/// A select listing income and expense categories in separate groups.
pub fn category_select(categories: &[Category], selected: Option<CategoryId>) -> Markup {
    html! {
        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Uncategorized" }

                @for kind in [TransactionType::Income, TransactionType::Expense] {
                    optgroup label=(kind)
                    {
                        @for category in categories.iter().filter(|category| category.kind == kind) {
                            option value=(category.id) selected[Some(category.id) == selected]
                            {
                                (category.name)
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    categories: &[Category],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
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
                    autofocus
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (category_select(categories, defaults.category_id))

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod transaction_form_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{TransactionFormDefaults, category_select, transaction_form_fields};
    use crate::{
        category::{Category, CategoryName},
        transaction::core::TransactionType,
    };

    #[test]
    fn checks_selected_type() {
        for (kind, expected) in [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ] {
            let html = render_fields(kind);
            let checked: Vec<_> = html
                .select(&Selector::parse("input[type=radio][name=type][checked]").unwrap())
                .filter_map(|input| input.value().attr("value"))
                .collect();

            assert_eq!(checked, [expected]);
        }
    }

    #[test]
    fn category_select_groups_by_type() {
        let categories = [
            Category {
                id: 1,
                name: CategoryName::new_unchecked("Sales"),
                kind: TransactionType::Income,
            },
            Category {
                id: 2,
                name: CategoryName::new_unchecked("Rent"),
                kind: TransactionType::Expense,
            },
        ];

        let markup = maud::html! { form { (category_select(&categories, Some(2))) } };
        let html = Html::parse_fragment(&markup.into_string());

        let expense_options: Vec<_> = html
            .select(&Selector::parse("optgroup[label=Expense] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect();
        assert_eq!(expense_options, ["Rent"]);
        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value"));
        assert_eq!(selected, Some("2"));
    }

    fn render_fields(kind: TransactionType) -> Html {
        let today = date!(2025 - 01 - 15);
        let fields = transaction_form_fields(
            &TransactionFormDefaults {
                kind,
                amount: None,
                date: today,
                description: None,
                category_id: None,
            },
            &[],
        );
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }
}
