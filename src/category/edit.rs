//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryId, CategoryName,
        db::{get_category, update_category},
        domain::CategoryFormData,
        form::category_form_view,
    },
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing an existing category.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;

    Ok(edit_category_view(&category).into_response())
}

/// Handle the edit category form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let endpoint = format_endpoint(endpoints::CATEGORY, category_id);

    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            return category_form_view(
                FormAction::Update {
                    endpoint: &endpoint,
                },
                &form.name,
                form.kind,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_category(category_id, name, form.kind, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::UpdateMissingCategory
            | Error::DuplicateCategoryName(_)
            | Error::CategoryTypeMismatch),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_category_view(category: &Category) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let endpoint = format_endpoint(endpoints::CATEGORY, category.id);
    let form = category_form_view(
        FormAction::Update {
            endpoint: &endpoint,
        },
        category.name.as_ref(),
        category.kind,
        "",
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Category" }
            (form)
        }
    };

    base("Edit Category", &[], &content)
}
