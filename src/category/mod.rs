//! Categories group transactions for the dashboard and reports.
//!
//! Each category belongs to either income or expenses, and a transaction may
//! only use a category of its own type.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    check_category_type, count_transactions_per_category, create_category, create_category_table,
    delete_category, get_all_categories, get_categories_by_type, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
