// Template context structures for the askama templates.

use actix_session::Session;
use askama::Template;

use crate::domain::entities::{Locale, UserPage};
use crate::notify::take_flash;

/// Common context shared by all pages.
pub struct PageContext {
    pub app_name: String,
    pub flash: Option<String>,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, current_path: &str) -> Self {
        PageContext {
            app_name: "User Administration".to_string(),
            flash: take_flash(session),
            current_path: current_path.to_string(),
        }
    }
}

/// One option row in a multi-select list.
pub struct SelectOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub ctx: PageContext,
    pub page: UserPage,
    pub query: String,
}

#[derive(Template)]
#[template(path = "users/assign_roles.html")]
pub struct AssignRolesTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub ids_csv: String,
    pub options: Vec<SelectOption>,
    /// Selected role ids hidden by the current filter; re-posted as hidden
    /// inputs so filtering never drops part of the selection.
    pub hidden_selected: Vec<String>,
    pub filter: String,
    pub strategy: String,
    pub strategy_locked: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "users/copy_in_user.html")]
pub struct CopyInUserTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub ids_csv: String,
    pub options: Vec<SelectOption>,
    pub hidden_selected: Vec<String>,
    pub copy_user_groups: bool,
    pub copy_user_roles: bool,
    pub strategy: String,
    pub show_strategy: bool,
    pub filter: String,
}

#[derive(Template)]
#[template(path = "instance.html")]
pub struct InstanceTemplate {
    pub ctx: PageContext,
    pub version: String,
    pub locales: Vec<Locale>,
}
