use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::compose::CompositionRoot;
use crate::domain::entities::ListFilter;
use crate::errors::{render, AppError};
use crate::templates_structs::{PageContext, UserListTemplate};

#[derive(Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    page: Option<i64>,
}

pub async fn list(
    root: web::Data<CompositionRoot>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = ListFilter {
        query: query.q.clone(),
        page: query.page.unwrap_or(1),
        ..ListFilter::default()
    };
    let page = root.users.list(&filter).await?;

    let ctx = PageContext::build(&session, "/users");
    let tmpl = UserListTemplate {
        ctx,
        page,
        query: query.q.clone().unwrap_or_default(),
    };
    render(tmpl)
}

#[derive(Deserialize)]
pub struct StatusForm {
    disabled: bool,
}

/// Enable or disable a single user, then bounce back to the list.
pub async fn set_status(
    root: web::Data<CompositionRoot>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let user = root.users.get(&id).await?;
    match root.users.save_status(&[user], form.disabled).await {
        Ok(()) => {
            let verb = if form.disabled { "disabled" } else { "enabled" };
            let _ = session.insert("flash", format!("User {verb}"));
        }
        Err(e) => {
            let _ = session.insert("flash", format!("Error updating user status: {e}"));
        }
    }

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/users"))
        .finish())
}
