use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::compose::CompositionRoot;
use crate::domain::entities::UpdateStrategy;
use crate::errors::{render, AppError};
use crate::flows::copy_in_user::{self, CopyInUserEvent, CopyInUserState};
use crate::flows::SaveOutcome;
use crate::notify::{FlashSink, NotificationSink};
use crate::templates_structs::{CopyInUserTemplate, PageContext, SelectOption};

use super::{ellipsized_list, get_all, get_field, parse_form_body, split_ids};

#[derive(Deserialize)]
pub struct CopyQuery {
    ids: String,
    filter: Option<String>,
}

/// Render the copy-in-user dialog. A load failure closes it: one error
/// notification, then back to the user list. The `filter` query narrows
/// the rendered target list.
pub async fn dialog(
    root: web::Data<CompositionRoot>,
    session: Session,
    query: web::Query<CopyQuery>,
) -> Result<HttpResponse, AppError> {
    let ids = split_ids(&query.ids);
    let mut flow = copy_in_user::load(&root, &ids).await;
    if let Some(filter) = &query.filter {
        flow.apply(CopyInUserEvent::FilterChanged(filter.clone()));
    }

    match flow.state() {
        CopyInUserState::Ready(sel) => {
            let visible = sel.visible_candidates();
            let ctx = PageContext::build(&session, "/users");
            let tmpl = CopyInUserTemplate {
                ctx,
                title: format!("Copy settings from: {}", ellipsized_list(&sel.source_names())),
                ids_csv: query.ids.clone(),
                options: visible
                    .iter()
                    .map(|c| SelectOption {
                        id: c.id.clone(),
                        name: c.name.clone(),
                        selected: sel.selected.contains(&c.id),
                    })
                    .collect(),
                hidden_selected: sel
                    .selected
                    .iter()
                    .filter(|id| !visible.iter().any(|c| c.id == **id))
                    .cloned()
                    .collect(),
                copy_user_groups: sel.copy_user_groups,
                copy_user_roles: sel.copy_user_roles,
                strategy: strategy_name(sel.strategy).to_string(),
                show_strategy: !sel.strategy_locked(),
                filter: sel.filter.clone(),
            };
            render(tmpl)
        }
        CopyInUserState::Closed(message) => {
            if let Some(msg) = message {
                FlashSink::new(&session).error(msg);
            }
            Ok(close_redirect())
        }
        CopyInUserState::Loading { .. } => Ok(close_redirect()),
    }
}

/// Apply posted selection/toggles and save. Validation failures keep the
/// dialog open; save failures close it (`ErrorPolicy::Close`).
pub async fn save(
    root: web::Data<CompositionRoot>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    let params = parse_form_body(&body);
    let ids_csv = get_field(&params, "ids").to_string();
    let ids = split_ids(&ids_csv);
    let targets: Vec<String> = get_all(&params, "targets").iter().map(|s| s.to_string()).collect();
    let copy_groups = get_field(&params, "copy_user_groups") == "on";
    let copy_roles = get_field(&params, "copy_user_roles") == "on";
    let strategy = parse_strategy(get_field(&params, "strategy"));

    let sink = FlashSink::new(&session);
    let mut flow = copy_in_user::load(&root, &ids).await;
    if let CopyInUserState::Closed(Some(msg)) = flow.state() {
        sink.error(msg);
        return Ok(close_redirect());
    }

    flow.apply(CopyInUserEvent::SelectionChanged(targets));
    flow.apply(CopyInUserEvent::CopyGroupsToggled(copy_groups));
    flow.apply(CopyInUserEvent::CopyRolesToggled(copy_roles));
    flow.apply(CopyInUserEvent::StrategyChanged(strategy));

    let outcome = copy_in_user::save(&root, &mut flow, &sink).await;

    let location = match outcome {
        SaveOutcome::Blocked => format!("/users/copy?ids={ids_csv}"),
        _ => "/users".to_string(),
    };
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish())
}

fn close_redirect() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/users"))
        .finish()
}

fn strategy_name(strategy: UpdateStrategy) -> &'static str {
    match strategy {
        UpdateStrategy::Merge => "merge",
        UpdateStrategy::Replace => "replace",
    }
}

fn parse_strategy(value: &str) -> UpdateStrategy {
    match value {
        "replace" => UpdateStrategy::Replace,
        _ => UpdateStrategy::Merge,
    }
}
