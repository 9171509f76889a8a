use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::compose::CompositionRoot;
use crate::domain::entities::UpdateStrategy;
use crate::errors::{render, AppError};
use crate::flows::role_assignment::{self, RoleAssignmentEvent, RoleAssignmentState};
use crate::flows::SaveOutcome;
use crate::notify::{FlashSink, NotificationSink};
use crate::templates_structs::{AssignRolesTemplate, PageContext, SelectOption};

use super::{ellipsized_list, get_all, get_field, parse_form_body, split_ids};

#[derive(Deserialize)]
pub struct AssignRolesQuery {
    ids: String,
    filter: Option<String>,
}

/// Render the role assignment dialog. A load failure keeps the dialog open
/// with its error branch so the operator can retry. The `filter` query
/// narrows the rendered role list; already-selected roles that fall
/// outside it ride along as hidden inputs so the selection survives.
pub async fn dialog(
    root: web::Data<CompositionRoot>,
    session: Session,
    query: web::Query<AssignRolesQuery>,
) -> Result<HttpResponse, AppError> {
    let ids = split_ids(&query.ids);
    let mut flow = role_assignment::load(&root, &ids).await;
    if let Some(filter) = &query.filter {
        flow.apply(RoleAssignmentEvent::FilterChanged(filter.clone()));
    }

    let ctx = PageContext::build(&session, "/users");
    let tmpl = match flow.state() {
        RoleAssignmentState::Ready(sel) => {
            let visible = sel.visible_roles();
            AssignRolesTemplate {
                ctx,
                title: format!("Assign roles: {}", ellipsized_list(&sel.usernames())),
                ids_csv: query.ids.clone(),
                options: visible
                    .iter()
                    .map(|r| SelectOption {
                        id: r.id.clone(),
                        name: r.name.clone(),
                        selected: sel.selected.contains(&r.id),
                    })
                    .collect(),
                hidden_selected: sel
                    .selected
                    .iter()
                    .filter(|id| !visible.iter().any(|r| r.id == **id))
                    .cloned()
                    .collect(),
                filter: sel.filter.clone(),
                strategy: strategy_name(sel.strategy).to_string(),
                strategy_locked: sel.strategy_locked,
                error: None,
            }
        }
        RoleAssignmentState::Failed(msg) => error_template(ctx, &query.ids, msg),
        RoleAssignmentState::Loading { .. } => {
            error_template(ctx, &query.ids, "Still loading, try again")
        }
    };
    render(tmpl)
}

/// Apply the posted selection and strategy, then save. On failure the
/// dialog stays open for resubmission.
pub async fn save(
    root: web::Data<CompositionRoot>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    let params = parse_form_body(&body);
    let ids_csv = get_field(&params, "ids").to_string();
    let ids = split_ids(&ids_csv);
    let selected: Vec<String> = get_all(&params, "roles").iter().map(|s| s.to_string()).collect();
    let strategy = parse_strategy(get_field(&params, "strategy"));

    let sink = FlashSink::new(&session);
    let mut flow = role_assignment::load(&root, &ids).await;
    if let RoleAssignmentState::Failed(msg) = flow.state() {
        // Reload failed; surface it and keep the dialog open for retry.
        sink.error(msg);
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", format!("/users/assign-roles?ids={ids_csv}")))
            .finish());
    }
    flow.apply(RoleAssignmentEvent::SelectionChanged(selected));
    flow.apply(RoleAssignmentEvent::StrategyChanged(strategy));

    let outcome = role_assignment::save(&root, &flow, &sink).await;

    let location = match outcome {
        SaveOutcome::Failed => format!("/users/assign-roles?ids={ids_csv}"),
        _ => "/users".to_string(),
    };
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish())
}

fn error_template(ctx: PageContext, ids_csv: &str, message: &str) -> AssignRolesTemplate {
    AssignRolesTemplate {
        ctx,
        title: "Assign roles".to_string(),
        ids_csv: ids_csv.to_string(),
        options: vec![],
        hidden_selected: vec![],
        filter: String::new(),
        strategy: "merge".to_string(),
        strategy_locked: false,
        error: Some(message.to_string()),
    }
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
