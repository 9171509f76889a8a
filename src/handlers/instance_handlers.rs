use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::compose::CompositionRoot;
use crate::errors::{render, AppError};
use crate::templates_structs::{InstanceTemplate, PageContext};

/// Instance metadata browser: platform version and available UI locales.
pub async fn show(
    root: web::Data<CompositionRoot>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let (version, locales) =
        tokio::join!(root.instance.get_version(), root.instance.get_locales());

    let ctx = PageContext::build(&session, "/instance");
    let tmpl = InstanceTemplate {
        ctx,
        version: version?,
        locales: locales?,
    };
    render(tmpl)
}
