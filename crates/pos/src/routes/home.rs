//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::OptionalSession;
use crate::models::CurrentUser;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Display the landing page.
pub async fn home(OptionalSession(current_user): OptionalSession) -> impl IntoResponse {
    IndexTemplate { current_user }
}
