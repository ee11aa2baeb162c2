//! ZIP code allow-list settings.
//!
//! The form takes a comma-separated list. Anything that is not a 5-digit code
//! is dropped without an error; the page echoes what was stored and how many
//! codes survived, which is how the admin notices a typo.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, Router, extract::State, response::Redirect, routing::get};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zipgate_core::AllowList;

use crate::db::{self, RepositoryError};
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::state::AppState;

/// Path of the settings page.
pub const ZIPCODES_PATH: &str = "/settings/zipcodes";

/// Flash shown after a save.
pub const SAVED_MESSAGE: &str = "Settings saved.";

/// Flash shown when the save did not reach the database.
pub const SAVE_FAILED_MESSAGE: &str = "Settings could not be saved. Please try again.";

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/zipcodes.html")]
pub struct ZipcodesTemplate {
    pub view: ZipcodesView,
    pub flash: Option<Flash>,
}

/// What the settings page shows about the stored allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipcodesView {
    /// Stored value, placed in the textarea.
    pub stored: String,
    /// Stored value, or "None" when empty.
    pub current: String,
    /// Number of codes in the list.
    pub count: usize,
    /// Whether the block checkout renderer is active.
    pub block_renderer: bool,
}

impl ZipcodesView {
    #[must_use]
    pub fn new(list: &AllowList, block_renderer: bool) -> Self {
        let stored = list.as_stored();
        let current = if stored.is_empty() {
            "None".to_string()
        } else {
            stored.clone()
        };
        Self {
            stored,
            current,
            count: list.len(),
            block_renderer,
        }
    }
}

/// Flash for the outcome of a save.
fn save_flash(result: &Result<AllowList, RepositoryError>) -> Flash {
    match result {
        Ok(_) => Flash::success(SAVED_MESSAGE),
        Err(_) => Flash::error(SAVE_FAILED_MESSAGE),
    }
}

/// Settings form submission.
#[derive(Debug, Deserialize)]
pub struct ZipcodesForm {
    #[serde(default)]
    pub allowed_zipcodes: String,
}

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route(ZIPCODES_PATH, get(show).post(update))
}

/// Render the settings page.
///
/// GET /settings/zipcodes
#[instrument(skip_all)]
async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<ZipcodesTemplate, AppError> {
    let list = db::get_allowed_zipcodes(state.pool()).await?;
    let flash = take_flash(&session).await?;

    Ok(ZipcodesTemplate {
        view: ZipcodesView::new(&list, state.config().renderer.is_block()),
        flash,
    })
}

/// Sanitize and save the allow-list.
///
/// A failed write keeps the previous list and is reported through the flash.
///
/// POST /settings/zipcodes
#[instrument(skip_all)]
async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ZipcodesForm>,
) -> Result<Redirect, AppError> {
    let result = db::set_allowed_zipcodes(state.pool(), &form.allowed_zipcodes).await;
    match &result {
        Ok(list) => tracing::debug!(stored = %list, "Allow-list saved"),
        Err(e) => {
            let event_id = sentry::capture_error(e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Failed to save allow-list"
            );
        }
    }

    set_flash(&session, &save_flash(&result)).await?;
    Ok(Redirect::to(ZIPCODES_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::FlashLevel;

    #[test]
    fn test_save_flash() {
        let saved = save_flash(&Ok(AllowList::sanitize("80902")));
        assert_eq!(saved, Flash::success(SAVED_MESSAGE));

        let failed = save_flash(&Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));
        assert_eq!(failed.level, FlashLevel::Error);
        assert_eq!(failed.message, SAVE_FAILED_MESSAGE);
    }

    #[test]
    fn test_view_for_empty_list() {
        let view = ZipcodesView::new(&AllowList::empty(), false);
        assert_eq!(view.stored, "");
        assert_eq!(view.current, "None");
        assert_eq!(view.count, 0);
    }

    #[test]
    fn test_view_after_sanitizing_input() {
        let view = ZipcodesView::new(&AllowList::sanitize("80902, abc, 809021, 80903"), true);
        assert_eq!(view.stored, "80902,80903");
        assert_eq!(view.current, "80902,80903");
        assert_eq!(view.count, 2);
        assert!(view.block_renderer);
    }

    #[test]
    fn test_page_renders_count_and_block_notice() {
        let page = ZipcodesTemplate {
            view: ZipcodesView::new(&AllowList::from_stored("80902,80903"), true),
            flash: Some(Flash::success(SAVED_MESSAGE)),
        }
        .render()
        .unwrap();

        assert!(page.contains("Current allowed ZIP codes: 80902,80903 (2 total)"));
        assert!(page.contains("Block checkout detected"));
        assert!(page.contains(SAVED_MESSAGE));
        assert!(page.contains(">80902,80903</textarea>"));
    }

    #[test]
    fn test_page_omits_block_notice_for_classic() {
        let page = ZipcodesTemplate {
            view: ZipcodesView::new(&AllowList::empty(), false),
            flash: None,
        }
        .render()
        .unwrap();

        assert!(page.contains("Current allowed ZIP codes: None (0 total)"));
        assert!(!page.contains("Block checkout detected"));
    }

    #[test]
    fn test_page_renders_failed_save_flash() {
        let page = ZipcodesTemplate {
            view: ZipcodesView::new(&AllowList::from_stored("80902"), false),
            flash: Some(Flash::error(SAVE_FAILED_MESSAGE)),
        }
        .render()
        .unwrap();

        assert!(page.contains("notice-error"));
        assert!(page.contains(SAVE_FAILED_MESSAGE));
        assert!(page.contains("Current allowed ZIP codes: 80902 (1 total)"));
    }

    #[test]
    fn test_form_defaults_missing_field_to_empty() {
        let form: ZipcodesForm = parse_form("");
        assert_eq!(form.allowed_zipcodes, "");
    }

    fn parse_form(body: &str) -> ZipcodesForm {
        let uri: axum::http::Uri = format!("/?{body}").parse().unwrap();
        axum::extract::Query::<ZipcodesForm>::try_from_uri(&uri).unwrap().0
    }
}
