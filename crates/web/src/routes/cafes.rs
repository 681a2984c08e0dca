//! Cafe route handlers: listing, detail and the add form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use cafe_core::{Amenity, CafeId};

use crate::db::CafeRepository;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::{CafeForm, ValidationErrors};
use crate::middleware::csrf::{CSRF_FIELD, check_token, issue_token};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Cafe, User};
use crate::services::{CafeService, SubmitError};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Cafe list page template.
#[derive(Template, WebTemplate)]
#[template(path = "cafes/index.html")]
pub struct IndexTemplate {
    pub current_user: Option<User>,
    pub cafes: Vec<Cafe>,
}

/// Cafe detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "cafes/show.html")]
pub struct ShowTemplate {
    pub current_user: Option<User>,
    pub cafe: Cafe,
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub current_user: Option<User>,
    pub heading: &'static str,
    pub message: &'static str,
}

/// One `<option>` of an amenity select.
pub struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

/// An amenity `<select>` with the submitted value preselected.
pub struct AmenitySelect {
    pub name: &'static str,
    pub label: &'static str,
    pub options: Vec<SelectOption>,
}

impl AmenitySelect {
    fn new(name: &'static str, label: &'static str, submitted: &str) -> Self {
        let current = Amenity::from_form_value(submitted);
        let options = Amenity::CHOICES
            .iter()
            .map(|choice| SelectOption {
                value: choice.as_str(),
                selected: *choice == current,
            })
            .collect();

        Self {
            name,
            label,
            options,
        }
    }
}

/// Add-cafe form template.
#[derive(Template, WebTemplate)]
#[template(path = "cafes/add.html")]
pub struct AddCafeTemplate {
    pub current_user: Option<User>,
    pub form: CafeForm,
    pub amenities: Vec<AmenitySelect>,
    pub errors: ValidationErrors,
    pub csrf_token: String,
}

impl AddCafeTemplate {
    fn new(user: User, form: CafeForm, errors: ValidationErrors, csrf_token: String) -> Self {
        let amenities = vec![
            AmenitySelect::new("has_sockets", "Sockets available?", &form.has_sockets),
            AmenitySelect::new("has_toilet", "Toilet available?", &form.has_toilet),
            AmenitySelect::new("has_wifi", "Wifi available?", &form.has_wifi),
            AmenitySelect::new("can_take_calls", "Can take calls?", &form.can_take_calls),
        ];

        Self {
            current_user: Some(user),
            form,
            amenities,
            errors,
            csrf_token,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List every cafe.
#[instrument(skip(state, current_user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let cafes = CafeRepository::new(state.pool()).list().await?;

    Ok(IndexTemplate {
        current_user,
        cafes,
    })
}

/// Show a single cafe, or a 404 page if the id is unknown.
#[instrument(skip(state, current_user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(id): Path<CafeId>,
) -> Result<Response> {
    match CafeRepository::new(state.pool()).get_by_id(id).await? {
        Some(cafe) => Ok(ShowTemplate { current_user, cafe }.into_response()),
        None => {
            tracing::debug!(cafe_id = %id, "Cafe not found");
            Ok(not_found_page(
                current_user,
                "Cafe not found",
                "There is no cafe with that id.",
            ))
        }
    }
}

/// Display the empty add-cafe form.
pub async fn add_page(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    let csrf_token = issue_token(&session).await?;
    Ok(AddCafeTemplate::new(
        user,
        CafeForm::default(),
        ValidationErrors::new(),
        csrf_token,
    ))
}

/// Handle an add-cafe submission.
///
/// Redirects to the list on success; otherwise redisplays the form with the
/// submitted values and per-field errors. A submission without the session's
/// anti-forgery token is redisplayed without touching the store.
#[instrument(skip(state, user, session, form), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CafeForm>,
) -> Result<Response> {
    if let Some(message) = check_token(&session, &form.csrf_token).await? {
        tracing::warn!("Cafe submission with bad anti-forgery token");
        let mut errors = ValidationErrors::new();
        errors.add(CSRF_FIELD, message);
        let csrf_token = issue_token(&session).await?;
        return Ok(AddCafeTemplate::new(user, form, errors, csrf_token).into_response());
    }

    match CafeService::new(state.pool()).submit(&form).await {
        Ok(cafe) => {
            let cafe_id = cafe.id.to_string();
            add_breadcrumb("cafe", "Added cafe", Some(&[("cafe_id", cafe_id.as_str())]));
            Ok(Redirect::to("/").into_response())
        }
        Err(SubmitError::Invalid(errors)) => {
            tracing::debug!(fields = errors.len(), "Cafe submission rejected");
            let csrf_token = issue_token(&session).await?;
            Ok(AddCafeTemplate::new(user, form, errors, csrf_token).into_response())
        }
        Err(SubmitError::Repository(e)) => Err(e.into()),
    }
}

/// Fallback for unknown paths.
pub async fn fallback(OptionalAuth(current_user): OptionalAuth) -> Response {
    not_found_page(current_user, "Page not found", "There is no page at this address.")
}

fn not_found_page(
    current_user: Option<User>,
    heading: &'static str,
    message: &'static str,
) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            current_user,
            heading,
            message,
        },
    )
        .into_response()
}
