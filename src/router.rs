// ============================================================================
// ROUTER - Rutas de la app y guard de sesión
// ============================================================================

use crate::state::SessionContext;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    SignIn,
    ProjectsOverview,
    ProjectDetails(String),
    Tickets,
    Analysis,
    NotFound(String),
}

impl Route {
    /// Ruta de aterrizaje tras el login
    pub const LANDING: Route = Route::ProjectsOverview;

    /// Resolver un path; `/` y `/projects` redirigen a la vista general
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["signin"] => Route::SignIn,
            [] | ["projects"] | ["projects", "overview"] => Route::ProjectsOverview,
            ["projects", id] => Route::ProjectDetails((*id).to_string()),
            ["tickets"] => Route::Tickets,
            ["analysis"] => Route::Analysis,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::SignIn => "/signin".to_string(),
            Route::ProjectsOverview => "/projects/overview".to_string(),
            Route::ProjectDetails(id) => format!("/projects/{}", id),
            Route::Tickets => "/tickets".to_string(),
            Route::Analysis => "/analysis".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed(Route),
    Redirect(Route),
}

impl Navigation {
    pub fn route(&self) -> &Route {
        match self {
            Navigation::Proceed(route) | Navigation::Redirect(route) => route,
        }
    }
}

/// Decisión antes de cada navegación
pub fn guard(logged_in: bool, to: Route) -> Navigation {
    match (logged_in, &to) {
        (true, Route::SignIn) => Navigation::Redirect(Route::LANDING),
        (false, Route::SignIn) => Navigation::Proceed(to),
        (false, _) => Navigation::Redirect(Route::SignIn),
        (true, _) => Navigation::Proceed(to),
    }
}

pub fn navigate(session: &SessionContext, path: &str) -> Navigation {
    let decision = guard(session.is_logged_in(), Route::parse(path));
    if let Navigation::Redirect(target) = &decision {
        log::info!("↪️ [ROUTER] {} → {}", path, target.path());
    }
    decision
}
