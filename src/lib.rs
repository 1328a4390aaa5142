// ============================================================================
// TICKET DESK - FRONTEND (RUST + WASM)
// ============================================================================
// Capa de estado del front-end de tickets:
// - Services: SOLO comunicación (fetch agent, transporte, descargas)
// - State: sesión + estado reactivo con Rc<RefCell>
// - Stores: caches por dominio (tickets, análisis, notificaciones, proyectos)
// - Router: guard de sesión
// - Models: estructuras compartidas con el backend
// ============================================================================

pub mod app;
pub mod config;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;

use std::cell::RefCell;

use uuid::Uuid;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::services::BrowserFileSink;

// Instancia global de la App (un único hilo en WASM)
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    use crate::config::CONFIG;

    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Info
    } else {
        log::Level::Warn
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 Ticket Desk - Rust + WASM ({})", CONFIG.environment);

    let app = App::browser();
    if app.session.is_logged_in() {
        app.start_deadline_watcher();
    }

    APP.with(|cell| *cell.borrow_mut() = Some(app));
    Ok(())
}

/// Copia de la App (handles Rc) para usar fuera del borrow del thread_local
fn app() -> Result<App, JsValue> {
    APP.with(|cell| cell.borrow().clone())
        .ok_or_else(|| JsValue::from_str("App no está inicializada"))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_id(raw: &str) -> Result<Uuid, JsValue> {
    Uuid::parse_str(raw).map_err(|e| JsValue::from_str(&format!("Id inválido '{}': {}", raw, e)))
}

/// Path final tras aplicar el guard de sesión
#[wasm_bindgen]
pub fn resolve_route(path: &str) -> Result<String, JsValue> {
    Ok(app()?.navigate(path).route().path())
}

#[wasm_bindgen]
pub fn is_logged_in() -> Result<bool, JsValue> {
    Ok(app()?.session.is_logged_in())
}

#[wasm_bindgen]
pub async fn sign_in(email: String, password: String) -> Result<(), JsValue> {
    let app = app()?;
    services::sign_in(&app.agent, &email, &password)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    app.start_deadline_watcher();
    Ok(())
}

#[wasm_bindgen]
pub fn sign_out() -> Result<bool, JsValue> {
    let app = app()?;
    app.stop_deadline_watcher();
    Ok(services::sign_out(&app.session))
}

/// Refresh autoritativo; devuelve los tickets del proyecto como objetos JS
#[wasm_bindgen]
pub async fn refresh_project_tickets(project_id: String) -> Result<JsValue, JsValue> {
    let app = app()?;
    let tickets = app
        .tickets
        .update_tickets_by_project_id(parse_id(&project_id)?)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&tickets)
}

#[wasm_bindgen]
pub async fn move_ticket(
    project_id: String,
    ticket_id: String,
    phase_id: String,
) -> Result<(), JsValue> {
    let app = app()?;
    let (project_id, ticket_id, phase_id) =
        (parse_id(&project_id)?, parse_id(&ticket_id)?, parse_id(&phase_id)?);
    app.tickets
        .update_ticket_position(project_id, ticket_id, phase_id)
        .await
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn deadline_alerts() -> Result<JsValue, JsValue> {
    to_js(&app()?.tickets.deadline_alerts.get())
}

#[wasm_bindgen]
pub async fn export_ticket_csv() -> Result<(), JsValue> {
    let app = app()?;
    app.analysis
        .export_csv(&BrowserFileSink)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
