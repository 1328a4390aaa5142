// ============================================================================
// APP - Composición de sesión, fetch agent y stores
// ============================================================================
// Un único SessionContext se pasa explícitamente a todo lo que lo necesita.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::router::{self, Navigation};
use crate::services::{
    DeadlineWatcher, FetchAgent, GlooScheduler, GlooTransport, HttpTransport, TickScheduler,
};
use crate::state::SessionContext;
use crate::stores::{AnalysisStore, NotificationStore, ProjectStore, TicketStore};
use crate::utils::storage::{BrowserStorage, KeyValueStorage};

#[derive(Clone)]
pub struct App {
    pub session: SessionContext,
    pub agent: FetchAgent,
    pub tickets: TicketStore,
    pub analysis: AnalysisStore,
    pub notifications: NotificationStore,
    pub projects: ProjectStore,
    deadline_watcher: Rc<RefCell<DeadlineWatcher>>,
}

impl App {
    pub fn new(
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn KeyValueStorage>,
        scheduler: Rc<dyn TickScheduler>,
    ) -> Self {
        let session = SessionContext::new(storage);
        let agent = FetchAgent::new(transport, session.clone());
        let tickets = TicketStore::new(agent.clone());

        let app = Self {
            analysis: AnalysisStore::new(agent.clone(), tickets.clone()),
            notifications: NotificationStore::new(agent.clone()),
            projects: ProjectStore::new(agent.clone()),
            tickets,
            agent,
            session,
            deadline_watcher: Rc::new(RefCell::new(DeadlineWatcher::new(
                CONFIG.deadline_check_interval_ms,
                scheduler,
            ))),
        };
        app.watch_session();
        app
    }

    /// App del navegador: fetch + localStorage + setInterval
    pub fn browser() -> Self {
        Self::new(
            Rc::new(GlooTransport::new(CONFIG.backend_url())),
            Rc::new(BrowserStorage),
            Rc::new(GlooScheduler),
        )
    }

    pub fn is_deadline_watcher_running(&self) -> bool {
        self.deadline_watcher.borrow().is_running()
    }

    /// Al cerrar sesión (logout explícito o 401) se vacían las caches de usuario
    fn watch_session(&self) {
        let session = self.session.clone();
        let tickets = self.tickets.clone();
        let notifications = self.notifications.clone();
        let projects = self.projects.clone();
        let watcher = self.deadline_watcher.clone();

        self.session.subscribe(move || {
            if session.is_logged_in() {
                return;
            }
            log::info!("🧹 [APP] Sesión cerrada, limpiando caches");
            tickets.tickets.set(Vec::new());
            tickets.deadline_alerts.set(Vec::new());
            notifications.notifications.set(Vec::new());
            projects.projects.set(Vec::new());
            // try_borrow_mut: el logout puede venir de dentro de un tick del watcher
            if let Ok(mut watcher) = watcher.try_borrow_mut() {
                watcher.stop();
            }
        });
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        router::navigate(&self.session, path)
    }

    pub fn start_deadline_watcher(&self) {
        self.deadline_watcher
            .borrow_mut()
            .start(self.tickets.clone(), self.session.clone());
    }

    pub fn stop_deadline_watcher(&self) {
        self.deadline_watcher.borrow_mut().stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Route;
    use crate::services::deadline_watcher::mock::ManualScheduler;
    use crate::services::http::mock::MockTransport;
    use crate::utils::storage::MemoryStorage;
    use futures::executor::block_on;
    use uuid::Uuid;

    fn test_app() -> (App, Rc<MockTransport>, Rc<ManualScheduler>) {
        let transport = Rc::new(MockTransport::new());
        let scheduler = Rc::new(ManualScheduler::default());
        let app = App::new(
            transport.clone() as Rc<dyn HttpTransport>,
            Rc::new(MemoryStorage::new()) as Rc<dyn KeyValueStorage>,
            scheduler.clone() as Rc<dyn TickScheduler>,
        );
        (app, transport, scheduler)
    }

    #[test]
    fn forced_logout_clears_caches_and_redirects() {
        let (app, transport, _) = test_app();
        app.session.login("tok", "ana@example.org").unwrap();

        let project = Uuid::from_u128(1);
        transport.on_json(
            &format!("GET /tickets?project-id={}", project),
            200,
            serde_json::json!([{ "id": Uuid::from_u128(9), "projectId": project, "title": "t" }]),
        );
        block_on(app.tickets.update_tickets_by_project_id(project)).unwrap();
        assert_eq!(app.tickets.get_tickets_by_project_id(project).len(), 1);
        assert_eq!(app.navigate("/tickets"), Navigation::Proceed(Route::Tickets));

        transport.on("GET /api/analysis/top-users", 401, "");
        assert!(block_on(app.analysis.get_top_users()).is_err());

        assert!(!app.session.is_logged_in());
        assert!(app.tickets.get_tickets_by_project_id(project).is_empty());
        assert_eq!(app.navigate("/tickets"), Navigation::Redirect(Route::SignIn));
    }

    #[test]
    fn forced_logout_stops_the_deadline_watcher() {
        let (app, transport, scheduler) = test_app();
        app.session.login("tok", "ana@example.org").unwrap();

        app.start_deadline_watcher();
        assert!(app.is_deadline_watcher_running());
        assert!(scheduler.is_active());

        transport.on("GET /api/analysis/top-users", 401, "");
        assert!(block_on(app.analysis.get_top_users()).is_err());

        assert!(!app.is_deadline_watcher_running());
        assert!(!scheduler.is_active());
        assert!(!scheduler.fire());
    }

    #[test]
    fn explicit_stop_leaves_session_untouched() {
        let (app, _, scheduler) = test_app();
        app.session.login("tok", "ana@example.org").unwrap();

        app.start_deadline_watcher();
        app.stop_deadline_watcher();

        assert!(app.session.is_logged_in());
        assert!(!scheduler.is_active());
    }
}
