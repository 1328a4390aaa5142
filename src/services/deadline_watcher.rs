// ============================================================================
// DEADLINE WATCHER - Intervalo controlado por quien lo crea
// ============================================================================
// Recalcula los avisos de deadline del TicketStore cada N ms. Nada arranca
// solo: `start` y `stop` (o drop) son explícitos.
// ============================================================================

use std::any::Any;
use std::rc::Rc;

use gloo_timers::callback::Interval;

use crate::state::SessionContext;
use crate::stores::TicketStore;

/// Mientras viva el guard, el tick sigue programado
pub type TickGuard = Box<dyn Any>;

/// Programador de ticks periódicos
pub trait TickScheduler {
    fn every(&self, period_ms: u32, tick: Box<dyn Fn()>) -> TickGuard;
}

/// Ticks del navegador (setInterval vía gloo-timers)
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooScheduler;

impl TickScheduler for GlooScheduler {
    fn every(&self, period_ms: u32, tick: Box<dyn Fn()>) -> TickGuard {
        // Drop del Interval = clearInterval
        Box::new(Interval::new(period_ms, move || tick()))
    }
}

pub struct DeadlineWatcher {
    period_ms: u32,
    scheduler: Rc<dyn TickScheduler>,
    guard: Option<TickGuard>,
}

impl DeadlineWatcher {
    pub fn new(period_ms: u32, scheduler: Rc<dyn TickScheduler>) -> Self {
        Self {
            period_ms,
            scheduler,
            guard: None,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_some()
    }

    /// Comprueba una vez ya y luego cada `period_ms`. Reiniciar reemplaza el
    /// intervalo anterior.
    pub fn start(&mut self, store: TicketStore, session: SessionContext) {
        self.stop();

        store.refresh_deadline_alerts(&session);
        log::info!("⏰ [DEADLINES] Comprobación cada {} segundos", self.period_ms / 1000);

        let tick = Box::new(move || store.refresh_deadline_alerts(&session));
        self.guard = Some(self.scheduler.every(self.period_ms, tick));
    }

    pub fn stop(&mut self) {
        if self.guard.take().is_some() {
            log::info!("⏰ [DEADLINES] Comprobación detenida");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::ManualScheduler;
    use super::*;
    use crate::models::Ticket;
    use crate::services::fetch_agent::test_support::logged_in_agent;
    use chrono::Utc;
    use uuid::Uuid;

    fn due_today(id: u128, assignee: Uuid) -> Ticket {
        let today = Utc::now().date_naive();
        Ticket {
            id: Uuid::from_u128(id),
            project_id: Uuid::from_u128(100),
            phase_id: None,
            title: format!("T{}", id),
            description: None,
            creation_time: None,
            due_time: today.and_hms_opt(9, 0, 0),
            assignee_ids: vec![assignee],
            priority: None,
        }
    }

    fn watcher_fixture() -> (
        DeadlineWatcher,
        Rc<ManualScheduler>,
        TicketStore,
        SessionContext,
        Uuid,
    ) {
        let (agent, _, _) = logged_in_agent();
        let session = agent.session().clone();
        let me = Uuid::from_u128(42);
        session.set_user_id(me).unwrap();

        let scheduler = Rc::new(ManualScheduler::default());
        let watcher = DeadlineWatcher::new(60_000, scheduler.clone() as Rc<dyn TickScheduler>);
        (watcher, scheduler, TicketStore::new(agent), session, me)
    }

    #[test]
    fn idle_until_started() {
        let (mut watcher, scheduler, _, _, _) = watcher_fixture();
        assert!(!watcher.is_running());
        watcher.stop();
        assert!(!watcher.is_running());
        assert!(!scheduler.is_active());
        assert_eq!(watcher.period_ms(), 60_000);
    }

    #[test]
    fn start_checks_immediately_and_on_each_tick() {
        let (mut watcher, scheduler, store, session, me) = watcher_fixture();
        store.tickets.set(vec![due_today(1, me)]);

        watcher.start(store.clone(), session);
        assert!(watcher.is_running());
        assert!(scheduler.is_active());
        assert_eq!(store.deadline_alerts.get().len(), 1);

        store.tickets.set(vec![due_today(1, me), due_today(2, me)]);
        assert!(scheduler.fire());
        assert_eq!(store.deadline_alerts.get().len(), 2);
    }

    #[test]
    fn stop_cancels_the_tick() {
        let (mut watcher, scheduler, store, session, me) = watcher_fixture();
        watcher.start(store.clone(), session);

        watcher.stop();
        assert!(!watcher.is_running());
        assert!(!scheduler.is_active());

        store.tickets.set(vec![due_today(1, me)]);
        assert!(!scheduler.fire());
        assert!(store.deadline_alerts.get().is_empty());
    }

    #[test]
    fn restart_keeps_a_single_tick() {
        let (mut watcher, scheduler, store, session, _) = watcher_fixture();
        watcher.start(store.clone(), session.clone());
        watcher.start(store, session);

        assert!(watcher.is_running());
        assert!(scheduler.is_active());
    }
}
