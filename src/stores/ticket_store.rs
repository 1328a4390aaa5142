// ============================================================================
// TICKET STORE - Cache de tickets por proyecto + avisos de deadline
// ============================================================================
// La cache NO es autoritativa: cada refresh de un proyecto reemplaza por
// completo sus tickets (quitar + insertar, nunca merge).
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{DeadlineAlert, Ticket, TicketPatchData, TicketPostData};
use crate::services::error::FetchResult;
use crate::services::FetchAgent;
use crate::state::{ReactiveState, SessionContext};

#[derive(Clone)]
pub struct TicketStore {
    agent: FetchAgent,
    pub tickets: ReactiveState<Vec<Ticket>>,
    pub deadline_alerts: ReactiveState<Vec<DeadlineAlert>>,
    project_ids: Rc<RefCell<BTreeSet<Uuid>>>,
}

impl TicketStore {
    pub fn new(agent: FetchAgent) -> Self {
        Self {
            agent,
            tickets: ReactiveState::new(Vec::new()),
            deadline_alerts: ReactiveState::new(Vec::new()),
            project_ids: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    pub fn add_project_id(&self, project_id: Uuid) {
        self.project_ids.borrow_mut().insert(project_id);
    }

    pub fn project_ids(&self) -> Vec<Uuid> {
        self.project_ids.borrow().iter().copied().collect()
    }

    /// Lectura síncrona de la cache; nunca llama al backend
    pub fn get_tickets_by_project_id(&self, project_id: Uuid) -> Vec<Ticket> {
        self.tickets.with(|tickets| {
            tickets
                .iter()
                .filter(|t| t.project_id == project_id)
                .cloned()
                .collect()
        })
    }

    /// Refresh autoritativo de un proyecto. En error también se descartan los
    /// tickets viejos del proyecto.
    pub async fn update_tickets_by_project_id(&self, project_id: Uuid) -> FetchResult<Vec<Ticket>> {
        let result = self.agent.get_tickets_by_project_id(project_id).await;

        match &result {
            Ok(fresh) => {
                self.add_project_id(project_id);
                self.tickets.update(|tickets| {
                    tickets.retain(|t| t.project_id != project_id);
                    tickets.extend(fresh.iter().cloned());
                });
                log::info!("🎫 [TICKETS] Proyecto {}: {} tickets", project_id, fresh.len());
            }
            Err(error) => {
                self.tickets
                    .update(|tickets| tickets.retain(|t| t.project_id != project_id));
                log::warn!("⚠️ [TICKETS] Refresh fallido para {}: {}", project_id, error);
            }
        }

        result
    }

    /// Refrescar tras una mutación exitosa; un fallo aquí solo se registra
    async fn refresh_after_mutation(&self, project_id: Uuid) {
        if let Err(error) = self.update_tickets_by_project_id(project_id).await {
            log::warn!("⚠️ [TICKETS] Mutación aplicada pero sin refresh: {}", error);
        }
    }

    pub async fn post_ticket(&self, data: &TicketPostData) -> FetchResult<String> {
        self.agent.post_ticket(data).await?;
        self.refresh_after_mutation(data.project_id).await;
        Ok(format!("Created a new ticket with title: {}", data.title))
    }

    pub async fn patch_ticket(
        &self,
        project_id: Uuid,
        ticket_id: Uuid,
        data: &TicketPatchData,
    ) -> FetchResult<String> {
        self.agent.patch_ticket(ticket_id, data).await?;
        self.refresh_after_mutation(project_id).await;
        Ok(format!("Updated ticket with id: {}", ticket_id))
    }

    pub async fn delete_ticket(&self, project_id: Uuid, ticket_id: Uuid) -> FetchResult<String> {
        self.agent.delete_ticket_by_id(ticket_id).await?;
        self.refresh_after_mutation(project_id).await;
        Ok(format!("Deleted ticket with id: {}", ticket_id))
    }

    /// Drag & drop entre fases: solo cambia `phaseId`
    pub async fn update_ticket_position(
        &self,
        project_id: Uuid,
        ticket_id: Uuid,
        new_phase_id: Uuid,
    ) -> FetchResult<String> {
        self.patch_ticket(project_id, ticket_id, &TicketPatchData::move_to_phase(new_phase_id))
            .await
    }

    /// Recalcular avisos de deadline sobre la cache actual
    pub fn check_deadlines(&self, user_id: Option<Uuid>, today: NaiveDate) {
        let alerts = match user_id {
            Some(user_id) => self
                .tickets
                .with(|tickets| compute_deadline_alerts(tickets, &user_id, today)),
            None => Vec::new(),
        };
        self.deadline_alerts.set(alerts);
    }

    /// Igual que `check_deadlines`, con el usuario de la sesión y la fecha UTC de hoy
    pub fn refresh_deadline_alerts(&self, session: &SessionContext) {
        self.check_deadlines(session.user_id(), Utc::now().date_naive());
    }
}

/// Tickets que vencen `today` y tienen a `user_id` entre sus asignados
pub fn compute_deadline_alerts(
    tickets: &[Ticket],
    user_id: &Uuid,
    today: NaiveDate,
) -> Vec<DeadlineAlert> {
    tickets
        .iter()
        .filter(|t| t.due_time.map(|due| due.date()) == Some(today))
        .filter(|t| t.is_assigned_to(user_id))
        .map(|t| DeadlineAlert {
            ticket_id: t.id,
            message: format!("📌 Today is the deadline for ticket: {}", t.title),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ApiErrorKind;
    use crate::services::fetch_agent::test_support::logged_in_agent;
    use futures::executor::block_on;
    use serde_json::{json, Value};

    fn ticket_json(id: u128, project: Uuid, title: &str) -> Value {
        json!({
            "id": Uuid::from_u128(id),
            "projectId": project,
            "title": title,
            "assigneeIds": []
        })
    }

    fn ticket(id: u128, project: Uuid, due: Option<&str>, assignees: &[Uuid]) -> Ticket {
        Ticket {
            id: Uuid::from_u128(id),
            project_id: project,
            phase_id: None,
            title: format!("T{}", id),
            description: None,
            creation_time: None,
            due_time: due.map(|d| d.parse().unwrap()),
            assignee_ids: assignees.to_vec(),
            priority: None,
        }
    }

    fn route(project: Uuid) -> String {
        format!("GET /tickets?project-id={}", project)
    }

    #[test]
    fn refresh_replaces_project_entries() {
        let (agent, transport, _) = logged_in_agent();
        let store = TicketStore::new(agent);
        let (p, q) = (Uuid::from_u128(100), Uuid::from_u128(200));

        transport.on_json(&route(p), 200, json!([ticket_json(1, p, "a"), ticket_json(2, p, "b")]));
        transport.on_json(&route(p), 200, json!([ticket_json(3, p, "c")]));
        transport.on_json(&route(q), 200, json!([ticket_json(9, q, "other")]));

        block_on(store.update_tickets_by_project_id(q)).unwrap();
        block_on(store.update_tickets_by_project_id(p)).unwrap();
        block_on(store.update_tickets_by_project_id(p)).unwrap();

        let ids: Vec<_> = store.get_tickets_by_project_id(p).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(3)]);
        assert_eq!(store.get_tickets_by_project_id(q).len(), 1);
        assert_eq!(store.project_ids(), vec![p, q]);
    }

    #[test]
    fn failed_refresh_drops_stale_entries() {
        let (agent, transport, _) = logged_in_agent();
        let store = TicketStore::new(agent);
        let p = Uuid::from_u128(100);

        transport.on_json(&route(p), 200, json!([ticket_json(1, p, "a")]));
        transport.on(&route(p), 500, "down");

        block_on(store.update_tickets_by_project_id(p)).unwrap();
        let error = block_on(store.update_tickets_by_project_id(p)).unwrap_err();

        assert_eq!(error.kind, ApiErrorKind::Server);
        assert!(store.get_tickets_by_project_id(p).is_empty());
    }

    #[test]
    fn cached_read_issues_no_request() {
        let (agent, transport, _) = logged_in_agent();
        let store = TicketStore::new(agent);

        assert!(store.get_tickets_by_project_id(Uuid::from_u128(1)).is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn post_ticket_refreshes_owning_project() {
        let (agent, transport, _) = logged_in_agent();
        let store = TicketStore::new(agent);
        let p = Uuid::from_u128(100);
        transport.on("POST /tickets", 201, "");
        transport.on_json(&route(p), 200, json!([ticket_json(1, p, "New printer")]));

        let message = block_on(store.post_ticket(&TicketPostData {
            project_id: p,
            title: "New printer".into(),
            description: "buy one".into(),
            due_time: None,
            assignee_ids: vec![],
            priority: None,
        }))
        .unwrap();

        assert_eq!(message, "Created a new ticket with title: New printer");
        assert_eq!(transport.described(), vec!["POST /tickets".to_string(), route(p)]);
        assert_eq!(store.get_tickets_by_project_id(p).len(), 1);
    }

    #[test]
    fn failed_patch_leaves_cache_untouched() {
        let (agent, transport, _) = logged_in_agent();
        let store = TicketStore::new(agent);
        let p = Uuid::from_u128(100);
        let t = Uuid::from_u128(1);
        transport.on_json(&route(p), 200, json!([ticket_json(1, p, "a")]));
        transport.on(&format!("PATCH /tickets/{}", t), 400, r#"{"message":"invalid phase"}"#);

        block_on(store.update_tickets_by_project_id(p)).unwrap();
        let error = block_on(store.update_ticket_position(p, t, Uuid::from_u128(5))).unwrap_err();

        assert_eq!(error.message, "invalid phase");
        assert_eq!(store.get_tickets_by_project_id(p).len(), 1);
        // Sin refresh posterior al fallo
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn update_position_patches_phase_only() {
        let (agent, transport, _) = logged_in_agent();
        let store = TicketStore::new(agent);
        let (p, t, phase) = (Uuid::from_u128(100), Uuid::from_u128(1), Uuid::from_u128(55));
        transport.on(&format!("PATCH /tickets/{}", t), 200, "");
        transport.on_json(&route(p), 200, json!([]));

        block_on(store.update_ticket_position(p, t, phase)).unwrap();

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["phaseId"], json!(phase));
        assert!(body["title"].is_null());
        assert!(body["description"].is_null());
    }

    #[test]
    fn deadline_alerts_match_today_and_assignee() {
        let me = Uuid::from_u128(42);
        let someone = Uuid::from_u128(43);
        let p = Uuid::from_u128(100);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let tickets = vec![
            ticket(1, p, Some("2026-10-19T09:00:00"), &[me]),
            ticket(2, p, Some("2026-10-19T23:59:00"), &[someone]),
            ticket(3, p, Some("2026-10-20T00:00:00"), &[me]),
            ticket(4, p, None, &[me]),
        ];

        let alerts = compute_deadline_alerts(&tickets, &me, today);
        assert_eq!(
            alerts,
            vec![DeadlineAlert {
                ticket_id: Uuid::from_u128(1),
                message: "📌 Today is the deadline for ticket: T1".into(),
            }]
        );
    }

    #[test]
    fn check_deadlines_without_user_clears_alerts() {
        let (agent, _, _) = logged_in_agent();
        let store = TicketStore::new(agent);
        let me = Uuid::from_u128(42);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        store
            .tickets
            .set(vec![ticket(1, Uuid::from_u128(100), Some("2026-10-19T09:00:00"), &[me])]);

        store.check_deadlines(Some(me), today);
        assert_eq!(store.deadline_alerts.get().len(), 1);

        store.check_deadlines(None, today);
        assert!(store.deadline_alerts.get().is_empty());
    }
}
