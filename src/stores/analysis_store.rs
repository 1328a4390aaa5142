// ============================================================================
// ANALYSIS STORE - Agregados del dashboard + exportación CSV
// ============================================================================

use crate::config::CONFIG;
use crate::models::{
    BreakdownSource, DateRange, PriorityBreakdown, PriorityCounts, RankedUser, Ticket,
    TicketPriority, TicketStats,
};
use crate::services::csv_export::transform_export;
use crate::services::download::FileSink;
use crate::services::error::FetchResult;
use crate::services::FetchAgent;
use crate::state::ReactiveState;
use crate::stores::TicketStore;

#[derive(Clone)]
pub struct AnalysisStore {
    agent: FetchAgent,
    ticket_store: TicketStore,
    export_file_name: String,
    pub ticket_stats: ReactiveState<TicketStats>,
    pub top_users: ReactiveState<Vec<RankedUser>>,
    pub priority_breakdown: ReactiveState<Option<PriorityBreakdown>>,
}

impl AnalysisStore {
    pub fn new(agent: FetchAgent, ticket_store: TicketStore) -> Self {
        Self::with_export_file_name(agent, ticket_store, CONFIG.export_file_name.clone())
    }

    pub fn with_export_file_name(
        agent: FetchAgent,
        ticket_store: TicketStore,
        export_file_name: String,
    ) -> Self {
        Self {
            agent,
            ticket_store,
            export_file_name,
            ticket_stats: ReactiveState::new(TicketStats::default()),
            top_users: ReactiveState::new(Vec::new()),
            priority_breakdown: ReactiveState::new(None),
        }
    }

    pub async fn get_ticket_stats(&self, range: DateRange) -> FetchResult<TicketStats> {
        let stats = self.agent.get_ticket_stats(range).await?;
        self.ticket_stats.set(stats.clone());
        Ok(stats)
    }

    pub async fn get_top_users(&self) -> FetchResult<Vec<RankedUser>> {
        let users = self.agent.get_top_users().await?;
        self.top_users.set(users.clone());
        Ok(users)
    }

    /// Conteo por prioridad. Si el agregado del servidor no está disponible se
    /// recalcula con los tickets ya cacheados.
    pub async fn get_priority_breakdown(&self) -> FetchResult<PriorityBreakdown> {
        let breakdown = match self.agent.get_ticket_stats_by_priority().await {
            Ok(counts) => PriorityBreakdown {
                counts: normalize_keys(counts),
                source: BreakdownSource::Server,
            },
            Err(error) => {
                log::warn!(
                    "⚠️ [ANALYSIS] priority-stats no disponible ({}), recalculando localmente",
                    error
                );
                let counts = self
                    .ticket_store
                    .tickets
                    .with(|tickets| compute_priority_counts(tickets));
                PriorityBreakdown {
                    counts,
                    source: BreakdownSource::LocalFallback,
                }
            }
        };

        self.priority_breakdown.set(Some(breakdown.clone()));
        Ok(breakdown)
    }

    /// fetch → parse → re-formato → descarga. Los errores se avisan al usuario.
    pub async fn export_csv(&self, sink: &dyn FileSink) -> FetchResult<()> {
        match self.run_export(sink).await {
            Ok(()) => Ok(()),
            Err(error) => {
                log::error!("❌ [ANALYSIS] Error exporting CSV: {}", error);
                sink.alert(&format!("Error exporting CSV: {}", error.message));
                Err(error)
            }
        }
    }

    async fn run_export(&self, sink: &dyn FileSink) -> FetchResult<()> {
        let raw = self.agent.export_csv().await?;
        let summary = transform_export(&raw)?;
        sink.save(&self.export_file_name, "text/csv", &summary)
    }
}

/// Prioridades desconocidas o ausentes cuentan como la categoría neutra
pub fn compute_priority_counts(tickets: &[Ticket]) -> PriorityCounts {
    let mut counts = PriorityCounts::new();
    for ticket in tickets {
        let priority = match ticket.priority_level() {
            Some(priority) => priority,
            None => {
                log::warn!(
                    "⚠️ [ANALYSIS] Ticket {} con prioridad {:?}, se cuenta como {}",
                    ticket.id,
                    ticket.priority,
                    TicketPriority::NEUTRAL
                );
                TicketPriority::NEUTRAL
            }
        };
        *counts.entry(priority.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

fn normalize_keys(counts: PriorityCounts) -> PriorityCounts {
    let mut normalized = PriorityCounts::new();
    for (key, count) in counts {
        *normalized.entry(key.to_ascii_uppercase()).or_insert(0) += count;
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::download::mock::RecordingSink;
    use crate::services::error::ApiErrorKind;
    use crate::services::fetch_agent::test_support::logged_in_agent;
    use futures::executor::block_on;
    use serde_json::json;
    use uuid::Uuid;

    fn store() -> (AnalysisStore, std::rc::Rc<crate::services::http::mock::MockTransport>) {
        let (agent, transport, _) = logged_in_agent();
        let tickets = TicketStore::new(agent.clone());
        let store =
            AnalysisStore::with_export_file_name(agent, tickets, "ticket_summary.csv".to_string());
        (store, transport)
    }

    fn ticket(id: u128, priority: Option<&str>) -> Ticket {
        Ticket {
            id: Uuid::from_u128(id),
            project_id: Uuid::from_u128(100),
            phase_id: None,
            title: format!("T{}", id),
            description: None,
            creation_time: None,
            due_time: None,
            assignee_ids: vec![],
            priority: priority.map(str::to_string),
        }
    }

    #[test]
    fn priority_fallback_counts_cached_tickets() {
        let (store, transport) = store();
        transport.on("GET /api/analysis/priority-stats", 503, "");
        store.ticket_store.tickets.set(vec![
            ticket(1, Some("HIGH")),
            ticket(2, Some("high")),
            ticket(3, Some("whatever")),
        ]);

        let breakdown = block_on(store.get_priority_breakdown()).unwrap();

        assert_eq!(breakdown.source, BreakdownSource::LocalFallback);
        let expected: PriorityCounts =
            [("HIGH".to_string(), 2), ("MEDIUM".to_string(), 1)].into_iter().collect();
        assert_eq!(breakdown.counts, expected);
        assert_eq!(store.priority_breakdown.get(), Some(breakdown));
    }

    #[test]
    fn missing_priority_defaults_to_medium() {
        let counts = compute_priority_counts(&[ticket(1, None), ticket(2, Some("LOW"))]);
        assert_eq!(counts.get("MEDIUM"), Some(&1));
        assert_eq!(counts.get("LOW"), Some(&1));
    }

    #[test]
    fn server_breakdown_wins_when_available() {
        let (store, transport) = store();
        transport.on_json(
            "GET /api/analysis/priority-stats",
            200,
            json!({ "URGENT": 1, "low": 4 }),
        );

        let breakdown = block_on(store.get_priority_breakdown()).unwrap();
        assert_eq!(breakdown.source, BreakdownSource::Server);
        assert_eq!(breakdown.counts.get("LOW"), Some(&4));
        assert_eq!(breakdown.counts.get("URGENT"), Some(&1));
    }

    #[test]
    fn stats_failure_keeps_previous_value() {
        let (store, transport) = store();
        transport.on_json("GET /api/analysis/ticket-stats", 200, json!({ "totalTickets": 9 }));
        transport.on("GET /api/analysis/ticket-stats", 500, "");

        block_on(store.get_ticket_stats(DateRange::default())).unwrap();
        assert!(block_on(store.get_ticket_stats(DateRange::default())).is_err());
        assert_eq!(store.ticket_stats.get().total_tickets, 9);
    }

    #[test]
    fn export_downloads_reformatted_csv() {
        let (store, transport) = store();
        transport.on(
            "GET /api/analysis/export-csv",
            200,
            "Title,Assignee Name,Phase,Priority,Created At,Resolved At\n\
             Printer,Ana,DONE,HIGH,2026-10-01,2026-10-02\n\
             VPN,,OPEN,LOW,2026-10-03,\n",
        );
        let sink = RecordingSink::default();

        block_on(store.export_csv(&sink)).unwrap();

        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 1);
        let (name, content) = &saved[0];
        assert_eq!(name, "ticket_summary.csv");
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains(r#""Unassigned","VPN","OPEN","LOW","2026-10-03","Not Resolved""#));
        assert!(sink.alerts.borrow().is_empty());
    }

    #[test]
    fn export_failure_alerts_user() {
        let (store, transport) = store();
        transport.on("GET /api/analysis/export-csv", 500, "disk full");
        let sink = RecordingSink::default();

        let error = block_on(store.export_csv(&sink)).unwrap_err();

        assert_eq!(error.kind, ApiErrorKind::Server);
        assert!(sink.saved.borrow().is_empty());
        assert_eq!(
            *sink.alerts.borrow(),
            vec!["Error exporting CSV: disk full".to_string()]
        );
    }
}
