use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Totales del dashboard (`/api/analysis/ticket-stats`)
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketStats {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub resolved_tickets: u64,
    pub avg_resolution_time: f64,
    pub overdue_tickets: u64,
    #[serde(rename = "Ticketsduein24")]
    pub tickets_due_in_24h: u64,
    pub unassigned_tickets: u64,
    pub urgent_tickets: u64,
}

/// Rango opcional para las estadísticas
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Entrada del ranking tal como llega del servidor
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TopUserEntry {
    pub user_id: Uuid,
    pub ticket_count: u64,
}

/// Entrada del ranking con el nombre ya resuelto
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub user_name: String,
    pub ticket_count: u64,
}

/// Conteo por prioridad, claves en mayúsculas ("HIGH")
pub type PriorityCounts = BTreeMap<String, u64>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BreakdownSource {
    Server,
    LocalFallback,
}

#[derive(Clone, PartialEq, Debug)]
pub struct PriorityBreakdown {
    pub counts: PriorityCounts,
    pub source: BreakdownSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_tolerate_missing_fields() {
        let stats: TicketStats =
            serde_json::from_str(r#"{"totalTickets": 12, "Ticketsduein24": 2}"#).unwrap();
        assert_eq!(stats.total_tickets, 12);
        assert_eq!(stats.tickets_due_in_24h, 2);
        assert_eq!(stats.resolved_tickets, 0);
    }
}
