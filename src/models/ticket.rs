use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prioridad de ticket. En el wire llega en minúsculas ("high"), se acepta
/// cualquier capitalización.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketPriority {
    Urgent,
    High,
    Medium,
    Low,
}

impl TicketPriority {
    /// Categoría neutra para prioridades ausentes o desconocidas
    pub const NEUTRAL: TicketPriority = TicketPriority::Medium;

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "URGENT" => Some(Self::Urgent),
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub project_id: Uuid,
    #[serde(default)]
    pub phase_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creation_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub due_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
    // Se guarda crudo: el backend puede devolver valores que no conocemos
    #[serde(default)]
    pub priority: Option<String>,
}

impl Ticket {
    pub fn priority_level(&self) -> Option<TicketPriority> {
        self.priority.as_deref().and_then(TicketPriority::parse)
    }

    pub fn is_assigned_to(&self, user_id: &Uuid) -> bool {
        self.assignee_ids.contains(user_id)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TicketPostData {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_time: Option<NaiveDateTime>,
    pub assignee_ids: Vec<Uuid>,
    pub priority: Option<TicketPriority>,
}

/// PATCH parcial: `None` se envía como `null` = "sin cambios"
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatchData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_time: Option<NaiveDateTime>,
    pub phase_id: Option<Uuid>,
    pub assignee_ids: Option<Vec<Uuid>>,
    pub priority: Option<TicketPriority>,
}

impl TicketPatchData {
    /// Solo mover de fase (drag & drop entre columnas)
    pub fn move_to_phase(phase_id: Uuid) -> Self {
        Self {
            phase_id: Some(phase_id),
            ..Self::default()
        }
    }
}
