use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notificación persistida en el servidor (por email del destinatario)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(alias = "content")]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub related_ticket_id: Option<Uuid>,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    #[serde(default)]
    pub creation_time: Option<NaiveDateTime>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatchData {
    pub is_read: bool,
}

/// Aviso local de deadline (no viene del servidor)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineAlert {
    pub ticket_id: Uuid,
    pub message: String,
}
