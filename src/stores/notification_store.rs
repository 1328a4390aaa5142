// ============================================================================
// NOTIFICATION STORE - Notificaciones del servidor por email del usuario
// ============================================================================

use uuid::Uuid;

use crate::models::{Notification, NotificationPatchData};
use crate::services::error::FetchResult;
use crate::services::FetchAgent;
use crate::state::ReactiveState;

#[derive(Clone)]
pub struct NotificationStore {
    agent: FetchAgent,
    pub notifications: ReactiveState<Vec<Notification>>,
}

impl NotificationStore {
    pub fn new(agent: FetchAgent) -> Self {
        Self {
            agent,
            notifications: ReactiveState::new(Vec::new()),
        }
    }

    /// Reemplaza la cache con lo que devuelve el servidor. Sin email en la
    /// sesión no se hace ninguna request.
    pub async fn fetch_notifications(&self) -> FetchResult<()> {
        let Some(email) = self.agent.session().user_email() else {
            log::warn!("⚠️ [NOTIFICATIONS] Sesión sin email, no se piden notificaciones");
            return Ok(());
        };

        let fetched = self.agent.get_notifications(&email).await?;
        log::info!("🔔 [NOTIFICATIONS] {} notificaciones para {}", fetched.len(), email);
        self.notifications.set(fetched);
        Ok(())
    }

    /// Sin parche optimista: si el servidor confirma, se vacía y se vuelve a pedir
    pub async fn mark_as_read(&self, notification_id: Uuid) -> FetchResult<()> {
        self.agent
            .patch_notification(notification_id, &NotificationPatchData { is_read: true })
            .await?;

        self.notifications.set(Vec::new());
        self.fetch_notifications().await
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .with(|items| items.iter().filter(|n| !n.is_read).count())
    }
}
