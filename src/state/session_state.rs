// ============================================================================
// SESSION STATE - Contexto de sesión explícito (token + email + user id)
// ============================================================================
// El token NO se cachea en memoria: se lee del storage en cada llamada
// ============================================================================

use std::rc::Rc;

use uuid::Uuid;

use crate::state::reactivity::ReactiveState;
use crate::utils::constants::{EMAIL_STORAGE_KEY, TOKEN_STORAGE_KEY, USER_ID_STORAGE_KEY};
use crate::utils::storage::KeyValueStorage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticated { user_email: Option<String> },
}

/// Contexto de sesión compartido (clone = misma sesión)
#[derive(Clone)]
pub struct SessionContext {
    storage: Rc<dyn KeyValueStorage>,
    status: ReactiveState<SessionStatus>,
}

impl SessionContext {
    /// Crear contexto restaurando la sesión desde storage si hay token
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        let status = match storage.get(TOKEN_STORAGE_KEY) {
            Some(token) if !token.is_empty() => {
                let user_email = storage.get(EMAIL_STORAGE_KEY);
                log::info!("💾 [SESSION] Sesión restaurada desde storage ({:?})", user_email);
                SessionStatus::Authenticated { user_email }
            }
            _ => SessionStatus::Unauthenticated,
        };

        Self {
            storage,
            status: ReactiveState::new(status),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.status.with(|s| matches!(s, SessionStatus::Authenticated { .. }))
    }

    pub fn user_email(&self) -> Option<String> {
        self.status.with(|s| match s {
            SessionStatus::Authenticated { user_email } => user_email.clone(),
            SessionStatus::Unauthenticated => None,
        })
    }

    /// Token actual, leído del storage en cada llamada
    pub fn bearer_token(&self) -> Option<String> {
        self.storage
            .get(TOKEN_STORAGE_KEY)
            .filter(|token| !token.is_empty())
    }

    /// Id del usuario actual (filtrado de deadlines)
    pub fn user_id(&self) -> Option<Uuid> {
        let raw = self.storage.get(USER_ID_STORAGE_KEY)?;
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("⚠️ [SESSION] userId inválido en storage '{}': {}", raw, e);
                None
            }
        }
    }

    pub fn set_user_id(&self, user_id: Uuid) -> Result<(), String> {
        self.storage.set(USER_ID_STORAGE_KEY, &user_id.to_string())
    }

    /// Unauthenticated → Authenticated
    pub fn login(&self, token: &str, user_email: &str) -> Result<(), String> {
        if token.is_empty() {
            return Err("Token vacío".to_string());
        }
        // El userId de una sesión anterior no vale para este usuario
        self.storage.remove(USER_ID_STORAGE_KEY);
        self.storage.set(TOKEN_STORAGE_KEY, token)?;
        self.storage.set(EMAIL_STORAGE_KEY, user_email)?;

        log::info!("🔐 [SESSION] Sesión iniciada para {}", user_email);
        self.status.set(SessionStatus::Authenticated {
            user_email: Some(user_email.to_string()),
        });
        Ok(())
    }

    /// Authenticated → Unauthenticated. Devuelve `true` solo si hubo transición,
    /// así varios 401 simultáneos producen un único logout.
    pub fn logout(&self) -> bool {
        if !self.is_logged_in() {
            return false;
        }

        self.storage.remove(TOKEN_STORAGE_KEY);
        self.storage.remove(USER_ID_STORAGE_KEY);
        self.storage.remove(EMAIL_STORAGE_KEY);

        log::info!("🚪 [SESSION] Sesión cerrada");
        self.status.set(SessionStatus::Unauthenticated);
        true
    }

    /// Suscribirse a cambios de estado de sesión
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.status.subscribe(callback);
    }
}
