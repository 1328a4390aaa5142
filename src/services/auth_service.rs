use crate::services::error::{ApiError, ApiErrorKind, FetchResult};
use crate::services::FetchAgent;
use crate::state::SessionContext;

/// Login completo: token → sesión → id de usuario (para los avisos de deadline)
pub async fn sign_in(agent: &FetchAgent, email: &str, password: &str) -> FetchResult<()> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Email y contraseña son obligatorios"));
    }

    let token = agent.post_authentication(email, password).await?;
    agent
        .session()
        .login(&token, email)
        .map_err(ApiError::browser)?;

    // Sin id de usuario la app funciona igual, solo sin avisos de deadline
    match agent.get_user_by_email(email).await {
        Ok(user) => {
            if let Err(e) = agent.session().set_user_id(user.id) {
                log::warn!("⚠️ [AUTH] No se pudo guardar userId: {}", e);
            }
        }
        // Un 401 aquí ya forzó el logout: el login no sigue siendo válido
        Err(error) if error.is_unauthorized() => {
            log::warn!("⚠️ [AUTH] Token rechazado al resolver {}: {}", email, error);
            return Err(error);
        }
        Err(error) => log::warn!("⚠️ [AUTH] No se pudo resolver el usuario {}: {}", email, error),
    }

    if !agent.session().is_logged_in() {
        return Err(ApiError::new(
            ApiErrorKind::Unauthorized,
            "La sesión se cerró durante el login",
        ));
    }

    log::info!("✅ [AUTH] Login correcto: {}", email);
    Ok(())
}

pub fn sign_out(session: &SessionContext) -> bool {
    session.logout()
}
