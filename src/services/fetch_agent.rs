// ============================================================================
// FETCH AGENT - Único punto que habla con el backend REST
// ============================================================================
// Toda operación devuelve FetchResult<T>; nunca propaga un panic ni un error
// sin clasificar. Un 401 en cualquier llamada autenticada cierra la sesión.
// ============================================================================

use std::rc::Rc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    AuthenticationRequest, AuthenticationResponse, DateRange, Membership, MembershipPostData,
    MembershipRoleData, MembershipStateData, Notification, NotificationPatchData, Phase,
    PhaseNameData, PhasePostData, PriorityCounts, Project, ProjectPatchData, ProjectPostData,
    RankedUser, Ticket, TicketPatchData, TicketPostData, TicketStats, TopUserEntry, User,
    UserPatchData,
};
use crate::services::error::{ApiError, FetchResult};
use crate::services::http::{HttpRequest, HttpTransport, Method};
use crate::state::SessionContext;
use crate::utils::constants::{
    ANALYSIS_PATH, AUTHENTICATIONS_PATH, MEMBERSHIPS_PATH, NOTIFICATIONS_PATH, PHASES_PATH,
    PROJECTS_PATH, TICKETS_PATH, UNKNOWN_USER_NAME, USERS_PATH,
};

#[derive(Clone)]
pub struct FetchAgent {
    transport: Rc<dyn HttpTransport>,
    session: SessionContext,
}

impl FetchAgent {
    pub fn new(transport: Rc<dyn HttpTransport>, session: SessionContext) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ------------------------------------------------------------------
    // Infraestructura
    // ------------------------------------------------------------------

    /// Request con bearer leído del storage en este momento
    fn authed(&self, method: Method, path: impl Into<String>) -> HttpRequest {
        HttpRequest::new(method, path).bearer(self.session.bearer_token())
    }

    /// Enviar y clasificar, sin efectos laterales
    async fn execute(&self, request: HttpRequest) -> FetchResult<String> {
        match self.transport.send(request).await {
            Ok(response) if response.ok() => Ok(response.body),
            Ok(response) => Err(ApiError::from_status(response.status, &response.body)),
            Err(e) => Err(ApiError::network(e)),
        }
    }

    /// Enviar pasando por el manejador de errores compartido
    async fn send_raw(&self, request: HttpRequest) -> FetchResult<String> {
        let description = request.describe();
        let result = self.execute(request).await;
        if let Err(error) = &result {
            self.handle_error(&description, error);
        }
        result
    }

    async fn send_json<T: DeserializeOwned>(&self, request: HttpRequest) -> FetchResult<T> {
        let description = request.describe();
        let body = self.send_raw(request).await?;
        decode_body(&body).map_err(|error| {
            log::error!("❌ [FETCH] {} -> {}", description, error);
            error
        })
    }

    async fn send_empty(&self, request: HttpRequest) -> FetchResult<()> {
        self.send_raw(request).await.map(|_| ())
    }

    fn handle_error(&self, description: &str, error: &ApiError) {
        log::error!("❌ [FETCH] {} -> {}", description, error);
        if error.is_unauthorized() && self.session.logout() {
            log::warn!("🔒 [FETCH] 401 recibido, sesión invalidada");
        }
    }

    // ------------------------------------------------------------------
    // Autenticación
    // ------------------------------------------------------------------

    /// Login. Un fallo aquí no fuerza logout (todavía no hay sesión).
    pub async fn post_authentication(&self, email: &str, password: &str) -> FetchResult<String> {
        let body = to_body(&AuthenticationRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let request = HttpRequest::new(Method::Post, AUTHENTICATIONS_PATH).json(body);

        let raw = self.execute(request).await.map_err(|error| {
            log::warn!("⚠️ [FETCH] Autenticación rechazada para {}: {}", email, error);
            error
        })?;

        let response: AuthenticationResponse = match decode_body(&raw) {
            Ok(response) => response,
            // Algunos backends devuelven el JWT sin comillas
            Err(_) => AuthenticationResponse::Raw(raw.trim().to_string()),
        };

        let token = response.token().trim();
        if token.is_empty() {
            return Err(ApiError::decode("Respuesta de autenticación sin token"));
        }
        Ok(token.to_string())
    }

    // ------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------

    pub async fn get_memberships_by_email(&self, email: &str) -> FetchResult<Vec<Membership>> {
        self.send_json(self.authed(Method::Get, MEMBERSHIPS_PATH).query("email", email))
            .await
    }

    pub async fn get_memberships_by_project_id(
        &self,
        project_id: Uuid,
    ) -> FetchResult<Vec<Membership>> {
        self.send_json(self.authed(Method::Get, MEMBERSHIPS_PATH).query("project-id", project_id))
            .await
    }

    pub async fn post_membership(&self, data: &MembershipPostData) -> FetchResult<()> {
        let request = self.authed(Method::Post, MEMBERSHIPS_PATH).json(to_body(data)?);
        self.send_empty(request).await
    }

    pub async fn delete_membership_by_id(&self, id: Uuid) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Delete, format!("{}/{}", MEMBERSHIPS_PATH, id)))
            .await
    }

    pub async fn put_membership_state(
        &self,
        membership_id: Uuid,
        data: &MembershipStateData,
    ) -> FetchResult<()> {
        let path = format!("{}/{}/state", MEMBERSHIPS_PATH, membership_id);
        self.send_empty(self.authed(Method::Put, path).json(to_body(data)?))
            .await
    }

    pub async fn put_membership_role(
        &self,
        membership_id: Uuid,
        data: &MembershipRoleData,
    ) -> FetchResult<()> {
        let path = format!("{}/{}/role", MEMBERSHIPS_PATH, membership_id);
        self.send_empty(self.authed(Method::Put, path).json(to_body(data)?))
            .await
    }

    // ------------------------------------------------------------------
    // Fases
    // ------------------------------------------------------------------

    pub async fn get_phases_by_project_id(&self, project_id: Uuid) -> FetchResult<Vec<Phase>> {
        self.send_json(self.authed(Method::Get, PHASES_PATH).query("project-id", project_id))
            .await
    }

    pub async fn post_phase(&self, data: &PhasePostData) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Post, PHASES_PATH).json(to_body(data)?))
            .await
    }

    pub async fn put_phase_name(&self, phase_id: Uuid, data: &PhaseNameData) -> FetchResult<()> {
        let path = format!("{}/{}/name", PHASES_PATH, phase_id);
        self.send_empty(self.authed(Method::Put, path).json(to_body(data)?))
            .await
    }

    pub async fn delete_phase_by_id(&self, id: Uuid) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Delete, format!("{}/{}", PHASES_PATH, id)))
            .await
    }

    // ------------------------------------------------------------------
    // Proyectos
    // ------------------------------------------------------------------

    pub async fn post_project(&self, data: &ProjectPostData) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Post, PROJECTS_PATH).json(to_body(data)?))
            .await
    }

    pub async fn get_project_by_id(&self, id: Uuid) -> FetchResult<Project> {
        self.send_json(self.authed(Method::Get, format!("{}/{}", PROJECTS_PATH, id)))
            .await
    }

    /// Una request por id, en secuencia: el resultado respeta el orden de entrada.
    /// Cualquier fallo invalida el lote completo.
    pub async fn get_multiple_projects_by_ids(&self, ids: &[Uuid]) -> FetchResult<Vec<Project>> {
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            projects.push(self.get_project_by_id(*id).await?);
        }
        Ok(projects)
    }

    pub async fn patch_project_by_id(
        &self,
        project_id: Uuid,
        data: &ProjectPatchData,
    ) -> FetchResult<()> {
        let path = format!("{}/{}", PROJECTS_PATH, project_id);
        self.send_empty(self.authed(Method::Patch, path).json(to_body(data)?))
            .await
    }

    pub async fn delete_project_by_id(&self, id: Uuid) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Delete, format!("{}/{}", PROJECTS_PATH, id)))
            .await
    }

    // ------------------------------------------------------------------
    // Tickets
    // ------------------------------------------------------------------

    pub async fn post_ticket(&self, data: &TicketPostData) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Post, TICKETS_PATH).json(to_body(data)?))
            .await
    }

    pub async fn get_ticket_by_id(&self, id: Uuid) -> FetchResult<Ticket> {
        self.send_json(self.authed(Method::Get, format!("{}/{}", TICKETS_PATH, id)))
            .await
    }

    pub async fn get_tickets_by_project_id(&self, project_id: Uuid) -> FetchResult<Vec<Ticket>> {
        self.send_json(self.authed(Method::Get, TICKETS_PATH).query("project-id", project_id))
            .await
    }

    pub async fn patch_ticket(&self, ticket_id: Uuid, data: &TicketPatchData) -> FetchResult<()> {
        let path = format!("{}/{}", TICKETS_PATH, ticket_id);
        self.send_empty(self.authed(Method::Patch, path).json(to_body(data)?))
            .await
    }

    pub async fn delete_ticket_by_id(&self, id: Uuid) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Delete, format!("{}/{}", TICKETS_PATH, id)))
            .await
    }

    // ------------------------------------------------------------------
    // Usuarios
    // ------------------------------------------------------------------

    pub async fn get_user_by_id(&self, id: Uuid) -> FetchResult<User> {
        self.send_json(self.authed(Method::Get, format!("{}/{}", USERS_PATH, id)))
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> FetchResult<User> {
        self.send_json(self.authed(Method::Get, USERS_PATH).query("email", email))
            .await
    }

    pub async fn patch_user_by_id(&self, user_id: Uuid, data: &UserPatchData) -> FetchResult<()> {
        let path = format!("{}/{}", USERS_PATH, user_id);
        self.send_empty(self.authed(Method::Patch, path).json(to_body(data)?))
            .await
    }

    pub async fn delete_user_by_id(&self, id: Uuid) -> FetchResult<()> {
        self.send_empty(self.authed(Method::Delete, format!("{}/{}", USERS_PATH, id)))
            .await
    }

    // ------------------------------------------------------------------
    // Análisis
    // ------------------------------------------------------------------

    pub async fn get_ticket_stats(&self, range: DateRange) -> FetchResult<TicketStats> {
        let mut request = self.authed(Method::Get, format!("{}/ticket-stats", ANALYSIS_PATH));
        if let Some(start) = range.start {
            request = request.query("startDate", start);
        }
        if let Some(end) = range.end {
            request = request.query("endDate", end);
        }
        self.send_json(request).await
    }

    /// Ranking + resolución de nombre por usuario. Un nombre que no se puede
    /// resolver se reemplaza por `Unknown User` sin invalidar el ranking.
    pub async fn get_top_users(&self) -> FetchResult<Vec<RankedUser>> {
        let entries: Vec<TopUserEntry> = self
            .send_json(self.authed(Method::Get, format!("{}/top-users", ANALYSIS_PATH)))
            .await?;

        // join_all conserva el orden de entrada
        let ranked = join_all(entries.iter().map(|entry| self.resolve_ranked_user(entry))).await;
        Ok(ranked)
    }

    async fn resolve_ranked_user(&self, entry: &TopUserEntry) -> RankedUser {
        let request = self.authed(Method::Get, format!("{}/{}", USERS_PATH, entry.user_id));
        let user_name = match self.execute(request).await.and_then(|b| decode_body::<User>(&b)) {
            Ok(user) => user.name,
            Err(error) => {
                log::warn!("⚠️ [FETCH] No se pudo resolver usuario {}: {}", entry.user_id, error);
                UNKNOWN_USER_NAME.to_string()
            }
        };
        RankedUser {
            user_name,
            ticket_count: entry.ticket_count,
        }
    }

    pub async fn get_ticket_stats_by_priority(&self) -> FetchResult<PriorityCounts> {
        self.send_json(self.authed(Method::Get, format!("{}/priority-stats", ANALYSIS_PATH)))
            .await
    }

    /// CSV crudo tal como lo genera el servidor
    pub async fn export_csv(&self) -> FetchResult<String> {
        self.send_raw(self.authed(Method::Get, format!("{}/export-csv", ANALYSIS_PATH)))
            .await
    }

    // ------------------------------------------------------------------
    // Notificaciones
    // ------------------------------------------------------------------

    pub async fn get_notifications(&self, email: &str) -> FetchResult<Vec<Notification>> {
        if email.trim().is_empty() {
            let error = ApiError::validation("Email parameter is required for /notifications");
            log::error!("❌ [FETCH] {}", error);
            return Err(error);
        }
        self.send_json(self.authed(Method::Get, NOTIFICATIONS_PATH).query("email", email))
            .await
    }

    pub async fn patch_notification(
        &self,
        notification_id: Uuid,
        data: &NotificationPatchData,
    ) -> FetchResult<()> {
        let path = format!("{}/{}", NOTIFICATIONS_PATH, notification_id);
        self.send_empty(self.authed(Method::Patch, path).json(to_body(data)?))
            .await
    }
}

fn to_body<T: Serialize>(data: &T) -> FetchResult<Value> {
    serde_json::to_value(data)
        .map_err(|e| ApiError::validation(format!("Serialization error: {}", e)))
}

/// Cuerpo vacío se interpreta como `null`
fn decode_body<T: DeserializeOwned>(body: &str) -> FetchResult<T> {
    let source = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(source).map_err(|e| ApiError::decode(format!("Parse error: {}", e)))
}
