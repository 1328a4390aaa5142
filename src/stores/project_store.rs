// ============================================================================
// PROJECT STORE - Proyectos del usuario (vía memberships aceptadas)
// ============================================================================

use uuid::Uuid;

use crate::models::{MembershipState, Project, ProjectPostData};
use crate::services::error::{ApiError, FetchResult};
use crate::services::FetchAgent;
use crate::state::ReactiveState;

#[derive(Clone)]
pub struct ProjectStore {
    agent: FetchAgent,
    pub projects: ReactiveState<Vec<Project>>,
}

impl ProjectStore {
    pub fn new(agent: FetchAgent) -> Self {
        Self {
            agent,
            projects: ReactiveState::new(Vec::new()),
        }
    }

    /// memberships por email → proyectos por id (en orden). Las invitaciones
    /// abiertas no cuentan. En error la cache queda como estaba.
    pub async fn load_projects_for_user(&self, email: &str) -> FetchResult<Vec<Project>> {
        let memberships = self.agent.get_memberships_by_email(email).await?;

        let mut ids: Vec<Uuid> = Vec::new();
        for membership in memberships
            .iter()
            .filter(|m| m.state == MembershipState::Accepted)
        {
            if !ids.contains(&membership.project_id) {
                ids.push(membership.project_id);
            }
        }

        let projects = self.agent.get_multiple_projects_by_ids(&ids).await?;
        log::info!("📁 [PROJECTS] {} proyectos para {}", projects.len(), email);
        self.projects.set(projects.clone());
        Ok(projects)
    }

    async fn reload(&self) -> FetchResult<()> {
        let email = self
            .agent
            .session()
            .user_email()
            .ok_or_else(|| ApiError::validation("Sesión sin email"))?;
        self.load_projects_for_user(&email).await.map(|_| ())
    }

    pub async fn create_project(&self, data: &ProjectPostData) -> FetchResult<()> {
        self.agent.post_project(data).await?;
        if let Err(error) = self.reload().await {
            log::warn!("⚠️ [PROJECTS] Proyecto creado pero sin refresh: {}", error);
        }
        Ok(())
    }

    pub async fn delete_project(&self, project_id: Uuid) -> FetchResult<()> {
        self.agent.delete_project_by_id(project_id).await?;
        if let Err(error) = self.reload().await {
            log::warn!("⚠️ [PROJECTS] Proyecto borrado pero sin refresh: {}", error);
        }
        Ok(())
    }
}
