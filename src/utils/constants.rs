// Claves de storage compartidas con el resto del front-end
pub const TOKEN_STORAGE_KEY: &str = "jwt";
pub const USER_ID_STORAGE_KEY: &str = "userId";
pub const EMAIL_STORAGE_KEY: &str = "email";

// Rutas REST (relativas a la URL del backend)
pub const AUTHENTICATIONS_PATH: &str = "/authentications";
pub const MEMBERSHIPS_PATH: &str = "/memberships";
pub const PHASES_PATH: &str = "/phases";
pub const PROJECTS_PATH: &str = "/projects";
pub const TICKETS_PATH: &str = "/tickets";
pub const USERS_PATH: &str = "/users";
pub const NOTIFICATIONS_PATH: &str = "/notifications";
pub const ANALYSIS_PATH: &str = "/api/analysis";

/// Nombre mostrado cuando no se puede resolver un usuario del ranking
pub const UNKNOWN_USER_NAME: &str = "Unknown User";
