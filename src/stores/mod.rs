pub mod analysis_store;
pub mod notification_store;
pub mod project_store;
pub mod ticket_store;

pub use analysis_store::AnalysisStore;
pub use notification_store::NotificationStore;
pub use project_store::ProjectStore;
pub use ticket_store::TicketStore;
