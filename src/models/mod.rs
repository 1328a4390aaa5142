pub mod analysis;
pub mod auth;
pub mod membership;
pub mod notification;
pub mod project;
pub mod ticket;
pub mod user;

pub use analysis::{
    BreakdownSource, DateRange, PriorityBreakdown, PriorityCounts, RankedUser, TicketStats,
    TopUserEntry,
};
pub use auth::{AuthenticationRequest, AuthenticationResponse};
pub use membership::{
    Membership, MembershipPostData, MembershipRole, MembershipRoleData, MembershipState,
    MembershipStateData,
};
pub use notification::{DeadlineAlert, Notification, NotificationPatchData};
pub use project::{Phase, PhaseNameData, PhasePostData, Project, ProjectPatchData, ProjectPostData};
pub use ticket::{Ticket, TicketPatchData, TicketPostData, TicketPriority};
pub use user::{User, UserPatchData};
