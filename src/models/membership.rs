use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub enum MembershipRole {
    Admin,
    Member,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub enum MembershipState {
    Open,
    Accepted,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub state: MembershipState,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPostData {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct MembershipStateData {
    pub state: MembershipState,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct MembershipRoleData {
    pub role: MembershipRole,
}
