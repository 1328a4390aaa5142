use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserPatchData {
    pub name: Option<String>,
    pub email: Option<String>,
}
