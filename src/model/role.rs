#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Supervisor = 3,
    Employee = 4,
    /// Machine account for the external attendance-capture process.
    System = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Supervisor),
            4 => Some(Role::Employee),
            5 => Some(Role::System),
            _ => None,
        }
    }
}
