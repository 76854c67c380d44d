use crate::ownership::OwnershipGuard;
use crate::roles::Role;
use permatrix_types::ids;

pub fn guest() -> Role {
    Role::guest()
}

pub fn staff() -> Role {
    Role::new(ids::ROLE_STAFF)
}

pub fn supervisor() -> Role {
    Role::new(ids::ROLE_SUPERVISOR)
}

pub fn self_scoped_timesheets() -> OwnershipGuard {
    OwnershipGuard::new().with_self_scoped(ids::FAMILY_TIMESHEETS, staff())
}
