//! Stable identifiers for roles, actions, pages and decision codes.
//!
//! Pages and tabs are an open schema owned by the protected resources; the
//! constants here only name the ones the built-in operation catalog uses.

// Canonical roles
pub const ROLE_GUEST: &str = "Guest";
pub const ROLE_STAFF: &str = "Staff";
pub const ROLE_SUPERVISOR: &str = "Supervisor";
pub const ROLE_ADMINISTRATOR: &str = "Administrator";

// Actions
pub const ACTION_VIEW: &str = "view";
pub const ACTION_CREATE: &str = "create";
pub const ACTION_EDIT: &str = "edit";
pub const ACTION_DELETE: &str = "delete";
pub const ACTION_PRINT: &str = "print";
pub const ACTION_APPROVE: &str = "approve";
pub const ACTION_SUBMIT: &str = "submit";

// Pages
pub const PAGE_DOCKETS: &str = "dockets";
pub const PAGE_CUSTOMERS: &str = "customers";
pub const PAGE_TIMESHEETS: &str = "timesheets";
pub const PAGE_SUBMISSIONS: &str = "submissions";
pub const PAGE_JOB_FORMS: &str = "jobForms";

// Tabs
pub const TAB_LIST: &str = "list";
pub const TAB_DETAIL: &str = "detail";
pub const TAB_FORMS: &str = "forms";
pub const TAB_DESIGN_TOOL: &str = "designTool";

// Resource families that may be self-scoped
pub const FAMILY_TIMESHEETS: &str = "timesheets";
pub const FAMILY_SUBMISSIONS: &str = "submissions";
pub const FAMILY_DOCKETS: &str = "dockets";

// Decision codes
pub const CODE_FORBIDDEN: &str = "forbidden";
pub const CODE_UNKNOWN_OPERATION: &str = "unknown_operation";
