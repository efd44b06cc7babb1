//! Roles, the capability table, and the project scope filter.
//!
//! Authorization is decided in exactly two places:
//!
//! - [`Role::can`] answers "may this role perform this action at all", via a
//!   static role -> capability table.
//! - [`ProjectScope`] answers "which projects may this user see". Every
//!   project-scoped query takes a scope; there is no other way to build the
//!   manager filter. Finance documents use [`ProjectScope::for_ledger`].

use crate::error::CoreError;
use crate::status::define_string_enum;
use crate::types::DbId;

define_string_enum! {
    /// User role. The labels match the values issued in access tokens.
    Role("role") {
        Admin = "Admin",
        ProjectManager = "Project Manager",
        TeamMember = "Team Member",
        Finance = "Finance",
    }
}

define_string_enum! {
    /// An action gated by role.
    Capability("capability") {
        /// PM dashboard, analytics, project listing and detail.
        ViewPmDashboard = "view_pm_dashboard",
        /// Create, edit and delete projects.
        ManageProjects = "manage_projects",
        /// Create and edit tasks on managed projects, reorder the board.
        ManageTasks = "manage_tasks",
        LogTime = "log_time",
        ManageExpenses = "manage_expenses",
        ApproveExpenses = "approve_expenses",
        /// Billing records and linked documents.
        ManageBilling = "manage_billing",
        /// Team member views: own projects and assigned tasks.
        ViewTeamWork = "view_team_work",
        CreateOwnTasks = "create_own_tasks",
        ViewFinance = "view_finance",
        /// Create finance documents and move them to Confirmed/Approved.
        ManageFinanceDocuments = "manage_finance_documents",
        /// Mark finance documents Paid.
        SettleFinanceDocuments = "settle_finance_documents",
    }
}

const PROJECT_MANAGER_CAPABILITIES: &[Capability] = &[
    Capability::ViewPmDashboard,
    Capability::ManageProjects,
    Capability::ManageTasks,
    Capability::LogTime,
    Capability::ManageExpenses,
    Capability::ApproveExpenses,
    Capability::ManageBilling,
    Capability::ViewTeamWork,
    Capability::CreateOwnTasks,
    Capability::ViewFinance,
];

const TEAM_MEMBER_CAPABILITIES: &[Capability] =
    &[Capability::ViewTeamWork, Capability::CreateOwnTasks];

const FINANCE_CAPABILITIES: &[Capability] = &[
    Capability::ViewTeamWork,
    Capability::CreateOwnTasks,
    Capability::ViewFinance,
    Capability::ManageFinanceDocuments,
    Capability::SettleFinanceDocuments,
];

impl Role {
    /// The capabilities granted to this role.
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Admin => Capability::ALL,
            Role::ProjectManager => PROJECT_MANAGER_CAPABILITIES,
            Role::TeamMember => TEAM_MEMBER_CAPABILITIES,
            Role::Finance => FINANCE_CAPABILITIES,
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// `Ok(())` if the role holds `capability`, otherwise `Forbidden`.
    pub fn authorize(self, capability: Capability) -> Result<(), CoreError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{self}' is not permitted to {}",
                capability.as_str().replace('_', " ")
            )))
        }
    }
}

/// Which projects a user may see.
///
/// Admins see every project; everyone else only the projects they manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    All,
    ManagedBy(DbId),
}

impl ProjectScope {
    pub fn for_user(user_id: DbId, role: Role) -> Self {
        match role {
            Role::Admin => ProjectScope::All,
            _ => ProjectScope::ManagedBy(user_id),
        }
    }

    /// Scope for finance documents and ledger aggregates.
    ///
    /// Finance staff keep the whole ledger in view; a project manager only
    /// sees documents booked against projects they manage.
    pub fn for_ledger(user_id: DbId, role: Role) -> Self {
        match role {
            Role::Admin | Role::Finance => ProjectScope::All,
            _ => ProjectScope::ManagedBy(user_id),
        }
    }

    /// The manager id to filter on, or `None` for an unrestricted scope.
    ///
    /// Repositories bind this as a nullable parameter in
    /// `($n::BIGINT IS NULL OR p.manager_id = $n)`.
    pub fn manager_filter(self) -> Option<DbId> {
        match self {
            ProjectScope::All => None,
            ProjectScope::ManagedBy(id) => Some(id),
        }
    }

    pub fn permits(self, manager_id: DbId) -> bool {
        match self {
            ProjectScope::All => true,
            ProjectScope::ManagedBy(id) => id == manager_id,
        }
    }

    /// `Ok(())` if a project managed by `manager_id` is inside the scope.
    pub fn ensure_permits(self, manager_id: DbId) -> Result<(), CoreError> {
        if self.permits(manager_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Project is not managed by the current user".into(),
            ))
        }
    }
}
