//! Authorization rules: role gates plus the severity-escalation rule.

use super::ReportError;
use crate::models::auth::Role;
use crate::models::report::Severity;

/// Rule-specific message for a blocked critical escalation, distinct from
/// the generic role-gate message.
pub const ESCALATION_FORBIDDEN: &str = "only admins may escalate severity to critical";

/// Role gate: the caller's role must be one of `allowed`.
pub fn require_role(role: Role, allowed: &[Role]) -> Result<(), ReportError> {
    if allowed.contains(&role) {
        return Ok(());
    }
    Err(ReportError::Forbidden(format!(
        "role '{}' may not perform this operation",
        role.as_str()
    )))
}

/// Severity-escalation rule: setting severity to `critical` when the
/// stored value differs is an admin-only transition. Re-submitting an
/// already-critical value is not a transition and always passes.
pub fn check_severity_escalation(
    current: Severity,
    incoming: Severity,
    role: Role,
) -> Result<(), ReportError> {
    if incoming == Severity::Critical && current != Severity::Critical && role != Role::Admin {
        return Err(ReportError::Forbidden(ESCALATION_FORBIDDEN.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_gate_allows_member() {
        assert!(require_role(Role::Admin, &[Role::Admin]).is_ok());
        assert!(require_role(Role::Developer, &[Role::Admin, Role::Developer]).is_ok());
    }

    #[test]
    fn role_gate_rejects_non_member() {
        let err = require_role(Role::Developer, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, ReportError::Forbidden(_)));
    }

    #[test]
    fn developer_cannot_escalate_to_critical() {
        let err = check_severity_escalation(Severity::Low, Severity::Critical, Role::Developer)
            .unwrap_err();
        match err {
            ReportError::Forbidden(msg) => assert_eq!(msg, ESCALATION_FORBIDDEN),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn admin_can_escalate_to_critical() {
        assert!(check_severity_escalation(Severity::Low, Severity::Critical, Role::Admin).is_ok());
    }

    #[test]
    fn resubmitting_critical_is_not_a_transition() {
        assert!(
            check_severity_escalation(Severity::Critical, Severity::Critical, Role::Developer)
                .is_ok()
        );
    }

    #[test]
    fn non_critical_values_are_open_to_both_roles() {
        assert!(check_severity_escalation(Severity::Low, Severity::High, Role::Developer).is_ok());
        assert!(
            check_severity_escalation(Severity::Critical, Severity::Low, Role::Developer).is_ok()
        );
    }
}
