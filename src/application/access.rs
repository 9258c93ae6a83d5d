//! Capability table: which caller role may invoke which operation.
//!
//! Authorization itself (who the caller is) belongs to the platform's
//! identity service; this core only consumes the resolved role at the
//! transport boundary. One table instead of per-endpoint checks.

use crate::domain::{DomainError, DomainResult};

/// Resolved caller role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Client,
    Manager,
}

impl CallerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Manager => "manager",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "manager" => Ok(Self::Manager),
            other => Err(DomainError::Validation(format!(
                "unknown caller role '{other}'"
            ))),
        }
    }
}

/// Operations of the scheduling façade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    QueryAvailability,
    ListTechnicianSlots,
    CreateSlot,
    GenerateSlots,
    DeleteSlot,
    ReserveSlot,
    ReleaseSlot,
    CreateRequest,
    ViewRequest,
    ListRequests,
    ListOwnRequests,
    ProcessRequest,
    CancelRequest,
}

/// Single capability check consumed by the HTTP façade.
///
/// Clients create and cancel their own requests and read availability;
/// managers additionally manage slots and process requests.
pub fn is_allowed(operation: Operation, role: CallerRole) -> bool {
    use Operation::*;

    match role {
        CallerRole::Manager => true,
        CallerRole::Client => matches!(
            operation,
            QueryAvailability
                | ListTechnicianSlots
                | CreateRequest
                | ViewRequest
                | ListOwnRequests
                | CancelRequest
        ),
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managers_may_do_everything() {
        for op in [
            Operation::QueryAvailability,
            Operation::CreateSlot,
            Operation::GenerateSlots,
            Operation::DeleteSlot,
            Operation::ReserveSlot,
            Operation::ReleaseSlot,
            Operation::ProcessRequest,
            Operation::ListRequests,
        ] {
            assert!(is_allowed(op, CallerRole::Manager));
        }
    }

    #[test]
    fn clients_book_and_read_only() {
        assert!(is_allowed(Operation::QueryAvailability, CallerRole::Client));
        assert!(is_allowed(Operation::CreateRequest, CallerRole::Client));
        assert!(is_allowed(Operation::CancelRequest, CallerRole::Client));
        assert!(is_allowed(Operation::ListOwnRequests, CallerRole::Client));

        assert!(!is_allowed(Operation::CreateSlot, CallerRole::Client));
        assert!(!is_allowed(Operation::GenerateSlots, CallerRole::Client));
        assert!(!is_allowed(Operation::DeleteSlot, CallerRole::Client));
        assert!(!is_allowed(Operation::ReserveSlot, CallerRole::Client));
        assert!(!is_allowed(Operation::ProcessRequest, CallerRole::Client));
        assert!(!is_allowed(Operation::ListRequests, CallerRole::Client));
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(CallerRole::parse("Manager").unwrap(), CallerRole::Manager);
        assert_eq!(CallerRole::parse("CLIENT").unwrap(), CallerRole::Client);
        assert!(CallerRole::parse("technicien").is_err());
    }
}
