//! Network messages - communication between App and Network layers

use crate::models::{NewStudent, Student, StudentDraft, StudentId};

/// The four API operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the full student list
    ListStudents { id: u64 },
    /// Create a student from the form fields
    CreateStudent { id: u64, student: NewStudent },
    /// Update the editable fields of a student
    UpdateStudent {
        id: u64,
        student_id: StudentId,
        draft: StudentDraft,
    },
    /// Delete a student
    DeleteStudent { id: u64, student_id: StudentId },
    /// Shutdown the network actor, aborting in-flight requests
    Shutdown,
}

impl NetworkCommand {
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::ListStudents { id }
            | NetworkCommand::CreateStudent { id, .. }
            | NetworkCommand::UpdateStudent { id, .. }
            | NetworkCommand::DeleteStudent { id, .. } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Full list fetched
    StudentsLoaded {
        id: u64,
        students: Vec<Student>,
        time_ms: u64,
    },
    /// Create, update or delete accepted by the server
    MutationSucceeded {
        id: u64,
        operation: Operation,
        time_ms: u64,
    },
    /// Any operation failed (transport, status or decode)
    Failed {
        id: u64,
        operation: Operation,
        message: String,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::StudentsLoaded { id, .. } => *id,
            NetworkResponse::MutationSucceeded { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }

    /// The operation this response answers
    pub fn operation(&self) -> Operation {
        match self {
            NetworkResponse::StudentsLoaded { .. } => Operation::List,
            NetworkResponse::MutationSucceeded { operation, .. } => *operation,
            NetworkResponse::Failed { operation, .. } => *operation,
        }
    }
}
