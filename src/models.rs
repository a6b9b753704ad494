use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Server-assigned student identifier.
///
/// The backend may hand ids out as JSON numbers or strings, so the raw
/// text is kept and only ever used as an opaque path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        StudentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StudentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StudentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(StudentId(s)),
            serde_json::Value::Number(n) => Ok(StudentId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "student id must be a string or number, got {}",
                other
            ))),
        }
    }
}

/// Accepts strings, numbers and null/missing values as text
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, got {}",
            other
        ))),
    }
}

/// A student record as returned by the list endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub second_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub surnames: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub program_id: String,
    /// Program display name, populated by the server
    #[serde(default, deserialize_with = "lenient_string")]
    pub programa: String,
    /// Faculty display name, populated by the server
    #[serde(default, deserialize_with = "lenient_string")]
    pub facultad: String,
}

/// The editable fields of a student record.
///
/// Used both as the creation form and as the edit draft. When serialized
/// it is exactly the create/update payload, so `id`, `programa` and
/// `facultad` can never leak into a request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub first_name: String,
    pub second_name: String,
    pub surnames: String,
    pub program_id: String,
}

/// Creation form contents (no id yet)
pub type NewStudent = StudentFields;

/// Working copy of a student's editable fields while the edit dialog is open
pub type StudentDraft = StudentFields;

impl StudentFields {
    pub fn get(&self, field: StudentField) -> &str {
        match field {
            StudentField::FirstName => &self.first_name,
            StudentField::SecondName => &self.second_name,
            StudentField::Surnames => &self.surnames,
            StudentField::ProgramId => &self.program_id,
        }
    }

    pub fn get_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::FirstName => &mut self.first_name,
            StudentField::SecondName => &mut self.second_name,
            StudentField::Surnames => &mut self.surnames,
            StudentField::ProgramId => &mut self.program_id,
        }
    }

    pub fn set(&mut self, field: StudentField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Reset every field to an empty string
    pub fn clear(&mut self) {
        *self = StudentFields::default();
    }
}

impl From<&Student> for StudentFields {
    fn from(student: &Student) -> Self {
        StudentFields {
            first_name: student.first_name.clone(),
            second_name: student.second_name.clone(),
            surnames: student.surnames.clone(),
            program_id: student.program_id.clone(),
        }
    }
}

/// Names one editable field of a form or draft
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StudentField {
    FirstName,
    SecondName,
    Surnames,
    ProgramId,
}

impl StudentField {
    pub const ALL: [StudentField; 4] = [
        StudentField::FirstName,
        StudentField::SecondName,
        StudentField::Surnames,
        StudentField::ProgramId,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StudentField::FirstName => "First name",
            StudentField::SecondName => "Second name",
            StudentField::Surnames => "Surnames",
            StudentField::ProgramId => "Program",
        }
    }

    /// Fields edited as free text (the program is picked from a list)
    pub fn is_text(&self) -> bool {
        !matches!(self, StudentField::ProgramId)
    }

    pub fn next(&self) -> StudentField {
        match self {
            StudentField::FirstName => StudentField::SecondName,
            StudentField::SecondName => StudentField::Surnames,
            StudentField::Surnames => StudentField::ProgramId,
            StudentField::ProgramId => StudentField::FirstName,
        }
    }

    pub fn prev(&self) -> StudentField {
        match self {
            StudentField::FirstName => StudentField::ProgramId,
            StudentField::SecondName => StudentField::FirstName,
            StudentField::Surnames => StudentField::SecondName,
            StudentField::ProgramId => StudentField::Surnames,
        }
    }
}

/// Entry of the program selector
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    pub label: String,
}

impl Program {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Program {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Built-in program list used when the config does not provide one
pub fn default_programs() -> Vec<Program> {
    vec![
        Program::new("1", "Ingeniería de Sistemas"),
        Program::new("2", "Ingeniería Civil"),
        Program::new("3", "Administración de Empresas"),
        Program::new("4", "Contaduría Pública"),
        Program::new("5", "Derecho"),
        Program::new("6", "Psicología"),
    ]
}

/// Kind of notification shown to the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast-style message produced by an API outcome
#[derive(Clone, Debug)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Success,
            message: message.into(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Error,
            message: message.into(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>, ttl: chrono::Duration) -> bool {
        now - self.created_at >= ttl
    }
}
