//! Question bank — the closed set of roles, their question lists and the
//! documentation table each role retrieves context from.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of questions asked per interview.
pub const QUESTIONS_PER_INTERVIEW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Python Developer")]
    PythonDeveloper,
    #[serde(rename = "Network Engineer")]
    NetworkEngineer,
    #[serde(rename = "Data Engineer")]
    DataEngineer,
}

const PYTHON_QUESTIONS: [&str; 5] = [
    "What are Python decorators, and how do they work?",
    "Explain the difference between deep copy and shallow copy in Python.",
    "How does Python's garbage collection mechanism work?",
    "What is the difference between lists and tuples in Python?",
    "Can you explain Python's GIL (Global Interpreter Lock)?",
];

const NETWORK_QUESTIONS: [&str; 5] = [
    "What is the OSI model, and why is it important?",
    "Explain the difference between TCP and UDP.",
    "How do you configure a VLAN in a network switch?",
    "What is NAT, and why is it used?",
    "Describe the purpose of a subnet mask in networking.",
];

const DATA_QUESTIONS: [&str; 5] = [
    "What are the benefits of using a distributed computing system like Hadoop?",
    "Explain ETL (Extract, Transform, Load) processes.",
    "What is the difference between OLAP and OLTP databases?",
    "How do you ensure data quality during data ingestion?",
    "What is the role of a data lake in a data engineering pipeline?",
];

impl Role {
    pub const ALL: [Role; 3] = [
        Role::PythonDeveloper,
        Role::NetworkEngineer,
        Role::DataEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PythonDeveloper => "Python Developer",
            Role::NetworkEngineer => "Network Engineer",
            Role::DataEngineer => "Data Engineer",
        }
    }

    /// The fixed, ordered question list for this role.
    pub fn questions(&self) -> &'static [&'static str; 5] {
        match self {
            Role::PythonDeveloper => &PYTHON_QUESTIONS,
            Role::NetworkEngineer => &NETWORK_QUESTIONS,
            Role::DataEngineer => &DATA_QUESTIONS,
        }
    }

    /// Documentation table the ideal answer is grounded on.
    /// Only these constants are ever interpolated into SQL.
    pub fn source_table(&self) -> &'static str {
        match self {
            Role::PythonDeveloper => "docs_python_table",
            Role::NetworkEngineer => "docs_network_table",
            Role::DataEngineer => "docs_dbms_table",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No document source found for the role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Draws the interview questions for `role`: distinct, uniformly at random,
/// in the order they will be asked.
pub fn sample_questions<R: Rng + ?Sized>(
    role: Role,
    rng: &mut R,
) -> [String; QUESTIONS_PER_INTERVIEW] {
    let mut picked = role
        .questions()
        .choose_multiple(rng, QUESTIONS_PER_INTERVIEW)
        .map(|q| q.to_string());
    // choose_multiple yields exactly min(amount, len) items and every list holds 5.
    std::array::from_fn(|_| picked.next().unwrap_or_default())
}
