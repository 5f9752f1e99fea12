use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity listed by the character API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
}

/// Life status filter offered by the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Alive,
    Dead,
    Unknown,
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::Alive => write!(f, "alive"),
            StatusFilter::Dead => write!(f, "dead"),
            StatusFilter::Unknown => write!(f, "unknown"),
        }
    }
}
