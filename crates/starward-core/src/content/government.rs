//! Governments: who owns ships and who takes offence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::GovernmentId;
use crate::error::ContentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernmentDef {
    pub name: String,
    /// Reputation lost per required crew member of a captured ship.
    #[serde(default)]
    pub capture_penalty: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Government {
    pub id: GovernmentId,
    pub name: String,
    pub capture_penalty: Option<f64>,
}

/// All governments, by id and by name.
#[derive(Debug, Clone, Default)]
pub struct Governments {
    list: Vec<Government>,
    by_name: HashMap<String, GovernmentId>,
}

impl Governments {
    pub fn build(defs: &[GovernmentDef]) -> Result<Self, ContentError> {
        let mut governments = Self::default();
        for def in defs {
            let id = GovernmentId(governments.list.len() as u32);
            if governments.by_name.insert(def.name.clone(), id).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "government",
                    name: def.name.clone(),
                });
            }
            governments.list.push(Government {
                id,
                name: def.name.clone(),
                capture_penalty: def.capture_penalty,
            });
        }
        Ok(governments)
    }

    pub fn get(&self, id: GovernmentId) -> Option<&Government> {
        self.list.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<GovernmentId> {
        self.by_name.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<GovernmentId, ContentError> {
        self.id(name)
            .ok_or_else(|| ContentError::unknown("government", name))
    }

    pub fn name(&self, id: GovernmentId) -> &str {
        self.get(id).map(|g| g.name.as_str()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
