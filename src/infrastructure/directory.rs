//! In-process collaborator defaults
//!
//! The technician directory and the intervention registry are separate
//! services of the platform. These implementations cover deployments
//! where the core runs standalone: the directory is seeded from config,
//! the registry accepts every job id and leaves real validation to the
//! intervention service.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{JobRegistry, TechnicianDirectory};

/// Config-seeded technician name lookup.
pub struct StaticTechnicianDirectory {
    names: DashMap<i64, String>,
}

impl StaticTechnicianDirectory {
    pub fn new(entries: impl IntoIterator<Item = (i64, String)>) -> Self {
        let names = DashMap::new();
        for (id, name) in entries {
            names.insert(id, name);
        }
        Self { names }
    }

    pub fn register(&self, technician_id: i64, name: impl Into<String>) {
        self.names.insert(technician_id, name.into());
    }
}

#[async_trait]
impl TechnicianDirectory for StaticTechnicianDirectory {
    async fn display_name(&self, technician_id: i64) -> Option<String> {
        self.names.get(&technician_id).map(|n| n.clone())
    }
}

/// Accept-everything job registry.
pub struct OpenJobRegistry;

#[async_trait]
impl JobRegistry for OpenJobRegistry {
    async fn job_exists(&self, _job_id: &str) -> bool {
        true
    }
}
