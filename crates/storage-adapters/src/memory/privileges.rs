//! `PrivilegeService` driven by fixed per-user grants.
//!
//! No policy language: a viewer holds whatever was granted to them, or the
//! default grant, in every topic. Individual posts can be hidden outright.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use domains::{Capability, PostId, PrivilegeService, Privileges, Result, TopicId, UserId};

#[derive(Debug, Default)]
pub struct StaticPrivileges {
    default_grant: Privileges,
    grants: DashMap<UserId, Privileges>,
    hidden: DashSet<PostId>,
}

impl StaticPrivileges {
    /// Everyone gets `default_grant` unless granted something else.
    pub fn new(default_grant: Privileges) -> Self {
        Self {
            default_grant,
            ..Self::default()
        }
    }

    pub fn grant(&self, viewer: UserId, privileges: Privileges) {
        self.grants.insert(viewer, privileges);
    }

    /// Makes `pid` unreadable for every viewer.
    pub fn hide(&self, pid: PostId) {
        self.hidden.insert(pid);
    }

    fn resolve(&self, viewer: UserId) -> Privileges {
        self.grants
            .get(&viewer)
            .map(|grant| grant.clone())
            .unwrap_or_else(|| self.default_grant.clone())
    }
}

#[async_trait]
impl PrivilegeService for StaticPrivileges {
    async fn filter_readable(
        &self,
        capability: Capability,
        pids: Vec<PostId>,
        viewer: UserId,
    ) -> Result<Vec<PostId>> {
        if !self.resolve(viewer).has(capability) {
            return Ok(Vec::new());
        }
        Ok(pids
            .into_iter()
            .filter(|pid| !self.hidden.contains(pid))
            .collect())
    }

    async fn privileges_for(&self, viewer: UserId, _tid: TopicId) -> Result<Privileges> {
        Ok(self.resolve(viewer))
    }
}
