// ABOUTME: UnitAction adapter plugging the deployer into graph traversals.
// ABOUTME: Maps each unit to its deploy or redeploy request.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::cloud::{Clock, ContainerService, LoadBalancer, LogStore};
use crate::diagnostics::Diagnostics;
use crate::graph::{ActionError, CancelToken, UnitAction};
use crate::types::{RevisionSelector, UnitName};

use super::deployer::Deployer;
use super::error::DeployError;
use super::request::DeployRequest;

/// What a traversal should do for one unit.
#[derive(Debug, Clone)]
pub enum UnitPlan {
    Deploy(DeployRequest),
    Redeploy(DeployRequest, RevisionSelector),
}

/// Per-unit deployment action for `run_up`/`run_down` traversals.
pub struct DeployAction<S, L, G, C> {
    deployer: Deployer<S, L, G, C>,
    plans: BTreeMap<UnitName, UnitPlan>,
    diagnostics: Diagnostics,
}

impl<S, L, G, C> DeployAction<S, L, G, C>
where
    S: ContainerService,
    L: LoadBalancer,
    G: LogStore,
    C: Clock,
{
    pub fn new(
        deployer: Deployer<S, L, G, C>,
        plans: BTreeMap<UnitName, UnitPlan>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            deployer,
            plans,
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[async_trait]
impl<S, L, G, C> UnitAction for DeployAction<S, L, G, C>
where
    S: ContainerService + 'static,
    L: LoadBalancer + 'static,
    G: LogStore + 'static,
    C: Clock + 'static,
{
    async fn run(&self, unit: &UnitName, cancel: &CancelToken) -> Result<(), ActionError> {
        let plan = self
            .plans
            .get(unit)
            .ok_or_else(|| Box::new(DeployError::NoPlan(unit.to_string())) as ActionError)?;

        let result = match plan.clone() {
            UnitPlan::Deploy(request) => {
                self.deployer
                    .deploy(request, cancel, &self.diagnostics)
                    .await
            }
            UnitPlan::Redeploy(request, selector) => {
                self.deployer
                    .redeploy(request, selector, cancel, &self.diagnostics)
                    .await
            }
        };

        result.map_err(|e| Box::new(e) as ActionError)
    }
}
