//! Builds the services in dependency order.
//!
//! ```text
//! store ─┬──────────────► LifecycleService ──┐
//! catalog┤                     ▲ audit        ├──► ApiGatewayService
//! roster ┘   activity log ─────┤              │
//!            replay cache ──► ViolationLedger ┘
//! ```
//!
//! The ledger and lifecycle share one submission store, so a violation and
//! a submit for the same attempt serialize on the same cell.

use std::sync::Arc;

use pc_03_violation_ledger::{InMemoryActivityLog, LedgerDependencies, ViolationLedger};
use pc_04_submission_lifecycle::{
    InMemoryExamCatalog, InMemorySubmissionStore, LifecycleDependencies, LifecycleService,
    RosterDirectory, SystemTimeSource, TimeSource,
};
use pc_05_api_gateway::{ApiGatewayService, GatewayDependencies, GatewayError};
use tracing::info;

use super::config::{ConfigError, ProctorConfig};

/// Shared service instances for one server.
#[derive(Clone)]
pub struct ProctorContainer {
    pub store: Arc<InMemorySubmissionStore>,
    pub catalog: Arc<InMemoryExamCatalog>,
    pub directory: Arc<RosterDirectory>,
    pub activity_log: Arc<InMemoryActivityLog>,
    pub lifecycle: Arc<LifecycleService>,
    pub ledger: Arc<ViolationLedger>,
    pub clock: Arc<dyn TimeSource>,
}

impl ProctorContainer {
    pub fn new(config: &ProctorConfig) -> Result<Self, ConfigError> {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(
        config: &ProctorConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        let exams = config.exam_definitions()?;
        let exam_count = exams.len();

        let store = Arc::new(InMemorySubmissionStore::new());
        let catalog = Arc::new(InMemoryExamCatalog::new(exams));
        let directory = Arc::new(RosterDirectory::new(
            config
                .students
                .roster
                .iter()
                .map(|s| (s.roll_no.as_str(), s.name.clone())),
            config.students.open_enrollment,
        ));
        let activity_log = Arc::new(InMemoryActivityLog::new());

        let lifecycle = Arc::new(
            LifecycleService::new(LifecycleDependencies {
                store: store.clone(),
                catalog: catalog.clone(),
                directory: directory.clone(),
                audit: activity_log.clone(),
                config: config.lifecycle.clone(),
            })
            .with_time_source(clock.clone()),
        );

        let ledger = Arc::new(
            ViolationLedger::new(LedgerDependencies {
                store: store.clone(),
                catalog: catalog.clone(),
                activity_log: activity_log.clone(),
                replay_cache: config.ledger.replay_cache(),
            })
            .with_time_source(clock.clone()),
        );

        info!(
            exams = exam_count,
            roster = directory.len(),
            open_enrollment = config.students.open_enrollment,
            "Subsystems initialized"
        );

        Ok(Self {
            store,
            catalog,
            directory,
            activity_log,
            lifecycle,
            ledger,
            clock,
        })
    }

    /// HTTP gateway over this container's services.
    pub fn gateway(&self, config: &ProctorConfig) -> Result<ApiGatewayService, GatewayError> {
        ApiGatewayService::new(
            config.gateway(),
            GatewayDependencies {
                lifecycle: self.lifecycle.clone(),
                ledger: self.ledger.clone(),
                clock: self.clock.clone(),
            },
        )
    }
}
