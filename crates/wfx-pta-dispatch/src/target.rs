use tracing::info;

use wfx_pta_frame::{encode, Frame};
use wfx_pta_link::Link;
use wfx_pta_schema::{
    Overrides, PtaCommand, Resolution, ResolveConfig, Resolver, SchemaRegistry, Value,
};

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::hif::HifStatus;

/// A resolved and encoded command, not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub resolution: Resolution,
    pub frame: Frame,
}

/// A command that was sent, with the firmware's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub frame: Frame,
    pub status: HifStatus,
}

/// One WFx device: the schema plus a dispatcher bound to its link.
#[derive(Debug)]
pub struct PtaTarget<L> {
    registry: SchemaRegistry,
    resolve_config: ResolveConfig,
    dispatcher: Dispatcher<L>,
}

impl<L: Link> PtaTarget<L> {
    /// Target using the built-in tables.
    pub fn new(dispatcher: Dispatcher<L>) -> Result<Self> {
        Ok(Self::with_registry(SchemaRegistry::builtin()?, dispatcher))
    }

    pub fn with_registry(registry: SchemaRegistry, dispatcher: Dispatcher<L>) -> Self {
        Self {
            registry,
            resolve_config: ResolveConfig::default(),
            dispatcher,
        }
    }

    pub fn with_resolve_config(mut self, config: ResolveConfig) -> Self {
        self.resolve_config = config;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher<L> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<L> {
        &mut self.dispatcher
    }

    /// Resolve and encode without sending.
    pub fn prepare(
        &self,
        command: PtaCommand,
        preset: Option<&str>,
        overrides: &Overrides,
    ) -> Result<Prepared> {
        let resolution = Resolver::with_config(&self.registry, self.resolve_config)
            .resolve(command, preset, overrides)?;
        let frame = encode(&resolution.command)?;
        Ok(Prepared { resolution, frame })
    }

    /// Resolve, encode and send one command.
    pub fn apply(
        &mut self,
        command: PtaCommand,
        preset: Option<&str>,
        overrides: &Overrides,
    ) -> Result<Applied> {
        let Prepared { frame, .. } = self.prepare(command, preset, overrides)?;
        let status = self.dispatcher.send(&frame)?;
        Ok(Applied { frame, status })
    }

    pub fn settings(&mut self, preset: Option<&str>, overrides: &Overrides) -> Result<Applied> {
        self.apply(PtaCommand::Settings, preset, overrides)
    }

    pub fn priority(&mut self, mode: &str) -> Result<Applied> {
        self.apply(PtaCommand::Priority, None, &single("PriorityMode", mode))
    }

    pub fn state(&mut self, state: &str) -> Result<Applied> {
        self.apply(PtaCommand::State, None, &single("State", state))
    }

    /// Send the reference sequence: settings `3W_BLE`, priority `BALANCED`,
    /// state `OFF`.
    ///
    /// Stops at the first error. Firmware refusals are not errors and do not
    /// stop the sequence.
    pub fn selftest(&mut self) -> Result<Vec<(PtaCommand, Applied)>> {
        let settings = self.settings(Some("3W_BLE"), &Overrides::new())?;
        info!(status = %settings.status, "selftest settings");
        let priority = self.priority("BALANCED")?;
        info!(status = %priority.status, "selftest priority");
        let state = self.state("OFF")?;
        info!(status = %state.status, "selftest state");

        Ok(vec![
            (PtaCommand::Settings, settings),
            (PtaCommand::Priority, priority),
            (PtaCommand::State, state),
        ])
    }
}

fn single(name: &str, value: &str) -> Overrides {
    let mut overrides = Overrides::new();
    overrides.insert(name.to_string(), Value::parse(value));
    overrides
}
