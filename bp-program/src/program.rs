use crate::config::ProgramConfig;
use crate::context::{DisconnectSet, ProgramContext};
use bp_engine::{Behavioral, Handlers, RestrictedTrigger};
use bp_model::{BPEvent, ProgramError, TriggerError};
use serde_json::Value;
use std::fmt;

/// A defined behavioral program.
///
/// Cloning is not supported: the program is the single owner of its
/// teardown. Share it behind an `Arc` if several callers need the public
/// trigger.
pub struct Program {
    bp: Behavioral,
    config: ProgramConfig,
    restricted: RestrictedTrigger,
    disconnects: DisconnectSet,
}

impl Program {
    /// Build a program.
    ///
    /// `define` runs once, before this returns. Threads it registers do not
    /// advance until the first trigger. The returned handlers are
    /// subscribed to feedback and torn down with the program.
    pub fn define<F>(config: ProgramConfig, define: F) -> Result<Self, ProgramError>
    where
        F: FnOnce(&ProgramContext) -> Handlers,
    {
        config.validate()?;
        let bp = match &config.label {
            Some(label) => Behavioral::with_label(label.clone()),
            None => Behavioral::new(),
        };
        let disconnects = DisconnectSet::default();

        let ctx = ProgramContext::new(bp.clone(), disconnects.clone());
        let handlers = define(&ctx);
        tracing::debug!(
            label = config.label.as_deref(),
            handlers = handlers.len(),
            "program defined"
        );
        disconnects.add(bp.use_feedback(handlers));

        let restricted = bp.use_restricted_trigger(config.restricted_events.iter().cloned());
        Ok(Self {
            bp,
            config,
            restricted,
            disconnects,
        })
    }

    /// The public trigger.
    ///
    /// Refuses types outside `public_events` (when configured) with
    /// [`TriggerError::NotPublic`], and restricted types with
    /// [`TriggerError::Restricted`].
    pub fn trigger(&self, event: impl Into<BPEvent>) -> Result<(), TriggerError> {
        let event = event.into();
        if !self.config.is_public(&event.event_type) {
            tracing::warn!(event_type = %event.event_type, "public trigger refused event");
            return Err(TriggerError::NotPublic {
                event_type: event.event_type,
            });
        }
        self.restricted.trigger(event)
    }

    /// Validate untyped input, then apply the public trigger.
    pub fn trigger_value(&self, value: Value) -> Result<(), TriggerError> {
        let event = BPEvent::from_value(value)?;
        self.trigger(event)
    }

    /// Tear down every subscription and registered callback. A second call
    /// does nothing.
    pub fn disconnect(&self) {
        let n = self.disconnects.disconnect_all();
        tracing::debug!(label = self.config.label.as_deref(), disconnected = n, "program disconnected");
    }

    /// The underlying scheduler.
    pub fn behavioral(&self) -> &Behavioral {
        &self.bp
    }

    /// The configuration the program was defined with.
    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("config", &self.config)
            .field("bp", &self.bp)
            .finish()
    }
}
