#![deny(missing_docs)]
//! # bprogram: umbrella crate
//!
//! One import surface for behavioral programming. Re-exports the
//! vocabulary, composition, scheduler, and program crates behind feature
//! flags, plus a `prelude` for the happy path.
//!
//! | Feature | Crates |
//! |---------|--------|
//! | `core` (default) | `bp-model`, `bp-thread`, `bp-engine` |
//! | `program` (default) | `bp-program` |
//! | `test-utils` | `bp-engine` recorders |

#[cfg(feature = "core")]
pub use bp_engine;
#[cfg(feature = "core")]
pub use bp_model;
#[cfg(feature = "program")]
pub use bp_program;
#[cfg(feature = "core")]
pub use bp_thread;

/// Happy-path imports for writing behavioral programs.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use bp_model::{
        BPEvent, EventTemplate, HandlerError, Idioms, Listener, Listeners, SnapshotMessage,
        TriggerError, is_bp_event,
    };

    #[cfg(feature = "core")]
    pub use bp_thread::{Repeat, Rules, repeating, sequence, step};

    #[cfg(feature = "core")]
    pub use bp_engine::{BThreads, Behavioral, Disconnect, Handlers, RestrictedTrigger};

    #[cfg(feature = "program")]
    pub use bp_program::{Program, ProgramConfig, ProgramContext};
}
