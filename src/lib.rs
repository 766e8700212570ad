pub mod completion;
pub mod config;
pub mod consts;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod function;
pub mod prompts;
pub mod registry;
pub mod skills;
pub mod telemetry;
