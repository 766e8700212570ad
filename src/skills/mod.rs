//! Built-in native skills.

pub mod activity;
pub mod text;

use anyhow::Result;
use std::sync::Arc;

use crate::config::Settings;
use crate::function::NativeFunction;
use crate::registry::FunctionRegistry;
use crate::registry::loader::should_load;

pub const ACTIVITY_COLLECTION: &str = "RandomActivity";
pub const TEXT_COLLECTION: &str = "Text";

/// Register the built-in skills allowed by `settings.skills`.
/// Returns the number of functions registered.
pub fn register_builtin(registry: &mut FunctionRegistry, settings: &Settings) -> Result<usize> {
    let filter = settings.skills.as_deref();
    let mut count = 0;

    if should_load(ACTIVITY_COLLECTION, filter) {
        let activity: Arc<dyn NativeFunction> =
            Arc::new(activity::RandomActivity::new(&settings.activity_url)?);
        count += registry.import_skill(ACTIVITY_COLLECTION, [activity])?;
    }

    if should_load(TEXT_COLLECTION, filter) {
        count += registry.import_skill(TEXT_COLLECTION, text::functions())?;
    }

    Ok(count)
}
