//! Sample semantic functions registered by the CLI.

use crate::error::KernelError;
use crate::function::{CompletionSettings, ParameterView};
use crate::registry::FunctionRegistry;
use crate::registry::loader::should_load;

pub const ACTIVITY_LLM_COLLECTION: &str = "RandomActivityLLM";
pub const DEGREES_COLLECTION: &str = "DegreesOfSeparation";

pub const RANDOM_ACTIVITY_PROMPT: &str =
    "Find me an activity to do, return only a single activity. I like to {{$INPUT}}. Be creative!";

pub const DEGREES_OF_SEPARATION_PROMPT: &str = "How many degrees of separation are there between {{$ITEM1}} and {{$ITEM2}}? Bonus points for Kevin Bacon reference.";

/// Register `RandomActivityLLM.GetRandomActivity` and
/// `DegreesOfSeparation.FindDegrees`, skipping collections not allowed by
/// `filter`. Returns the number registered.
pub fn register_samples(
    registry: &mut FunctionRegistry,
    filter: Option<&[String]>,
) -> Result<usize, KernelError> {
    let mut count = 0;

    if should_load(ACTIVITY_LLM_COLLECTION, filter) {
        registry.register_semantic_with(
            ACTIVITY_LLM_COLLECTION,
            "GetRandomActivity",
            "Finds a random activity based on the interest input",
            RANDOM_ACTIVITY_PROMPT,
            CompletionSettings {
                max_tokens: 256,
                temperature: 0.1,
                top_p: 0.5,
            },
            &[ParameterView::new("INPUT", "Something you like to do")],
        )?;
        count += 1;
    }

    if should_load(DEGREES_COLLECTION, filter) {
        registry.register_semantic_with(
            DEGREES_COLLECTION,
            "FindDegrees",
            "Returns the degrees of separation between two concepts.",
            DEGREES_OF_SEPARATION_PROMPT,
            CompletionSettings {
                max_tokens: 256,
                temperature: 0.2,
                top_p: 0.5,
            },
            &[
                ParameterView::new("ITEM1", "First concept"),
                ParameterView::new("ITEM2", "Second concept"),
            ],
        )?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_register_as_semantic() {
        let mut registry = FunctionRegistry::new();
        assert_eq!(register_samples(&mut registry, None).unwrap(), 2);

        assert!(registry.has_semantic("RandomActivityLLM", "GetRandomActivity"));
        assert!(registry.has_semantic("DegreesOfSeparation", "FindDegrees"));

        let degrees = registry.lookup("DegreesOfSeparation", "FindDegrees").unwrap();
        let names: Vec<&str> = degrees
            .descriptor
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["ITEM1", "ITEM2"]);
    }

    #[test]
    fn registering_twice_conflicts() {
        let mut registry = FunctionRegistry::new();
        register_samples(&mut registry, None).unwrap();
        assert!(matches!(
            register_samples(&mut registry, None),
            Err(KernelError::DuplicateFunction { .. })
        ));
    }

    #[test]
    fn filter_limits_sample_collections() {
        let mut registry = FunctionRegistry::new();
        let filter = vec!["degreesofseparation".to_string(), "Text".to_string()];
        let count = register_samples(&mut registry, Some(filter.as_slice())).unwrap();

        assert_eq!(count, 1);
        assert!(registry.has_semantic(DEGREES_COLLECTION, "FindDegrees"));
        assert!(!registry.has(ACTIVITY_LLM_COLLECTION, "GetRandomActivity"));
    }
}
