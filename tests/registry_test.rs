use std::fs;
use std::path::Path;
use std::sync::Arc;

use skein::error::KernelError;
use skein::function::{
    CompletionSettings, Function, FunctionDescriptor, FunctionKind, NativeFunction, native_fn,
};
use skein::registry::FunctionRegistry;

fn noop(name: &str) -> Arc<dyn NativeFunction> {
    native_fn(name, "does nothing", |_| Ok(()))
}

#[test]
fn lookup_returns_same_function_every_time() {
    let mut registry = FunctionRegistry::new();
    let function = noop("Ping");
    registry.register_native("Net", Arc::clone(&function)).unwrap();

    for _ in 0..3 {
        let entry = registry.lookup("Net", "Ping").unwrap();
        match &entry.function {
            Function::Native(found) => assert!(Arc::ptr_eq(found, &function)),
            Function::Semantic(_) => panic!("expected native"),
        }
    }
}

#[test]
fn duplicate_registration_fails_and_keeps_original() {
    let mut registry = FunctionRegistry::new();
    let original = native_fn("Ping", "original", |_| Ok(()));
    registry.register_native("Net", Arc::clone(&original)).unwrap();

    let err = registry
        .register_native("Net", native_fn("Ping", "impostor", |_| Ok(())))
        .unwrap_err();
    assert_eq!(
        err,
        KernelError::DuplicateFunction {
            collection: "Net".to_string(),
            name: "Ping".to_string(),
        }
    );

    let entry = registry.lookup("Net", "Ping").unwrap();
    assert_eq!(entry.descriptor.description, "original");
    assert_eq!(registry.len(), 1);
}

#[test]
fn duplicate_across_kinds_is_rejected() {
    let mut registry = FunctionRegistry::new();
    registry.register_native("Fun", noop("Joke")).unwrap();

    let err = registry
        .register_semantic("Fun", "Joke", "", "a joke about {{$INPUT}}", CompletionSettings::default())
        .unwrap_err();
    assert!(matches!(err, KernelError::DuplicateFunction { .. }));
    assert!(registry.has_native("Fun", "Joke"));
}

#[test]
fn same_name_in_different_collections_is_fine() {
    let mut registry = FunctionRegistry::new();
    registry.register_native("A", noop("Run")).unwrap();
    registry.register_native("B", noop("Run")).unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn lookup_miss_is_function_not_found() {
    let registry = FunctionRegistry::new();
    let err = registry.lookup("Nope", "Missing").unwrap_err();
    assert_eq!(
        err,
        KernelError::FunctionNotFound {
            collection: "Nope".to_string(),
            name: "Missing".to_string(),
        }
    );
}

#[test]
fn lookup_ignores_case_but_descriptor_keeps_it() {
    let mut registry = FunctionRegistry::new();
    registry.register_native("RandomActivity", noop("GetRandomActivity")).unwrap();

    let entry = registry.lookup("randomactivity", "GETRANDOMACTIVITY").unwrap();
    assert_eq!(entry.descriptor.collection, "RandomActivity");
    assert_eq!(entry.descriptor.name, "GetRandomActivity");
    assert!(registry.has("RANDOMACTIVITY", "getrandomactivity"));
}

#[test]
fn has_distinguishes_kinds() {
    let mut registry = FunctionRegistry::new();
    registry.register_native("Text", noop("Trim")).unwrap();
    registry
        .register_semantic("Fun", "Joke", "", "{{$INPUT}}", CompletionSettings::default())
        .unwrap();

    assert!(registry.has("Text", "Trim"));
    assert!(registry.has_native("Text", "Trim"));
    assert!(!registry.has_semantic("Text", "Trim"));

    assert!(registry.has_semantic("Fun", "Joke"));
    assert!(!registry.has_native("Fun", "Joke"));
    assert_eq!(registry.lookup("Fun", "Joke").unwrap().kind(), FunctionKind::Semantic);

    assert!(!registry.has("Fun", "Pun"));
}

#[test]
fn invalid_names_are_rejected() {
    let mut registry = FunctionRegistry::new();
    let descriptor = FunctionDescriptor {
        collection: "my skill".to_string(),
        name: "Run".to_string(),
        description: String::new(),
        parameters: vec![],
    };
    let err = registry.register(descriptor, Function::Native(noop("Run"))).unwrap_err();
    assert_eq!(err, KernelError::InvalidName("my skill".to_string()));
    assert!(registry.is_empty());
}

#[test]
fn bad_template_is_rejected_at_registration() {
    let mut registry = FunctionRegistry::new();
    let err = registry
        .register_semantic("Fun", "Broken", "", "hello {{$INPUT", CompletionSettings::default())
        .unwrap_err();
    assert!(matches!(err, KernelError::Template(_)));
    assert!(!registry.has("Fun", "Broken"));
}

#[test]
fn semantic_descriptor_lists_template_variables() {
    let mut registry = FunctionRegistry::new();
    registry
        .register_semantic(
            "DegreesOfSeparation",
            "FindDegrees",
            "",
            "Between {{$ITEM1}} and {{$ITEM2}}, and again {{$ITEM1}}",
            CompletionSettings::default(),
        )
        .unwrap();

    let entry = registry.lookup("DegreesOfSeparation", "FindDegrees").unwrap();
    let names: Vec<&str> = entry
        .descriptor
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["ITEM1", "ITEM2"]);
}

#[test]
fn import_skill_registers_all_functions() {
    let mut registry = FunctionRegistry::new();
    let count = registry
        .import_skill("Net", [noop("Ping"), noop("Trace")])
        .unwrap();
    assert_eq!(count, 2);
    assert!(registry.has("Net", "Ping"));
    assert!(registry.has("Net", "Trace"));
}

#[test]
fn import_skill_stops_at_conflict() {
    let mut registry = FunctionRegistry::new();
    let err = registry
        .import_skill("Net", [noop("Ping"), noop("Ping"), noop("Trace")])
        .unwrap_err();
    assert!(matches!(err, KernelError::DuplicateFunction { .. }));
    assert!(registry.has("Net", "Ping"));
    assert!(!registry.has("Net", "Trace"));
}

#[test]
fn descriptors_are_ordered() {
    let mut registry = FunctionRegistry::new();
    registry.register_native("Zeta", noop("A")).unwrap();
    registry.register_native("alpha", noop("B")).unwrap();
    registry.register_native("Alpha", noop("A")).unwrap();

    let names: Vec<String> = registry.descriptors().map(|d| d.to_string()).collect();
    assert_eq!(names, ["Alpha.A", "alpha.B", "Zeta.A"]);
}

// ── Loading prompt functions from disk ───────────────────────────

fn write_function(root: &Path, skill: &str, function: &str, prompt: &str, config: Option<&str>) {
    let dir = root.join(skill).join(function);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("skprompt.txt"), prompt).unwrap();
    if let Some(config) = config {
        fs::write(dir.join("config.json"), config).unwrap();
    }
}

#[test]
fn loads_prompt_functions_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_function(
        dir.path(),
        "FunSkill",
        "Joke",
        "Tell a joke about {{$INPUT}} in {{$style}}",
        Some(
            r#"{
                "description": "Generate a funny joke",
                "completion": {"max_tokens": 1000, "temperature": 0.9, "top_p": 0.0},
                "input": {"parameters": [
                    {"name": "style", "description": "Joke style", "defaultValue": "limerick"}
                ]}
            }"#,
        ),
    );
    write_function(dir.path(), "FunSkill", "Excuse", "An excuse for {{$INPUT}}", None);

    let mut registry = FunctionRegistry::new();
    let loaded = registry
        .load_semantic_skills(dir.path(), None, &CompletionSettings::default())
        .unwrap();
    assert_eq!(loaded, 2);

    let joke = registry.lookup("FunSkill", "Joke").unwrap();
    assert_eq!(joke.descriptor.description, "Generate a funny joke");
    let style = &joke.descriptor.parameters[1];
    assert_eq!(style.description, "Joke style");
    assert_eq!(style.default_value.as_deref(), Some("limerick"));
    match &joke.function {
        Function::Semantic(f) => assert_eq!(f.settings().max_tokens, 1000),
        Function::Native(_) => panic!("expected semantic"),
    }
}

#[test]
fn loader_uses_default_settings_without_config() {
    let dir = tempfile::tempdir().unwrap();
    write_function(dir.path(), "Writer", "Poem", "A poem about {{$INPUT}}", None);

    let defaults = CompletionSettings {
        max_tokens: 64,
        temperature: 0.5,
        top_p: 1.0,
    };
    let mut registry = FunctionRegistry::new();
    registry
        .load_semantic_skills(dir.path(), None, &defaults)
        .unwrap();

    match &registry.lookup("Writer", "Poem").unwrap().function {
        Function::Semantic(f) => assert_eq!(*f.settings(), defaults),
        Function::Native(_) => panic!("expected semantic"),
    }
}

#[test]
fn loader_respects_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_function(dir.path(), "FunSkill", "Joke", "{{$INPUT}}", None);
    write_function(dir.path(), "WriterSkill", "Poem", "{{$INPUT}}", None);

    let mut registry = FunctionRegistry::new();
    let filter = vec!["funskill".to_string()];
    let loaded = registry
        .load_semantic_skills(dir.path(), Some(filter.as_slice()), &CompletionSettings::default())
        .unwrap();

    assert_eq!(loaded, 1);
    assert!(registry.has("FunSkill", "Joke"));
    assert!(!registry.has("WriterSkill", "Poem"));
}

#[test]
fn loader_skips_bad_templates_and_dirs_without_prompt() {
    let dir = tempfile::tempdir().unwrap();
    write_function(dir.path(), "FunSkill", "Broken", "oops {{$INPUT", None);
    write_function(dir.path(), "FunSkill", "Joke", "{{$INPUT}}", None);
    fs::create_dir_all(dir.path().join("FunSkill").join("Empty")).unwrap();

    let mut registry = FunctionRegistry::new();
    let loaded = registry
        .load_semantic_skills(dir.path(), None, &CompletionSettings::default())
        .unwrap();

    assert_eq!(loaded, 1);
    assert!(!registry.has("FunSkill", "Broken"));
    assert!(!registry.has("FunSkill", "Empty"));
}

#[test]
fn loader_skips_invalid_directory_names() {
    let dir = tempfile::tempdir().unwrap();
    write_function(dir.path(), "FunSkill", "Joke", "{{$INPUT}}", None);
    write_function(dir.path(), "FunSkill", "dad-joke", "{{$INPUT}}", None);
    write_function(dir.path(), "fun skill", "Pun", "{{$INPUT}}", None);
    write_function(dir.path(), "WriterSkill", "Poem", "{{$INPUT}}", None);

    let mut registry = FunctionRegistry::new();
    let loaded = registry
        .load_semantic_skills(dir.path(), None, &CompletionSettings::default())
        .unwrap();

    assert_eq!(loaded, 2);
    assert!(registry.has("FunSkill", "Joke"));
    assert!(registry.has("WriterSkill", "Poem"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn loader_conflict_with_existing_function_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_function(dir.path(), "Text", "Trim", "{{$INPUT}}", None);

    let mut registry = FunctionRegistry::new();
    registry.register_native("Text", noop("Trim")).unwrap();

    let err = registry
        .load_semantic_skills(dir.path(), None, &CompletionSettings::default())
        .unwrap_err();
    assert!(err.to_string().contains("already registered"));
    assert!(registry.has_native("Text", "Trim"));
}

#[test]
fn loader_reports_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    write_function(dir.path(), "FunSkill", "Joke", "{{$INPUT}}", Some("{ nope"));

    let mut registry = FunctionRegistry::new();
    let err = registry
        .load_semantic_skills(dir.path(), None, &CompletionSettings::default())
        .unwrap_err();
    assert!(format!("{err:#}").contains("config.json"));
}

#[test]
fn loader_fails_on_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = FunctionRegistry::new();
    assert!(
        registry
            .load_semantic_skills(&dir.path().join("missing"), None, &CompletionSettings::default())
            .is_err()
    );
}
