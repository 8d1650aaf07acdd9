/// Unit tests for FactoryError and FactoryResult

use ferrous_factory::{Context, FactoryError, FactoryRegistry, FactoryResult};
use std::error::Error;
use std::sync::Arc;

#[test]
fn test_error_display_not_found() {
    let error = FactoryError::NotFound("Settings".to_string());
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Singleton not found: Settings");
    assert!(display_str.contains("not found"));
}

#[test]
fn test_error_display_type_mismatch() {
    let error = FactoryError::TypeMismatch("alloc::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: alloc::string::String");
}

#[test]
fn test_error_display_config() {
    let error = FactoryError::Config("FERROUS_FACTORY_LOG=maybe is not a boolean".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid registry options: FERROUS_FACTORY_LOG=maybe is not a boolean"
    );
}

#[test]
fn test_error_display_serialization() {
    let error = FactoryError::Serialization("key must be a string".to_string());
    assert_eq!(error.to_string(), "Snapshot serialization failed: key must be a string");
}

#[test]
fn test_error_is_std_error() {
    let error: Box<dyn Error> = Box::new(FactoryError::NotFound("Settings".to_string()));
    assert!(error.source().is_none());
    assert_eq!(error.to_string(), "Singleton not found: Settings");
}

#[test]
fn test_errors_compare_by_value() {
    assert_eq!(
        FactoryError::NotFound("A".to_string()),
        FactoryError::NotFound("A".to_string())
    );
    assert_ne!(
        FactoryError::NotFound("A".to_string()),
        FactoryError::Config("A".to_string())
    );
}

#[test]
fn test_require_propagates_with_question_mark() {
    fn volume(registry: &FactoryRegistry, ctx: &Context) -> FactoryResult<u8> {
        let volume = registry.require_singleton_instance::<u8>(ctx, "Volume")?;
        Ok(*volume)
    }

    let registry = FactoryRegistry::new();
    let ctx = Context::new();
    assert_eq!(volume(&registry, &ctx), Err(FactoryError::NotFound("Volume".to_string())));

    registry.set_singleton_instance(&ctx, "Volume", Arc::new(11u8));
    assert_eq!(volume(&registry, &ctx), Ok(11));

    registry.set_singleton_instance(&ctx, "Volume", Arc::new("loud"));
    assert!(matches!(volume(&registry, &ctx), Err(FactoryError::TypeMismatch(_))));
}
