//! Configuration validation.
//!
//! Rules:
//! - field-level constraints from the `Validate` derive (non-empty topics,
//!   positive horizon, non-negative ranges)
//! - scan/pose/output/passthrough topics must not collide
//! - min_range <= max_range
//! - pose horizon must be positive

use std::collections::HashSet;

use contracts::{ConvertError, ConverterConfig};
use validator::Validate;

/// Validate a ConverterConfig.
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ConverterConfig) -> Result<(), ConvertError> {
    validate_derived(config)?;
    validate_topic_set(config)?;
    validate_range(config)?;
    Ok(())
}

/// Run the field-level derive checks
fn validate_derived(config: &ConverterConfig) -> Result<(), ConvertError> {
    config.validate().map_err(|e| {
        let field = e
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        ConvertError::config_validation(field, e.to_string())
    })
}

/// The replaced scan topic, the pose topic, the output topic, and every
/// passthrough topic must all be distinct: a collision would make output
/// messages ambiguous to downstream consumers.
fn validate_topic_set(config: &ConverterConfig) -> Result<(), ConvertError> {
    let mut seen = HashSet::new();

    for (field, topic) in [
        ("scan_topic", config.scan_topic.as_str()),
        ("pose_topic", config.pose_topic.as_str()),
        ("output_topic", config.output_topic.as_str()),
    ] {
        if !seen.insert(topic) {
            return Err(ConvertError::config_validation(
                field,
                format!("topic '{topic}' is used more than once"),
            ));
        }
    }

    for (idx, topic) in config.passthrough_topics.iter().enumerate() {
        if topic.is_empty() {
            return Err(ConvertError::config_validation(
                format!("passthrough_topics[{idx}]"),
                "topic name cannot be empty",
            ));
        }
        if !seen.insert(topic.as_str()) {
            return Err(ConvertError::config_validation(
                format!("passthrough_topics[{idx}]"),
                format!("topic '{topic}' collides with scan_topic/pose_topic/output_topic"),
            ));
        }
    }

    Ok(())
}

/// Validate the decoder range gate
fn validate_range(config: &ConverterConfig) -> Result<(), ConvertError> {
    if config.range.min_range > config.range.max_range {
        return Err(ConvertError::config_validation(
            "range.min_range / range.max_range",
            format!(
                "min_range ({}) must be <= max_range ({})",
                config.range.min_range, config.range.max_range
            ),
        ));
    }
    Ok(())
}
