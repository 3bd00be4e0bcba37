//! Validation for cross-references and value ranges in combat content.

use super::data::*;
use super::registry::ContentRegistry;
use crate::patterns::PatternKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationProblem {
    /// A reference to content that was never loaded
    MissingRef {
        target_type: &'static str,
        missing_id: String,
    },
    /// A value outside its accepted range
    InvalidValue { detail: String },
}

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub source_type: &'static str,
    pub source_id: String,
    pub field: &'static str,
    pub problem: ValidationProblem,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.problem {
            ValidationProblem::MissingRef {
                target_type,
                missing_id,
            } => write!(
                f,
                "{} '{}' references missing {} '{}' in field '{}'",
                self.source_type, self.source_id, target_type, missing_id, self.field
            ),
            ValidationProblem::InvalidValue { detail } => write!(
                f,
                "{} '{}' has invalid '{}': {}",
                self.source_type, self.source_id, self.field, detail
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper macro for checking a reference exists
macro_rules! check_ref {
    ($errors:expr, $registry_map:expr, $source_type:expr, $source_id:expr, $field:expr, $target_type:expr, $ref_id:expr) => {
        if !$registry_map.contains_key($ref_id) {
            $errors.push(ValidationError {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: $field,
                problem: ValidationProblem::MissingRef {
                    target_type: $target_type,
                    missing_id: $ref_id.to_string(),
                },
            });
        }
    };
}

fn invalid(
    source_type: &'static str,
    source_id: &str,
    field: &'static str,
    detail: impl Into<String>,
) -> ValidationError {
    ValidationError {
        source_type,
        source_id: source_id.to_string(),
        field,
        problem: ValidationProblem::InvalidValue {
            detail: detail.into(),
        },
    }
}

/// Validate all cross-references and ranges in the registry.
/// Returns a list of validation errors, empty if the content is usable.
pub fn validate_content(registry: &ContentRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (id, enemy) in &registry.enemies {
        if enemy.config.health == 0 {
            errors.push(invalid("Enemy", id, "health", "must be at least 1"));
        }
        if enemy.body_size.iter().any(|side| *side <= 0.0) {
            errors.push(invalid("Enemy", id, "body_size", "sides must be positive"));
        }
    }

    for (id, boss) in &registry.bosses {
        validate_boss(registry, id, boss, &mut errors);
    }

    errors
}

fn validate_boss(
    registry: &ContentRegistry,
    id: &str,
    boss: &BossDef,
    errors: &mut Vec<ValidationError>,
) {
    if boss.config.max_health == 0 {
        errors.push(invalid("Boss", id, "max_health", "must be at least 1"));
    }
    if boss.phases.is_empty() {
        errors.push(invalid("Boss", id, "phases", "a boss needs at least one phase"));
    }

    for phase in &boss.phases {
        if !(0.0..=1.0).contains(&phase.health_threshold) {
            errors.push(invalid(
                "Boss",
                id,
                "health_threshold",
                format!(
                    "phase '{}' threshold {} is outside [0, 1]",
                    phase.name, phase.health_threshold
                ),
            ));
        }
        if phase.patterns.is_empty() {
            errors.push(invalid(
                "Boss",
                id,
                "patterns",
                format!("phase '{}' has no patterns", phase.name),
            ));
        }

        for pattern in &phase.patterns {
            if pattern.cooldown < 0.0 {
                errors.push(invalid(
                    "Boss",
                    id,
                    "cooldown",
                    format!("pattern '{}' has a negative cooldown", pattern.name),
                ));
            }
            match &pattern.kind {
                PatternKind::ProjectileVolley(params) if params.count == 0 => {
                    errors.push(invalid(
                        "Boss",
                        id,
                        "count",
                        format!("volley '{}' fires nothing", pattern.name),
                    ));
                }
                PatternKind::AreaDenial(params) if params.radius <= 0.0 => {
                    errors.push(invalid(
                        "Boss",
                        id,
                        "radius",
                        format!("area '{}' has no radius", pattern.name),
                    ));
                }
                PatternKind::Summon(params) => {
                    check_ref!(
                        errors,
                        registry.enemies,
                        "Boss",
                        id,
                        "kind",
                        "Enemy",
                        params.kind.as_str()
                    );
                }
                _ => {}
            }
        }
    }
}
