//! Static lookup of which masking rules each semantic type permits.
//!
//! Both validation (the config store) and presentation (rule menus) read
//! from this table.

use super::{MaskingRule, SemanticType};

const STRING_RULES: &[MaskingRule] = &[
    MaskingRule::None,
    MaskingRule::Partial,
    MaskingRule::Generalized,
    MaskingRule::Hash,
    MaskingRule::Faker,
];

const NUMBER_RULES: &[MaskingRule] = &[
    MaskingRule::None,
    MaskingRule::Generalized,
    MaskingRule::Hash,
    MaskingRule::Faker,
];

const BOOLEAN_RULES: &[MaskingRule] = &[
    MaskingRule::None,
    MaskingRule::Generalized,
    MaskingRule::Faker,
];

/// Rules offered for a field of the given type, in menu order.
pub fn allowed_rules(data_type: SemanticType) -> &'static [MaskingRule] {
    match data_type {
        SemanticType::String => STRING_RULES,
        SemanticType::Number => NUMBER_RULES,
        SemanticType::Boolean => BOOLEAN_RULES,
    }
}

/// Rule suggested for a freshly inferred field.
pub fn default_rule(data_type: SemanticType) -> MaskingRule {
    match data_type {
        SemanticType::String => MaskingRule::Partial,
        SemanticType::Number | SemanticType::Boolean => MaskingRule::Generalized,
    }
}

pub fn is_allowed(data_type: SemanticType, rule: MaskingRule) -> bool {
    allowed_rules(data_type).contains(&rule)
}
