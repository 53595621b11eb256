//! Proptest strategies for scenariogen property-based testing

pub mod strategies;

pub use strategies::{
    strategy_raw_generation, strategy_requirement, strategy_squad_name, strategy_tag_token,
};
