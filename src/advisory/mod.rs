//! Rule-based agronomic advice
//!
//! Everything here is pure and table-driven:
//! - `names.rs` - classifier label → knowledge-base key
//! - `fertilizer.rs` - N-P-K thresholds → fertilizer advice
//! - `tips.rs` - short crop-care tips
//! - `knowledge_base.rs` - ideal growing ranges and harvest timing

pub mod names;
pub mod fertilizer;
pub mod tips;
pub mod knowledge_base;

pub use names::{normalize, CropKey};
pub use fertilizer::{advise, AdviceLine, FertilizerAdvice, Nutrient, NutrientLevel};
pub use tips::{tips_for, NO_TIPS_MESSAGE};
pub use knowledge_base::{details_for, CropKnowledgeEntry, IdealRange, NO_DETAILS_MESSAGE};
