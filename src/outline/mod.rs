//! Heuristic outline inference.
//!
//! The pipeline runs strictly in one direction:
//!
//! 1. [`HeaderFooterDetector`] finds text repeating in the page margins.
//! 2. [`LineExtractor`] drops those texts and table-of-contents leader lines.
//! 3. [`FontStatistics`] separates the body size from the heading sizes.
//! 4. [`TitleExtractor`] picks the largest text on the opening page.
//! 5. [`HeadingClassifier`] flags heading lines and assigns H1-H3.
//! 6. [`OutlineExtractor`] ties the stages together and de-duplicates.

mod assembler;
mod classifier;
mod extractor;
mod font_stats;
mod header_footer;
mod options;
mod title;

pub use assembler::{HeadingCandidate, OutlineExtractor};
pub use classifier::{HeadingClassifier, HeadingRules};
pub use extractor::LineExtractor;
pub use font_stats::FontStatistics;
pub use header_footer::HeaderFooterDetector;
pub use options::OutlineOptions;
pub use title::TitleExtractor;
