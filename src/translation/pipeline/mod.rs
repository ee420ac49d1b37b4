//! 翻译管道模块
//!
//! 提供候选位置选择和长度受限的批次拆分

pub mod batch;
pub mod selector;

// 重新导出主要类型
pub use batch::{restore_whitespace, BatchLimits, LengthBoundedSplitter, PlannedBatch};
pub use selector::{CandidateLocation, NodeSelector, SelectedText, SelectionRule};
