//! # 数据模型模块
//!
//! 晶体结构与晶格的统一表示。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `pipeline/`, `engine/`, `commands/` 使用
//! - 子模块: structure

pub mod structure;

pub use structure::{Atom, Coords, Crystal, Lattice};
