//! # 原子类型到元素符号的映射
//!
//! 解析 `--type-map 1:Al,2:Sc` 形式的参数。映射只用于输出标签，
//! 不参与计算。
//!
//! ## 依赖关系
//! - 被 `cli/`, `commands/rdf.rs`, `rdf/export.rs`, `rdf/plot.rs` 使用

use crate::error::{LeoError, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 无序物种对 (ta <= tb)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesPair {
    pub first: u32,
    pub second: u32,
}

impl SpeciesPair {
    /// 创建物种对，参数顺序无关
    pub fn new(a: u32, b: u32) -> Self {
        SpeciesPair {
            first: a.min(b),
            second: a.max(b),
        }
    }

    /// 给定类型集合的全部无序对，按 (ta, tb) 升序
    pub fn all_pairs(types: &[u32]) -> Vec<SpeciesPair> {
        let mut sorted = types.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut pairs = Vec::new();
        for (i, &ta) in sorted.iter().enumerate() {
            for &tb in &sorted[i..] {
                pairs.push(SpeciesPair::new(ta, tb));
            }
        }
        pairs
    }
}

impl fmt::Display for SpeciesPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// 类型编号 → 元素符号
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    labels: BTreeMap<u32, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 POSCAR 元素行构造：第 i 个符号对应类型 i+1
    pub fn from_species(species: &[String]) -> Self {
        TypeMap {
            labels: species
                .iter()
                .enumerate()
                .map(|(i, s)| (i as u32 + 1, s.clone()))
                .collect(),
        }
    }

    pub fn insert(&mut self, atom_type: u32, symbol: impl Into<String>) {
        self.labels.insert(atom_type, symbol.into());
    }

    pub fn get(&self, atom_type: u32) -> Option<&str> {
        self.labels.get(&atom_type).map(String::as_str)
    }

    /// 用 `fallback` 补齐本映射中缺少的类型
    pub fn or_fallback(mut self, fallback: &TypeMap) -> Self {
        for (&t, symbol) in &fallback.labels {
            self.labels.entry(t).or_insert_with(|| symbol.clone());
        }
        self
    }

    /// 类型标签：有映射用符号，否则用编号
    pub fn label(&self, atom_type: u32) -> String {
        self.get(atom_type)
            .map(str::to_string)
            .unwrap_or_else(|| atom_type.to_string())
    }

    /// 物种对标签，例如 `Al-Sc`
    pub fn pair_label(&self, pair: SpeciesPair) -> String {
        format!("{}-{}", self.label(pair.first), self.label(pair.second))
    }
}

impl FromStr for TypeMap {
    type Err = LeoError;

    fn from_str(s: &str) -> Result<Self> {
        let mut map = TypeMap::new();

        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (key, symbol) = item.split_once(':').ok_or_else(|| {
                LeoError::InvalidArgument(format!(
                    "type map entry '{}' is not of the form <type>:<symbol>",
                    item
                ))
            })?;

            let atom_type: u32 = key.trim().parse().map_err(|_| {
                LeoError::InvalidArgument(format!("type map key '{}' is not an integer", key))
            })?;

            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(LeoError::InvalidArgument(format!(
                    "type map entry '{}' has an empty symbol",
                    item
                )));
            }

            map.insert(atom_type, symbol);
        }

        Ok(map)
    }
}
