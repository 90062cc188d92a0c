//! 以名称索引的解剖掩膜集合.

use std::collections::BTreeMap;

use crate::{Geometry, Mask, Result, SegmentError};

/// 解剖结构名称到掩膜的映射.
#[derive(Clone, Debug, Default)]
pub struct AnatomicalMasks {
    map: BTreeMap<String, Mask>,
}

impl AnatomicalMasks {
    /// 空集合.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入掩膜, 返回同名的旧掩膜.
    #[inline]
    pub fn insert<S: Into<String>>(&mut self, name: S, mask: Mask) -> Option<Mask> {
        self.map.insert(name.into(), mask)
    }

    /// 获取名为 `name` 的掩膜.
    pub fn get(&self, name: &str) -> Result<&Mask> {
        self.map
            .get(name)
            .ok_or_else(|| SegmentError::MissingStructure(name.to_string()))
    }

    /// 是否包含名为 `name` 的掩膜?
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// 掩膜个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 按名称顺序迭代.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mask)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 对每个掩膜施加 `op`, 得到新的集合.
    pub fn map<F: FnMut(&Mask) -> Mask>(&self, mut op: F) -> Self {
        Self {
            map: self.map.iter().map(|(k, v)| (k.clone(), op(v))).collect(),
        }
    }

    /// 检查 `names` 中的掩膜都存在, 且集合中的每个掩膜都与 `reference` 几何兼容.
    /// 返回参考几何信息.
    pub fn check_geometry(&self, names: &[&str], reference: &str) -> Result<&Geometry> {
        let geo = self.get(reference)?.geometry();
        for &name in names {
            self.get(name)?;
        }
        match self.iter().find(|(_, m)| !m.geometry().is_compatible(geo)) {
            Some((name, _)) => Err(SegmentError::GeometryMismatch {
                label: name.to_string(),
                reference: reference.to_string(),
            }),
            None => Ok(geo),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Mask)> for AnatomicalMasks {
    fn from_iter<T: IntoIterator<Item = (S, Mask)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
