//! 有序键值字典.
//!
//! 用于编码器/封装器选项以及容器元数据. 键按插入顺序保存,
//! 匹配是精确的 (区分大小写), 同一个键只保留一份值.

use std::fmt;

/// 有序字符串字典
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(String, String)>,
}

impl Dictionary {
    /// 创建空字典
    pub fn new() -> Self {
        Self::default()
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 查询键对应的值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 是否包含指定键
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// 设置键值, 已存在时覆盖原值并保持原位置
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 仅当键不存在时设置
    ///
    /// 返回是否发生了插入.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    /// 移除键, 返回原值
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// 取出键并解析为指定类型
    ///
    /// 键不存在返回 `Ok(None)`; 值无法解析时键保持原样并返回错误描述.
    pub fn take_parsed<T: std::str::FromStr>(&mut self, key: &str) -> Result<Option<T>, String> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let value = raw
            .parse::<T>()
            .map_err(|_| format!("选项 {key} 的值无法解析: {raw}"))?;
        self.remove(key);
        Ok(Some(value))
    }

    /// 用另一个字典的内容覆盖 (同名键以 `other` 为准)
    pub fn update(&mut self, other: &Dictionary) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    /// 清空所有条目
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 按插入顺序迭代所有键值
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 按插入顺序迭代所有键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.set(k, v);
        }
        dict
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, "}}")
    }
}
