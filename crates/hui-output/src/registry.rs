//! 输出流注册表.
//!
//! 按声明顺序保存输出流. 流的索引在注册时确定, 之后不再变化;
//! 不提供删除操作.

use hui_core::{HuiError, HuiResult};

use crate::stream::OutputStream;

/// 输出流注册表
#[derive(Debug, Default)]
pub struct StreamRegistry {
    streams: Vec<OutputStream>,
}

impl StreamRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一个注册的流将获得的索引
    pub fn next_index(&self) -> usize {
        self.streams.len()
    }

    /// 注册一条流, 流索引必须等于注册顺序
    pub(crate) fn push(&mut self, stream: OutputStream) -> HuiResult<&mut OutputStream> {
        let index = self.streams.len();
        if stream.index() != index {
            return Err(HuiError::InvalidArgument(format!(
                "流索引 {} 与注册顺序 {} 不一致",
                stream.index(),
                index
            )));
        }
        self.streams.push(stream);
        Ok(&mut self.streams[index])
    }

    /// 流数量
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// 是否没有流
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// 按索引获取流
    pub fn get(&self, index: usize) -> Option<&OutputStream> {
        self.streams.get(index)
    }

    /// 按索引获取可修改的流
    pub fn get_mut(&mut self, index: usize) -> Option<&mut OutputStream> {
        self.streams.get_mut(index)
    }

    /// 按注册顺序遍历
    pub fn iter(&self) -> std::slice::Iter<'_, OutputStream> {
        self.streams.iter()
    }

    /// 按注册顺序遍历 (可修改)
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, OutputStream> {
        self.streams.iter_mut()
    }
}

impl<'a> IntoIterator for &'a StreamRegistry {
    type Item = &'a OutputStream;
    type IntoIter = std::slice::Iter<'a, OutputStream>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hui_codec::{CodecRegistry, EncoderContext};
    use hui_core::Rational;

    fn stream(index: usize) -> OutputStream {
        let mut codecs = CodecRegistry::new();
        hui_codec::register_all(&mut codecs);
        let ctx = EncoderContext::new(codecs.resolve_encoder("pcm_s16le").unwrap());
        OutputStream::new(index, ctx, Rational::UNDEFINED)
    }

    #[test]
    fn test_索引等于注册顺序() {
        let mut reg = StreamRegistry::new();
        assert_eq!(reg.push(stream(0)).unwrap().index(), 0);
        assert_eq!(reg.next_index(), 1);
        assert_eq!(reg.push(stream(1)).unwrap().index(), 1);
        let indices: Vec<usize> = reg.iter().map(OutputStream::index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_拒绝错位索引() {
        let mut reg = StreamRegistry::new();
        let err = reg.push(stream(3)).unwrap_err();
        assert!(matches!(err, HuiError::InvalidArgument(_)));
        assert!(reg.is_empty());
    }
}
