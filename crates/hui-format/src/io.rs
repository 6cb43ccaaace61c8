//! 写入侧 I/O 抽象层.
//!
//! 为封装器提供统一的写入接口, 支持文件、共享内存缓冲区和空输出后端.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use hui_core::HuiResult;

/// I/O 后端 trait
///
/// 实现此 trait 以支持不同的输出目标 (文件、内存、网络等).
pub trait IoBackend: Send {
    /// 全部写入
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    /// 定位 (seek)
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;
    /// 获取当前位置
    fn position(&mut self) -> io::Result<u64>;
    /// 刷新缓冲数据
    fn flush(&mut self) -> io::Result<()>;
    /// 是否支持 seek
    fn is_seekable(&self) -> bool;
}

/// I/O 上下文
///
/// 封装底层输出操作. 关闭后再写入会返回 I/O 错误.
pub struct IoContext {
    /// 内部 I/O 实现
    inner: Box<dyn IoBackend>,
    /// 是否已关闭
    closed: bool,
}

impl IoContext {
    /// 从 I/O 后端创建上下文
    pub fn new(backend: Box<dyn IoBackend>) -> Self {
        Self {
            inner: backend,
            closed: false,
        }
    }

    /// 从文件路径打开 (写入, 已存在时截断)
    pub fn open_write(path: impl AsRef<Path>) -> HuiResult<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!("打开输出文件: {}", path.display());
        Ok(Self::new(Box::new(FileBackend::new(file))))
    }

    /// 写入共享内存缓冲区
    pub fn memory(buffer: MemoryBuffer) -> Self {
        Self::new(Box::new(MemoryBackend::new(buffer)))
    }

    /// 丢弃所有写入的数据
    pub fn null() -> Self {
        Self::new(Box::new(NullBackend::default()))
    }

    // ========================
    // 写入方法
    // ========================

    /// 写入全部数据
    pub fn write_all(&mut self, buf: &[u8]) -> HuiResult<()> {
        self.check_open()?;
        self.inner.write_all(buf)?;
        Ok(())
    }

    /// 写入 u8
    pub fn write_u8(&mut self, v: u8) -> HuiResult<()> {
        self.write_all(&[v])
    }

    /// 写入 u16 小端
    pub fn write_u16_le(&mut self, v: u16) -> HuiResult<()> {
        self.write_all(&v.to_le_bytes())
    }

    /// 写入 u32 小端
    pub fn write_u32_le(&mut self, v: u32) -> HuiResult<()> {
        self.write_all(&v.to_le_bytes())
    }

    /// 写入 4 字节标签 (FourCC)
    pub fn write_tag(&mut self, tag: &[u8; 4]) -> HuiResult<()> {
        self.write_all(tag)
    }

    // ========================
    // 定位与生命周期
    // ========================

    /// 定位 (seek)
    pub fn seek(&mut self, pos: SeekFrom) -> HuiResult<u64> {
        self.check_open()?;
        Ok(self.inner.seek(pos)?)
    }

    /// 获取当前位置
    pub fn position(&mut self) -> HuiResult<u64> {
        Ok(self.inner.position()?)
    }

    /// 是否支持随机访问
    pub fn is_seekable(&self) -> bool {
        self.inner.is_seekable()
    }

    /// 刷新缓冲数据
    pub fn flush(&mut self) -> HuiResult<()> {
        self.check_open()?;
        self.inner.flush()?;
        Ok(())
    }

    /// 是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 刷新并关闭, 可重复调用
    pub fn close(&mut self) -> HuiResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.flush()?;
        Ok(())
    }

    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "I/O 上下文已关闭"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for IoContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoContext")
            .field("seekable", &self.is_seekable())
            .field("closed", &self.closed)
            .finish()
    }
}

/// 文件 I/O 后端
struct FileBackend {
    writer: BufWriter<File>,
}

impl FileBackend {
    fn new(file: File) -> Self {
        Self {
            writer: BufWriter::new(file),
        }
    }
}

impl IoBackend for FileBackend {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.writer.seek(pos)
    }

    fn position(&mut self) -> io::Result<u64> {
        self.writer.stream_position()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()
    }

    fn is_seekable(&self) -> bool {
        true
    }
}

/// 共享内存缓冲区
///
/// 克隆得到的句柄共享同一块数据, 会话关闭后持有者仍可读取结果.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer(Arc<Mutex<Vec<u8>>>);

impl MemoryBuffer {
    /// 创建空缓冲区
    pub fn new() -> Self {
        Self::default()
    }

    /// 复制当前内容
    pub fn to_vec(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// 当前数据长度
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // 写入者 panic 不影响已写入的字节
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 内存缓冲区 I/O 后端
struct MemoryBackend {
    /// 共享数据
    buffer: MemoryBuffer,
    /// 当前位置
    pos: usize,
}

impl MemoryBackend {
    fn new(buffer: MemoryBuffer) -> Self {
        let pos = buffer.len();
        Self { buffer, pos }
    }
}

impl IoBackend for MemoryBackend {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut data = self.buffer.lock();
        let end = self.pos + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(())
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.buffer.len() as i64;
        let target = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::Current(off) => self.pos as i64 + off,
            SeekFrom::End(off) => len + off,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek 到负位置",
            ));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.pos as u64)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn is_seekable(&self) -> bool {
        true
    }
}

/// 空输出后端, 只统计写入量
#[derive(Default)]
struct NullBackend {
    pos: u64,
}

impl IoBackend for NullBackend {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "空输出不支持 seek"))
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn is_seekable(&self) -> bool {
        false
    }
}
