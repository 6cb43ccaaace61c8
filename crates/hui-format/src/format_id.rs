//! 容器格式标识.

use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FormatId {
    /// RIFF WAVE
    Wav,
    /// 裸视频帧
    RawVideo,
    /// 裸 PCM
    RawAudio,
    /// 丢弃一切输出
    Null,
}

/// (标识, 名称, 扩展名)
const KNOWN: &[(FormatId, &str, &[&str])] = &[
    (FormatId::Wav, "wav", &["wav"]),
    (FormatId::RawVideo, "rawvideo", &["yuv", "rgb"]),
    (FormatId::RawAudio, "rawaudio", &["pcm", "raw"]),
    (FormatId::Null, "null", &[]),
];

impl FormatId {
    pub fn name(self) -> &'static str {
        KNOWN
            .iter()
            .find(|(id, ..)| *id == self)
            .map_or("unknown", |(_, name, _)| *name)
    }

    /// 不带点的扩展名, 忽略大小写
    pub fn from_extension(ext: &str) -> Option<FormatId> {
        KNOWN
            .iter()
            .find(|(_, _, exts)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|(id, ..)| *id)
    }

    /// 按输出路径的扩展名猜测
    pub fn from_filename(filename: &str) -> Option<FormatId> {
        let ext = Path::new(filename).extension()?.to_str()?;
        Self::from_extension(ext)
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_按文件名猜测() {
        assert_eq!(FormatId::from_filename("out/a.WAV"), Some(FormatId::Wav));
        assert_eq!(FormatId::from_filename("clip.yuv"), Some(FormatId::RawVideo));
        assert_eq!(FormatId::from_filename("dir.d/noext"), None);
        assert_eq!(FormatId::from_filename("a.mkv"), None);
        assert_eq!(FormatId::Null.to_string(), "null");
    }
}
