//! 像素格式与平面布局.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    None,
    /// 视频流的默认格式
    Yuv420p,
    Yuv422p,
    Yuv444p,
    /// Y 平面加 UV 交错平面, 4:2:0
    Nv12,
    Rgb24,
    Rgba,
    Gray8,
}

/// 单个平面: 每像素字节数, 水平/垂直方向的 log2 缩小倍数
#[derive(Clone, Copy)]
struct Plane {
    bytes: usize,
    shift_w: u32,
    shift_h: u32,
}

const fn plane(bytes: usize, shift_w: u32, shift_h: u32) -> Plane {
    Plane {
        bytes,
        shift_w,
        shift_h,
    }
}

const LUMA: Plane = plane(1, 0, 0);
const CHROMA_420: Plane = plane(1, 1, 1);
const CHROMA_422: Plane = plane(1, 1, 0);

const YUV420P: &[Plane] = &[LUMA, CHROMA_420, CHROMA_420];
const YUV422P: &[Plane] = &[LUMA, CHROMA_422, CHROMA_422];
const YUV444P: &[Plane] = &[LUMA, LUMA, LUMA];
const NV12: &[Plane] = &[LUMA, plane(2, 1, 1)];
const RGB24: &[Plane] = &[plane(3, 0, 0)];
const RGBA: &[Plane] = &[plane(4, 0, 0)];
const GRAY8: &[Plane] = &[LUMA];

impl PixelFormat {
    fn planes(self) -> &'static [Plane] {
        match self {
            Self::None => &[],
            Self::Yuv420p => YUV420P,
            Self::Yuv422p => YUV422P,
            Self::Yuv444p => YUV444P,
            Self::Nv12 => NV12,
            Self::Rgb24 => RGB24,
            Self::Rgba => RGBA,
            Self::Gray8 => GRAY8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Yuv420p => "yuv420p",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Nv12 => "nv12",
            Self::Rgb24 => "rgb24",
            Self::Rgba => "rgba",
            Self::Gray8 => "gray8",
        }
    }

    pub fn plane_count(self) -> u32 {
        self.planes().len() as u32
    }

    /// 平面一行的字节数, 平面不存在时为 None; 奇数尺寸向上取整
    pub fn plane_linesize(self, index: usize, width: u32) -> Option<usize> {
        let p = self.planes().get(index)?;
        Some(width.div_ceil(1 << p.shift_w) as usize * p.bytes)
    }

    /// 平面的行数
    pub fn plane_height(self, index: usize, height: u32) -> Option<usize> {
        let p = self.planes().get(index)?;
        Some(height.div_ceil(1 << p.shift_h) as usize)
    }

    /// 一帧所有平面的字节总数
    pub fn frame_size(self, width: u32, height: u32) -> Option<usize> {
        if self.planes().is_empty() {
            return None;
        }
        (0..self.planes().len())
            .map(|i| Some(self.plane_linesize(i, width)? * self.plane_height(i, height)?))
            .sum()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name == "gray" {
            return Some(Self::Gray8);
        }
        [
            Self::Yuv420p,
            Self::Yuv422p,
            Self::Yuv444p,
            Self::Nv12,
            Self::Rgb24,
            Self::Rgba,
            Self::Gray8,
        ]
        .into_iter()
        .find(|pf| pf.name() == name)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuv_平面尺寸() {
        let pf = PixelFormat::Yuv420p;
        assert_eq!(pf.frame_size(640, 480), Some(640 * 480 * 3 / 2));
        assert_eq!(pf.plane_linesize(1, 640), Some(320));
        assert_eq!(pf.plane_height(2, 480), Some(240));
        assert_eq!(PixelFormat::Yuv422p.plane_height(1, 480), Some(480));
        // 奇数宽高的色度平面向上取整
        assert_eq!(pf.plane_linesize(1, 5), Some(3));
        assert_eq!(pf.frame_size(5, 3), Some(15 + 3 * 2 * 2));
    }

    #[test]
    fn test_交错与打包格式() {
        assert_eq!(PixelFormat::Nv12.plane_linesize(1, 1920), Some(1920));
        assert_eq!(PixelFormat::Nv12.frame_size(1920, 1080), Some(1920 * 1080 * 3 / 2));
        assert_eq!(PixelFormat::Rgb24.frame_size(4, 2), Some(24));
        assert_eq!(PixelFormat::Rgba.frame_size(4, 2), Some(32));
        assert_eq!(PixelFormat::Gray8.frame_size(320, 240), Some(320 * 240));
    }

    #[test]
    fn test_无效平面() {
        assert_eq!(PixelFormat::None.frame_size(16, 16), None);
        assert_eq!(PixelFormat::None.plane_count(), 0);
        assert_eq!(PixelFormat::Rgb24.plane_linesize(1, 16), None);
        assert_eq!(PixelFormat::Yuv420p.plane_height(3, 16), None);
    }

    #[test]
    fn test_名称互查() {
        for pf in [PixelFormat::Yuv420p, PixelFormat::Nv12, PixelFormat::Rgba] {
            assert_eq!(PixelFormat::from_name(&pf.to_string()), Some(pf));
        }
        assert_eq!(PixelFormat::from_name("gray"), Some(PixelFormat::Gray8));
        assert_eq!(PixelFormat::from_name("none"), None);
    }
}
