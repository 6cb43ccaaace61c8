//! 未压缩视频编码器: 把各平面首尾相接作为数据包负载.

use hui_core::{Dictionary, HuiError, HuiResult, PixelFormat};
use log::debug;

use super::OneShotQueue;
use crate::codec_id::CodecId;
use crate::codec_parameters::CodecParameters;
use crate::encoder::Encoder;
use crate::frame::Frame;
use crate::packet::Packet;

pub struct RawVideoEncoder {
    pixel_format: PixelFormat,
    /// 整帧字节数, 打开时由尺寸和像素格式算出
    frame_bytes: usize,
    queue: OneShotQueue,
}

impl RawVideoEncoder {
    pub fn create() -> HuiResult<Box<dyn Encoder>> {
        Ok(Box::new(Self {
            pixel_format: PixelFormat::None,
            frame_bytes: 0,
            queue: OneShotQueue::default(),
        }))
    }
}

impl Encoder for RawVideoEncoder {
    fn codec_id(&self) -> CodecId {
        CodecId::RawVideo
    }

    fn name(&self) -> &str {
        "rawvideo"
    }

    fn open(&mut self, params: &CodecParameters, _options: &mut Dictionary) -> HuiResult<()> {
        let Some(video) = params.video() else {
            return Err(HuiError::InvalidArgument("rawvideo 只能编码视频".into()));
        };
        if video.width == 0 || video.height == 0 {
            return Err(HuiError::InvalidArgument(format!(
                "非法的图像尺寸 {}x{}",
                video.width, video.height
            )));
        }
        self.frame_bytes = video
            .pixel_format
            .frame_size(video.width, video.height)
            .ok_or_else(|| {
                HuiError::InvalidArgument(format!("像素格式 {} 无法编码", video.pixel_format))
            })?;
        self.pixel_format = video.pixel_format;
        self.queue.arm();
        debug!(
            "rawvideo: {}x{} {}, 每帧 {} 字节",
            video.width, video.height, self.pixel_format, self.frame_bytes
        );
        Ok(())
    }

    fn send_frame(&mut self, frame: Option<&Frame>) -> HuiResult<()> {
        let Some(frame) = self.queue.admit(frame)? else {
            return Ok(());
        };
        let Frame::Video(picture) = frame else {
            return Err(HuiError::InvalidArgument("rawvideo 收到了音频帧".into()));
        };
        if picture.pixel_format != self.pixel_format {
            return Err(HuiError::InvalidArgument(format!(
                "像素格式不符: 打开时为 {}, 帧为 {}",
                self.pixel_format, picture.pixel_format
            )));
        }
        let len = picture.payload_len();
        if len != self.frame_bytes {
            return Err(HuiError::InvalidData(format!(
                "帧有 {len} 字节, 应为 {}",
                self.frame_bytes
            )));
        }
        self.queue.emit(frame, picture.data.concat());
        Ok(())
    }

    fn receive_packet(&mut self) -> HuiResult<Packet> {
        self.queue.take()
    }

    fn flush(&mut self) {
        self.queue.clear();
    }
}
