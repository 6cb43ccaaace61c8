//! PCM 编码器.
//!
//! 输入为交错格式的小端采样. 各变体只在输入采样格式和是否需要翻转字节序上不同.

use hui_core::{Dictionary, HuiError, HuiResult, SampleFormat};
use log::debug;

use super::OneShotQueue;
use crate::codec_id::CodecId;
use crate::codec_parameters::CodecParameters;
use crate::encoder::Encoder;
use crate::frame::Frame;
use crate::packet::Packet;

/// 输出字节序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    /// 按采样宽度翻转每个采样的字节
    Big,
}

pub struct PcmEncoder {
    codec_id: CodecId,
    input: SampleFormat,
    endian: Endian,
    channels: u32,
    queue: OneShotQueue,
}

impl PcmEncoder {
    fn with_variant(codec_id: CodecId) -> HuiResult<Box<dyn Encoder>> {
        let (input, endian) = match codec_id {
            CodecId::PcmU8 => (SampleFormat::U8, Endian::Little),
            CodecId::PcmS16le => (SampleFormat::S16, Endian::Little),
            CodecId::PcmS16be => (SampleFormat::S16, Endian::Big),
            CodecId::PcmS32le => (SampleFormat::S32, Endian::Little),
            CodecId::PcmF32le => (SampleFormat::F32, Endian::Little),
            other => return Err(HuiError::CodecNotFound(format!("{other} 不是 PCM 编码"))),
        };
        Ok(Box::new(Self {
            codec_id,
            input,
            endian,
            channels: 0,
            queue: OneShotQueue::default(),
        }))
    }

    pub fn new_u8() -> HuiResult<Box<dyn Encoder>> {
        Self::with_variant(CodecId::PcmU8)
    }

    pub fn new_s16le() -> HuiResult<Box<dyn Encoder>> {
        Self::with_variant(CodecId::PcmS16le)
    }

    pub fn new_s16be() -> HuiResult<Box<dyn Encoder>> {
        Self::with_variant(CodecId::PcmS16be)
    }

    pub fn new_s32le() -> HuiResult<Box<dyn Encoder>> {
        Self::with_variant(CodecId::PcmS32le)
    }

    pub fn new_f32le() -> HuiResult<Box<dyn Encoder>> {
        Self::with_variant(CodecId::PcmF32le)
    }

    fn convert(&self, samples: &[u8]) -> Vec<u8> {
        match self.endian {
            Endian::Little => samples.to_vec(),
            Endian::Big => {
                let width = self.input.bytes_per_sample() as usize;
                samples
                    .chunks_exact(width)
                    .flat_map(|sample| sample.iter().rev().copied())
                    .collect()
            }
        }
    }
}

impl Encoder for PcmEncoder {
    fn codec_id(&self) -> CodecId {
        self.codec_id
    }

    fn name(&self) -> &str {
        self.codec_id.name()
    }

    fn open(&mut self, params: &CodecParameters, _options: &mut Dictionary) -> HuiResult<()> {
        let Some(audio) = params.audio() else {
            return Err(HuiError::InvalidArgument(format!("{} 只能编码音频", self.name())));
        };
        if audio.sample_rate == 0 || audio.channel_layout.channels == 0 {
            return Err(HuiError::InvalidArgument(format!(
                "非法的音频参数: {} Hz, {} 声道",
                audio.sample_rate, audio.channel_layout.channels
            )));
        }
        self.channels = audio.channel_layout.channels;
        self.queue.arm();
        debug!(
            "{}: {} Hz {} 输入 {}",
            self.name(),
            audio.sample_rate,
            audio.channel_layout,
            self.input
        );
        Ok(())
    }

    fn send_frame(&mut self, frame: Option<&Frame>) -> HuiResult<()> {
        let Some(frame) = self.queue.admit(frame)? else {
            return Ok(());
        };
        let Frame::Audio(audio) = frame else {
            return Err(HuiError::InvalidArgument(format!("{} 收到了视频帧", self.name())));
        };
        if audio.sample_format != self.input || audio.channel_layout.channels != self.channels {
            return Err(HuiError::InvalidArgument(format!(
                "{} 需要 {} 声道 {} 采样, 帧为 {} 声道 {}",
                self.name(),
                self.channels,
                self.input,
                audio.channel_layout.channels,
                audio.sample_format
            )));
        }
        let samples = audio.data.first().map_or(&[][..], Vec::as_slice);
        if samples.len() != audio.buffer_len() {
            return Err(HuiError::InvalidData(format!(
                "{} 个采样需要 {} 字节, 帧有 {}",
                audio.nb_samples,
                audio.buffer_len(),
                samples.len()
            )));
        }
        let payload = self.convert(samples);
        self.queue.emit(frame, payload);
        Ok(())
    }

    fn receive_packet(&mut self) -> HuiResult<Packet> {
        self.queue.take()
    }

    fn flush(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec_parameters::{AudioParams, MediaParams};
    use crate::frame::AudioFrame;
    use hui_core::ChannelLayout;

    fn open(mut enc: Box<dyn Encoder>, channels: u32) -> Box<dyn Encoder> {
        let params = CodecParameters {
            codec_id: enc.codec_id(),
            media: MediaParams::Audio(AudioParams {
                sample_rate: 8000,
                channel_layout: ChannelLayout::from_channels(channels),
                sample_format: SampleFormat::None,
                frame_size: 0,
            }),
            ..CodecParameters::default()
        };
        enc.open(&params, &mut Dictionary::new()).unwrap();
        enc
    }

    fn frame(format: SampleFormat, channels: u32, data: Vec<u8>) -> Frame {
        let per_frame = format.bytes_per_sample() * channels;
        let mut audio = AudioFrame::new(
            data.len() as u32 / per_frame,
            8000,
            format,
            ChannelLayout::from_channels(channels),
        );
        audio.data[0] = data;
        audio.pts = 100;
        Frame::Audio(audio)
    }

    #[test]
    fn test_小端变体原样输出() {
        let mut enc = open(PcmEncoder::new_u8().unwrap(), 1);
        enc.send_frame(Some(&frame(SampleFormat::U8, 1, vec![0, 64, 128, 255])))
            .unwrap();
        let pkt = enc.receive_packet().unwrap();
        assert_eq!(&pkt.data[..], &[0, 64, 128, 255]);
        assert_eq!((pkt.pts, pkt.dts), (100, 100));
        assert_eq!(enc.name(), "pcm_u8");
    }

    #[test]
    fn test_s16be_翻转字节序() {
        let mut enc = open(PcmEncoder::new_s16be().unwrap(), 2);
        enc.send_frame(Some(&frame(SampleFormat::S16, 2, vec![0x34, 0x12, 0xFF, 0x7F])))
            .unwrap();
        let pkt = enc.receive_packet().unwrap();
        assert_eq!(&pkt.data[..], &[0x12, 0x34, 0x7F, 0xFF]);
    }

    #[test]
    fn test_输入格式必须匹配() {
        let mut enc = open(PcmEncoder::new_s16le().unwrap(), 2);
        let wrong_format = frame(SampleFormat::F32, 2, vec![0; 8]);
        assert!(matches!(
            enc.send_frame(Some(&wrong_format)),
            Err(HuiError::InvalidArgument(_))
        ));
        let wrong_channels = frame(SampleFormat::S16, 1, vec![0; 4]);
        assert!(matches!(
            enc.send_frame(Some(&wrong_channels)),
            Err(HuiError::InvalidArgument(_))
        ));

        let mut truncated = AudioFrame::new(4, 8000, SampleFormat::S16, ChannelLayout::STEREO);
        truncated.data[0] = vec![0; 6];
        assert!(matches!(
            enc.send_frame(Some(&Frame::Audio(truncated))),
            Err(HuiError::InvalidData(_))
        ));
    }

    #[test]
    fn test_打开参数校验() {
        let mut enc = PcmEncoder::new_s16le().unwrap();
        let params = CodecParameters {
            codec_id: CodecId::PcmS16le,
            media: MediaParams::Audio(AudioParams {
                sample_rate: 8000,
                channel_layout: ChannelLayout::from_channels(0),
                sample_format: SampleFormat::S16,
                frame_size: 0,
            }),
            ..CodecParameters::default()
        };
        assert!(matches!(
            enc.open(&params, &mut Dictionary::new()),
            Err(HuiError::InvalidArgument(_))
        ));
        assert!(PcmEncoder::with_variant(CodecId::RawVideo).is_err());
    }

    #[test]
    fn test_刷新后返回结束() {
        let mut enc = open(PcmEncoder::new_f32le().unwrap(), 1);
        enc.send_frame(None).unwrap();
        assert!(matches!(enc.receive_packet(), Err(HuiError::Eof)));
        enc.flush();
        assert!(matches!(enc.receive_packet(), Err(HuiError::NeedMoreData)));
    }
}
