//! 测试信号合成: 移动渐变视频帧与正弦音频帧.

use std::f64::consts::PI;

use hui::codec::{AudioFrame, EncoderSettings, VideoFrame};
use hui::core::SampleFormat;

/// 正弦音频的频率 (Hz)
pub const TONE_HZ: f64 = 440.0;

/// 每个音频帧的采样数
pub const AUDIO_FRAME_SAMPLES: u32 = 1024;

/// 生成第 `index` 帧移动渐变
///
/// 亮度平面为随帧号平移的对角渐变, 其余平面填充中性值.
pub fn gradient_frame(settings: &EncoderSettings, index: i64) -> VideoFrame {
    let mut frame = VideoFrame::alloc(settings.width, settings.height, settings.pixel_format);
    let shift = (index * 4) as usize;
    for (plane, data) in frame.data.iter_mut().enumerate() {
        let linesize = frame.linesize[plane];
        if plane > 0 || linesize == 0 {
            data.fill(128);
            continue;
        }
        for (y, row) in data.chunks_mut(linesize).enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = ((x + y + shift) & 0xFF) as u8;
            }
        }
    }
    frame.pts = index;
    frame.time_base = settings.time_base;
    frame
}

/// 生成从 `start` 采样点开始的正弦音频帧
pub fn tone_frame(settings: &EncoderSettings, start: i64, nb_samples: u32) -> AudioFrame {
    let format = settings.sample_format;
    let layout = settings.channel_layout;
    let channels = layout.channels as usize;
    let mut frame = AudioFrame::new(nb_samples, settings.sample_rate, format, layout);

    for i in 0..nb_samples as i64 {
        let t = (start + i) as f64 / f64::from(settings.sample_rate.max(1));
        let value = (t * TONE_HZ * 2.0 * PI).sin() * 0.5;
        for ch in 0..channels {
            let plane = if format.is_planar() { ch } else { 0 };
            push_sample(&mut frame.data[plane], format, value);
        }
    }
    frame.pts = start;
    frame.time_base = settings.time_base;
    frame.duration = i64::from(nb_samples);
    frame
}

fn push_sample(buf: &mut Vec<u8>, format: SampleFormat, value: f64) {
    match format {
        SampleFormat::U8 => buf.push(((value * 127.0) + 128.0) as u8),
        SampleFormat::S16 | SampleFormat::S16p => {
            buf.extend_from_slice(&((value * 32767.0) as i16).to_le_bytes())
        }
        SampleFormat::S32 => {
            buf.extend_from_slice(&((value * f64::from(i32::MAX)) as i32).to_le_bytes())
        }
        SampleFormat::F32 | SampleFormat::F32p => {
            buf.extend_from_slice(&(value as f32).to_le_bytes())
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hui::core::{ChannelLayout, PixelFormat, Rational};

    fn settings_for(codec: &str) -> EncoderSettings {
        let codecs = hui::default_codec_registry();
        EncoderSettings::defaults_for(codecs.resolve_encoder(codec).unwrap())
    }

    fn video_settings() -> EncoderSettings {
        let mut settings = settings_for("rawvideo");
        settings.width = 8;
        settings.height = 4;
        settings.pixel_format = PixelFormat::Yuv420p;
        settings.time_base = Rational::new(1, 25);
        settings
    }

    #[test]
    fn test_渐变帧平面大小() {
        let frame = gradient_frame(&video_settings(), 2);
        assert_eq!(frame.data[0].len(), 32);
        assert_eq!(frame.data[1].len(), 8);
        assert_eq!(frame.data[0][0], 8);
        assert_eq!(frame.data[0][1], 9);
        assert!(frame.data[2].iter().all(|&v| v == 128));
        assert_eq!(frame.pts, 2);
    }

    #[test]
    fn test_正弦帧交错布局() {
        let mut settings = settings_for("pcm_s16le");
        settings.sample_rate = 8000;
        settings.sample_format = SampleFormat::S16;
        settings.channel_layout = ChannelLayout::STEREO;
        let frame = tone_frame(&settings, 160, 10);
        assert_eq!(frame.data.len(), 1);
        assert_eq!(frame.data[0].len(), 10 * 2 * 2);
        assert_eq!(frame.pts, 160);
        assert_eq!(frame.duration, 10);
        // 左右声道相同
        assert_eq!(frame.data[0][0..2], frame.data[0][2..4]);
    }
}
