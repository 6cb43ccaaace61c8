//! hui - 输出会话命令行工具
//!
//! 合成一段移动渐变视频和/或正弦音频, 经声明的输出流编码后封装到容器.

mod args;
mod synth;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

use hui::codec::{Frame, Packet};
use hui::core::{Dictionary, MediaType};
use hui::logging::{self, LoggingConfig};
use hui::output::{LogSink, OutputContainer, StreamRequest};

use args::{parse_key_value, parse_rate, parse_size};
use synth::{AUDIO_FRAME_SAMPLES, gradient_frame, tone_frame};

#[derive(Parser, Debug)]
#[command(name = "hui", version, about = "纯 Rust 多路复用输出工具")]
struct Cli {
    /// 输出文件路径
    #[arg(short, long)]
    output: String,

    /// 输出格式名称 (未指定时按扩展名猜测)
    #[arg(short = 'f', long = "format")]
    format: Option<String>,

    /// 视频编码器名称, "none" 表示不输出视频
    #[arg(long = "vcodec")]
    vcodec: Option<String>,

    /// 音频编码器名称, "none" 表示不输出音频
    #[arg(long = "acodec")]
    acodec: Option<String>,

    /// 视频帧率 (如 "25" 或 "30000/1001")
    #[arg(short = 'r', long = "rate")]
    rate: Option<String>,

    /// 音频采样率 (Hz)
    #[arg(long)]
    ar: Option<u32>,

    /// 视频分辨率 (如 "320x240")
    #[arg(short = 's', long = "size")]
    size: Option<String>,

    /// 合成时长 (秒)
    #[arg(short = 't', long = "duration", default_value_t = 1.0)]
    duration: f64,

    /// 会话选项, 可重复 (如 --opt b=64000)
    #[arg(long = "opt", value_parser = parse_key_value)]
    opts: Vec<(String, String)>,

    /// 容器元数据, 可重复 (如 --metadata title=demo)
    #[arg(long = "metadata", value_parser = parse_key_value)]
    metadata: Vec<(String, String)>,

    /// 日志配置文件 (JSON)
    #[arg(long = "log-config")]
    log_config: Option<PathBuf>,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 单条输出流的统计
struct StreamSummary {
    index: usize,
    codec: &'static str,
    media_type: MediaType,
    packets: u64,
    bytes: u64,
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.log_config {
        Some(path) => match LoggingConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("错误: {e:#}");
                process::exit(1);
            }
        },
        None => LoggingConfig::default(),
    };
    if let Err(e) = logging::init(&config.with_verbosity(cli.verbose)) {
        eprintln!("警告: {e:#}");
    }

    match run(&cli) {
        Ok(summaries) => print_summary(&cli.output, &summaries),
        Err(e) => {
            eprintln!("错误: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<Vec<StreamSummary>> {
    if cli.duration.is_nan() || cli.duration <= 0.0 {
        bail!("时长必须为正数: {}", cli.duration);
    }

    let options: Dictionary = cli.opts.iter().cloned().collect();
    let mut output = hui::open_output(&cli.output, cli.format.as_deref())
        .with_context(|| format!("无法创建输出 '{}'", cli.output))?
        .with_options(options)
        .with_diagnostics(LogSink);
    for (key, value) in &cli.metadata {
        output.metadata_mut().set(key.as_str(), value.as_str());
    }
    eprintln!(
        "hui 版本 {} -- 输出 '{}' (格式 {})",
        hui::version(),
        cli.output,
        output.format().name
    );

    let produced = produce(&mut output, cli);
    finish(&mut output, produced)
}

/// 关闭会话
///
/// 成功时严格关闭并报告尾部错误. 失败时尽力写尾部并释放编码器和文件,
/// 关闭自身的错误只记日志, 返回原始错误.
fn finish<T>(output: &mut OutputContainer, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            output.close(true).context("写入容器尾部失败")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(close_err) = output.close(false) {
                warn!("出错后关闭输出失败: {close_err}");
            }
            Err(e)
        }
    }
}

/// 声明流, 写头部, 交替合成并写入音视频帧, 最后刷新编码器
fn produce(output: &mut OutputContainer, cli: &Cli) -> Result<Vec<StreamSummary>> {
    let video = declare_video(output, cli)?;
    let audio = declare_audio(output, cli)?;
    if video.is_none() && audio.is_none() {
        bail!("没有可输出的流");
    }

    output.start().context("写入容器头部失败")?;

    let mut summaries: Vec<StreamSummary> = output
        .streams()
        .iter()
        .map(|stream| StreamSummary {
            index: stream.index(),
            codec: stream.context().encoder().name,
            media_type: stream.media_type(),
            packets: 0,
            bytes: 0,
        })
        .collect();

    let video_settings = video.and_then(|i| output.stream(i)).map(|s| s.settings().clone());
    let audio_settings = audio.and_then(|i| output.stream(i)).map(|s| s.settings().clone());

    let nb_video_frames = video_settings
        .as_ref()
        .map_or(0, |s| (cli.duration * s.frame_rate.to_f64()).round() as i64);
    let total_samples = audio_settings
        .as_ref()
        .map_or(0, |s| (cli.duration * f64::from(s.sample_rate)).round() as i64);

    let mut next_frame = 0i64;
    let mut next_sample = 0i64;
    loop {
        let video_time = video_settings
            .as_ref()
            .filter(|_| next_frame < nb_video_frames)
            .map(|s| next_frame as f64 / s.frame_rate.to_f64());
        let audio_time = audio_settings
            .as_ref()
            .filter(|_| next_sample < total_samples)
            .map(|s| next_sample as f64 / f64::from(s.sample_rate));

        match (video_time, audio_time) {
            (None, None) => break,
            (Some(v), a) if a.is_none_or(|a| v <= a) => {
                if let (Some(index), Some(settings)) = (video, video_settings.as_ref()) {
                    let frame = Frame::Video(gradient_frame(settings, next_frame));
                    encode_and_write(output, index, Some(&frame), &mut summaries)?;
                }
                next_frame += 1;
            }
            _ => {
                if let (Some(index), Some(settings)) = (audio, audio_settings.as_ref()) {
                    let count = (total_samples - next_sample).min(i64::from(AUDIO_FRAME_SAMPLES));
                    let frame = Frame::Audio(tone_frame(settings, next_sample, count as u32));
                    encode_and_write(output, index, Some(&frame), &mut summaries)?;
                    next_sample += count;
                } else {
                    next_sample = total_samples;
                }
            }
        }
    }

    for index in [video, audio].into_iter().flatten() {
        encode_and_write(output, index, None, &mut summaries)?;
    }
    Ok(summaries)
}

fn declare_video(output: &mut OutputContainer, cli: &Cli) -> Result<Option<usize>> {
    let Some(codec) = pick_codec(cli.vcodec.as_deref(), output.default_video_codec()) else {
        return Ok(None);
    };
    if !output.format().supports_media(MediaType::Video) {
        if cli.vcodec.is_some() {
            warn!("格式 {} 不支持视频, 忽略 --vcodec", output.format().name);
        }
        return Ok(None);
    }

    let mut request = StreamRequest::codec(codec);
    if let Some(rate) = &cli.rate {
        let rate = parse_rate(rate).with_context(|| format!("无效的帧率 '{rate}'"))?;
        request = request.rate(rate);
    }
    if let Some(size) = &cli.size {
        let (width, height) = parse_size(size).with_context(|| format!("无效的分辨率 '{size}'"))?;
        request = request.width(width).height(height);
    }
    let stream = output
        .declare_stream(request)
        .with_context(|| format!("无法声明视频流 {codec}"))?;
    info!(
        "视频流 #{}: {} {}x{} @ {}",
        stream.index(),
        codec,
        stream.settings().width,
        stream.settings().height,
        stream.settings().frame_rate
    );
    Ok(Some(stream.index()))
}

fn declare_audio(output: &mut OutputContainer, cli: &Cli) -> Result<Option<usize>> {
    let Some(codec) = pick_codec(cli.acodec.as_deref(), output.default_audio_codec()) else {
        return Ok(None);
    };
    if !output.format().supports_media(MediaType::Audio) {
        if cli.acodec.is_some() {
            warn!("格式 {} 不支持音频, 忽略 --acodec", output.format().name);
        }
        return Ok(None);
    }

    let mut request = StreamRequest::codec(codec);
    if let Some(ar) = cli.ar {
        let ar = i32::try_from(ar).with_context(|| format!("无效的采样率 {ar}"))?;
        request = request.rate(ar);
    }
    let stream = output
        .declare_stream(request)
        .with_context(|| format!("无法声明音频流 {codec}"))?;
    info!(
        "音频流 #{}: {} {} Hz, {} 声道",
        stream.index(),
        codec,
        stream.settings().sample_rate,
        stream.settings().channel_layout.channels
    );
    Ok(Some(stream.index()))
}

fn pick_codec<'a>(requested: Option<&'a str>, default: Option<&'static str>) -> Option<&'a str> {
    match requested {
        Some("none") => None,
        Some(name) => Some(name),
        None => default,
    }
}

fn encode_and_write(
    output: &mut OutputContainer,
    index: usize,
    frame: Option<&Frame>,
    summaries: &mut [StreamSummary],
) -> Result<()> {
    let stream = output
        .stream_mut(index)
        .with_context(|| format!("流 {index} 不存在"))?;
    let packets: Vec<Packet> = stream
        .encode(frame)
        .with_context(|| format!("流 {index} 编码失败"))?;
    if let Some(summary) = summaries.get_mut(index) {
        summary.packets += packets.len() as u64;
        summary.bytes += packets.iter().map(|p| p.size() as u64).sum::<u64>();
    }
    output
        .write_all(packets)
        .with_context(|| format!("流 {index} 写入失败"))
}

fn print_summary(path: &str, summaries: &[StreamSummary]) {
    for s in summaries {
        eprintln!(
            "  流 #{}: {} ({}), {} 个数据包, {} 字节",
            s.index, s.codec, s.media_type, s.packets, s.bytes
        );
    }
    match std::fs::metadata(path) {
        Ok(meta) => eprintln!("输出文件大小: {} 字节", meta.len()),
        Err(_) => eprintln!("输出完成 (无文件)"),
    }
}
