//! 跨流交错写入缓冲.
//!
//! 每条流一个 FIFO 队列. 当所有流都至少有一个待写数据包时, 释放 DTS 最小的那个;
//! 某条流长时间没有数据时, 队列跨度超过 `max_delta` 也会强制释放.
//! 封装结束时按同样的顺序清空全部队列.

use std::cmp::Ordering;
use std::collections::VecDeque;

use log::trace;

use hui_codec::Packet;
use hui_core::rational::compare_ts;
use hui_core::{HuiError, HuiResult, NOPTS_VALUE, to_micros};

/// 默认最大交错跨度: 10 秒 (微秒)
pub const DEFAULT_MAX_INTERLEAVE_DELTA: i64 = 10_000_000;

/// 交错缓冲
#[derive(Debug)]
pub struct Interleaver {
    /// 各流待写队列
    queues: Vec<VecDeque<Packet>>,
    /// 各流最后入队的 DTS
    last_dts: Vec<Option<i64>>,
    /// 已入队数据包中最大的 DTS (微秒)
    newest_us: Option<i64>,
    /// 最大交错跨度 (微秒), 0 表示只在所有流就绪时释放
    max_delta_us: i64,
}

impl Interleaver {
    /// 为 `nb_streams` 条流创建交错缓冲
    pub fn new(nb_streams: usize) -> Self {
        Self {
            queues: (0..nb_streams).map(|_| VecDeque::new()).collect(),
            last_dts: vec![None; nb_streams],
            newest_us: None,
            max_delta_us: DEFAULT_MAX_INTERLEAVE_DELTA,
        }
    }

    /// 设置最大交错跨度 (微秒)
    pub fn set_max_delta(&mut self, delta_us: i64) {
        self.max_delta_us = delta_us.max(0);
    }

    /// 待写数据包总数
    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// 是否没有待写数据包
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    /// 数据包入队
    ///
    /// DTS 未定义时使用 PTS. 同一条流的 DTS 不允许回退, PTS 不允许小于 DTS.
    pub fn push(&mut self, mut packet: Packet) -> HuiResult<()> {
        let index = packet.stream_index;
        if index >= self.queues.len() {
            return Err(HuiError::InvalidArgument(format!(
                "流索引 {} 超出范围 (共 {} 条流)",
                index,
                self.queues.len()
            )));
        }
        if packet.dts == NOPTS_VALUE {
            packet.dts = packet.pts;
        }
        if packet.dts != NOPTS_VALUE {
            match self.last_dts[index] {
                Some(last) if packet.dts < last => {
                    return Err(HuiError::InvalidData(format!(
                        "流 {} 的 DTS 非单调: {} < {}",
                        index, packet.dts, last
                    )));
                }
                _ => {}
            }
            if packet.pts != NOPTS_VALUE && packet.pts < packet.dts {
                return Err(HuiError::InvalidData(format!(
                    "流 {} 的 PTS {} 小于 DTS {}",
                    index, packet.pts, packet.dts
                )));
            }
            self.last_dts[index] = Some(packet.dts);
            if let Some(us) = to_micros(packet.dts, packet.time_base) {
                self.newest_us = Some(self.newest_us.map_or(us, |n| n.max(us)));
            }
        }
        trace!(
            "交错入队: 流 {}, dts={}, 队列长度={}",
            index,
            packet.dts,
            self.queues[index].len() + 1
        );
        self.queues[index].push_back(packet);
        Ok(())
    }

    /// 取出下一个可以写入的数据包
    ///
    /// `flush` 为 true 时不再等待其他流, 直接按 DTS 顺序清空.
    pub fn pop(&mut self, flush: bool) -> Option<Packet> {
        let next = self.next_index()?;
        let ready = flush
            || self.queues.iter().all(|q| !q.is_empty())
            || self.span_exceeded(next);
        if !ready {
            return None;
        }
        self.queues[next].pop_front()
    }

    /// DTS 最小的队首所在的流, 相同时取索引小的
    fn next_index(&self) -> Option<usize> {
        let mut best: Option<(usize, &Packet)> = None;
        for (index, queue) in self.queues.iter().enumerate() {
            let Some(head) = queue.front() else {
                continue;
            };
            best = match best {
                Some((_, cur)) if !is_earlier(head, cur) => best,
                _ => Some((index, head)),
            };
        }
        best.map(|(index, _)| index)
    }

    fn span_exceeded(&self, index: usize) -> bool {
        if self.max_delta_us == 0 {
            return false;
        }
        let (Some(newest), Some(head)) = (self.newest_us, self.queues[index].front()) else {
            return false;
        };
        to_micros(head.dts, head.time_base)
            .is_some_and(|head_us| newest - head_us > self.max_delta_us)
    }
}

/// `a` 是否严格早于 `b`; 未定义 DTS 视为最早
fn is_earlier(a: &Packet, b: &Packet) -> bool {
    match (a.dts == NOPTS_VALUE, b.dts == NOPTS_VALUE) {
        (true, _) => b.dts != NOPTS_VALUE,
        (false, true) => false,
        (false, false) => compare_ts(a.dts, a.time_base, b.dts, b.time_base) == Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hui_core::Rational;

    fn packet(index: usize, dts: i64, tb: Rational) -> Packet {
        let mut pkt = Packet::from_data(vec![index as u8]);
        pkt.stream_index = index;
        pkt.pts = dts;
        pkt.dts = dts;
        pkt.time_base = tb;
        pkt
    }

    fn drain(il: &mut Interleaver, flush: bool) -> Vec<(usize, i64)> {
        let mut out = Vec::new();
        while let Some(pkt) = il.pop(flush) {
            out.push((pkt.stream_index, pkt.dts));
        }
        out
    }

    #[test]
    fn test_waits_until_every_stream_has_data() {
        let mut il = Interleaver::new(2);
        il.push(packet(0, 0, Rational::new(1, 25))).unwrap();
        il.push(packet(0, 1, Rational::new(1, 25))).unwrap();
        assert!(il.pop(false).is_none());

        il.push(packet(1, 0, Rational::new(1, 48000))).unwrap();
        // 两条流 dts 都为 0 时, 索引小的先出
        assert_eq!(drain(&mut il, false), vec![(0, 0), (1, 0)]);
        assert_eq!(il.len(), 1);
        assert_eq!(drain(&mut il, true), vec![(0, 1)]);
        assert!(il.is_empty());
    }

    #[test]
    fn test_orders_across_time_bases() {
        let mut il = Interleaver::new(2);
        // 视频 1/25: 0, 40ms, 80ms; 音频 1/1000: 0, 30ms, 60ms, 90ms
        for dts in 0..3 {
            il.push(packet(0, dts, Rational::new(1, 25))).unwrap();
        }
        for dts in [0, 30, 60, 90] {
            il.push(packet(1, dts, Rational::new(1, 1000))).unwrap();
        }
        let order = drain(&mut il, true);
        assert_eq!(
            order,
            vec![(0, 0), (1, 0), (1, 30), (0, 1), (1, 60), (0, 2), (1, 90)]
        );
    }

    #[test]
    fn test_rejects_dts_regression() {
        let mut il = Interleaver::new(1);
        il.push(packet(0, 5, Rational::new(1, 25))).unwrap();
        let err = il.push(packet(0, 4, Rational::new(1, 25))).unwrap_err();
        assert!(matches!(err, HuiError::InvalidData(_)));
    }

    #[test]
    fn test_dts_falls_back_to_pts() {
        let mut il = Interleaver::new(1);
        let mut pkt = packet(0, 7, Rational::new(1, 25));
        pkt.dts = NOPTS_VALUE;
        il.push(pkt).unwrap();
        assert_eq!(il.pop(false).map(|p| p.dts), Some(7));
    }

    #[test]
    fn test_span_forces_release() {
        let mut il = Interleaver::new(2);
        il.set_max_delta(1_000_000);
        il.push(packet(0, 0, Rational::new(1, 1))).unwrap();
        assert!(il.pop(false).is_none());
        il.push(packet(0, 2, Rational::new(1, 1))).unwrap();
        assert_eq!(il.pop(false).map(|p| p.dts), Some(0));
        assert!(il.pop(false).is_none());
    }

    #[test]
    fn test_bad_stream_index() {
        let mut il = Interleaver::new(1);
        let err = il.push(packet(3, 0, Rational::new(1, 25))).unwrap_err();
        assert!(matches!(err, HuiError::InvalidArgument(_)));
    }
}
