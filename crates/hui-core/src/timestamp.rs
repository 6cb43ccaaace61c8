//! 时间戳约定.
//!
//! 时间戳是时间基下的 i64 计数, `NOPTS_VALUE` 表示未定义.

use crate::rational::{Rational, rescale_q};

/// 未定义的时间戳
pub const NOPTS_VALUE: i64 = i64::MIN;

/// 换算为微秒
///
/// 时间戳未定义、时间基无效或结果溢出时返回 `None`.
pub fn to_micros(ts: i64, time_base: Rational) -> Option<i64> {
    if ts == NOPTS_VALUE || time_base.num == 0 || !time_base.is_valid() {
        return None;
    }
    match rescale_q(ts, time_base, Rational::MICRO) {
        NOPTS_VALUE => None,
        us => Some(us),
    }
}
