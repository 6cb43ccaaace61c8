//! 有理数与时间基换算.
//!
//! 换算在 i128 中完成. 能整除时结果精确, 否则四舍五入 (0.5 远离零),
//! 长序列逐个换算不会累积漂移.

use std::cmp::Ordering;
use std::fmt;

use crate::timestamp::NOPTS_VALUE;

/// `num/den`, 用作时间基和帧率
///
/// 1/90000 是 90kHz 时钟, 30000/1001 是 29.97fps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /// 分母为 0, 表示尚未设置
    pub const UNDEFINED: Self = Self::new(0, 0);

    /// 微秒时间基
    pub const MICRO: Self = Self::new(1, 1_000_000);

    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    pub const fn is_valid(&self) -> bool {
        self.den != 0
    }

    /// 分母为 0 时得到 NaN
    pub fn to_f64(self) -> f64 {
        match self.den {
            0 => f64::NAN,
            den => f64::from(self.num) / f64::from(den),
        }
    }

    /// 约到最简并把符号放到分子上, 未定义值原样返回
    pub fn reduce(self) -> Self {
        let divisor = gcd(i64::from(self.num), i64::from(self.den));
        if self.den == 0 || divisor == 0 {
            return self;
        }
        let divisor = if self.den < 0 { -divisor } else { divisor };
        // 结果的绝对值不超过原值, 只有 i32::MIN 取反会越界
        let shrink = |v: i32| i32::try_from(i64::from(v) / divisor).unwrap_or(v);
        Self::new(shrink(self.num), shrink(self.den))
    }

    /// 倒数, 帧率 25/1 对应时间基 1/25
    pub const fn invert(self) -> Self {
        Self::new(self.den, self.num)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// 整数 `n` 即 `n/1`, 用于采样率和整数帧率
impl From<i32> for Rational {
    fn from(num: i32) -> Self {
        Self::new(num, 1)
    }
}

impl From<(i32, i32)> for Rational {
    fn from((num, den): (i32, i32)) -> Self {
        Self::new(num, den)
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `a * b / c` 取整到最近, 0.5 远离零
///
/// `c` 为 0, `a` 为 `NOPTS_VALUE` 或结果不在 i64 范围内时返回 `NOPTS_VALUE`.
pub fn rescale_rnd(a: i64, b: i64, c: i64) -> i64 {
    if c == 0 || a == NOPTS_VALUE {
        return NOPTS_VALUE;
    }
    let numer = i128::from(a) * i128::from(b) * i128::from(c.signum());
    let denom = i128::from(c).abs();
    let rounded = (numer.abs() + denom / 2) / denom * numer.signum();
    i64::try_from(rounded).unwrap_or(NOPTS_VALUE)
}

/// 把时间基 `from` 下的 `value` 换算到 `to`
pub fn rescale_q(value: i64, from: Rational, to: Rational) -> i64 {
    rescale_rnd(
        value,
        i64::from(from.num) * i64::from(to.den),
        i64::from(to.num) * i64::from(from.den),
    )
}

/// 无损比较两个不同时间基下的时间戳
pub fn compare_ts(a: i64, a_tb: Rational, b: i64, b_tb: Rational) -> Ordering {
    let lhs = i128::from(a) * i128::from(a_tb.num) * i128::from(b_tb.den);
    let rhs = i128::from(b) * i128::from(b_tb.num) * i128::from(a_tb.den);
    // 两边同乘了两个分母, 异号时不等号方向相反
    match (a_tb.den < 0) != (b_tb.den < 0) {
        true => rhs.cmp(&lhs),
        false => lhs.cmp(&rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_约分() {
        assert_eq!(Rational::new(30, 60).reduce(), Rational::new(1, 2));
        assert_eq!(Rational::new(3, -6).reduce(), Rational::new(-1, 2));
        assert_eq!(Rational::new(0, 5).reduce(), Rational::new(0, 1));
        assert_eq!(Rational::UNDEFINED.reduce(), Rational::UNDEFINED);
    }

    #[test]
    fn test_未定义与显示() {
        assert!(!Rational::UNDEFINED.is_valid());
        assert!(Rational::UNDEFINED.to_f64().is_nan());
        assert_eq!(Rational::new(30000, 1001).to_string(), "30000/1001");
        assert_eq!(Rational::new(25, 1).invert(), Rational::new(1, 25));
    }

    #[test]
    fn test_从整数和元组转换() {
        assert_eq!(Rational::from(44100), Rational::new(44100, 1));
        assert_eq!(Rational::from((30000, 1001)), Rational::new(30000, 1001));
        let rate: Rational = (1, 0).into();
        assert!(!rate.is_valid());
    }

    #[test]
    fn test_整除时精确() {
        let khz90 = Rational::new(1, 90000);
        assert_eq!(rescale_q(3000, khz90, Rational::new(1, 30)), 1);
        assert_eq!(rescale_q(90000, khz90, Rational::new(1, 1000)), 1000);
    }

    #[test]
    fn test_半数远离零() {
        assert_eq!(rescale_rnd(1, 1, 2), 1);
        assert_eq!(rescale_rnd(-1, 1, 2), -1);
        assert_eq!(rescale_rnd(1, 1, 3), 0);
        assert_eq!(rescale_rnd(2, 1, 3), 1);
        assert_eq!(rescale_rnd(-2, 1, 3), -1);
        assert_eq!(rescale_rnd(2, 1, -3), -1);
    }

    #[test]
    fn test_无法换算() {
        assert_eq!(rescale_rnd(5, 1, 0), NOPTS_VALUE);
        assert_eq!(rescale_rnd(NOPTS_VALUE, 1, 1), NOPTS_VALUE);
        assert_eq!(rescale_rnd(i64::MAX, 2, 1), NOPTS_VALUE);
    }

    #[test]
    fn test_换算单调() {
        let (from, to) = (Rational::new(1, 48000), Rational::new(1, 30));
        let converted: Vec<i64> = (0..48000 * 3)
            .step_by(777)
            .map(|pts| rescale_q(pts, from, to))
            .collect();
        assert!(converted.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_跨时间基比较() {
        let ms = Rational::new(1, 1000);
        let khz90 = Rational::new(1, 90000);
        assert_eq!(compare_ts(1, ms, 90, khz90), Ordering::Equal);
        assert_eq!(compare_ts(1, ms, 91, khz90), Ordering::Less);
        assert_eq!(compare_ts(2, ms, 91, khz90), Ordering::Greater);
    }
}
