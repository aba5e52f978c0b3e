//! Static descriptor table, indexed by `IndicatorKind` discriminant.

use super::inputs::InputSpec::{self, BarCount, Fixed, Selected};
use super::params::{ParamOption, ParameterSpec};
use super::{Category, IndicatorDescriptor, IndicatorKind};
use crate::domain::PriceField::{Close, High, Low, Volume};

pub(super) fn descriptor(kind: IndicatorKind) -> &'static IndicatorDescriptor {
    &TABLE[kind as usize]
}

// ─── Shared parameter pieces ────────────────────────────────────────

const SOURCE_OPTIONS: &[ParamOption] = &[
    ParamOption { value: "open", label: "Open" },
    ParamOption { value: "high", label: "High" },
    ParamOption { value: "low", label: "Low" },
    ParamOption { value: "close", label: "Close" },
];

const SOURCE: ParameterSpec = ParameterSpec::select("source", "Source", "close", SOURCE_OPTIONS);

const MA_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::number("period", "Period", 20.0, 1.0, 200.0, 1.0),
    SOURCE,
];

const RSI_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::number("period", "Period", 14.0, 1.0, 100.0, 1.0),
    SOURCE,
];

const MACD_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::number("fastPeriod", "Fast Period", 12.0, 1.0, 50.0, 1.0).with_aliases(&["fastperiod"]),
    ParameterSpec::number("slowPeriod", "Slow Period", 26.0, 5.0, 100.0, 1.0).with_aliases(&["slowperiod"]),
    ParameterSpec::number("signalPeriod", "Signal Period", 9.0, 1.0, 50.0, 1.0)
        .with_aliases(&["signalperiod"]),
    SOURCE,
];

const DIRECTIONAL_PARAMS: &[ParameterSpec] = &[ParameterSpec::number("period", "Period", 14.0, 1.0, 100.0, 1.0)];

const PIVOT_LEVELS: &[ParamOption] = &[
    ParamOption { value: "r3", label: "R3" },
    ParamOption { value: "r2", label: "R2" },
    ParamOption { value: "r1", label: "R1" },
    ParamOption { value: "pp", label: "Pivot" },
    ParamOption { value: "s1", label: "S1" },
    ParamOption { value: "s2", label: "S2" },
    ParamOption { value: "s3", label: "S3" },
];

const CAMARILLA_LEVELS: &[ParamOption] = &[
    ParamOption { value: "h5", label: "H5" },
    ParamOption { value: "h4", label: "H4" },
    ParamOption { value: "h3", label: "H3" },
    ParamOption { value: "h2", label: "H2" },
    ParamOption { value: "h1", label: "H1" },
    ParamOption { value: "pp", label: "Pivot" },
    ParamOption { value: "l1", label: "L1" },
    ParamOption { value: "l2", label: "L2" },
    ParamOption { value: "l3", label: "L3" },
    ParamOption { value: "l4", label: "L4" },
    ParamOption { value: "l5", label: "L5" },
];

const REGRESSION_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::number("period", "Period", 14.0, 1.0, 100.0, 1.0),
    SOURCE,
];

const SOURCE_INPUT: InputSpec = Selected("source");
const HLC: InputSpec = Fixed(&[High, Low, Close]);


// ─── Table ──────────────────────────────────────────────────────────

static TABLE: [IndicatorDescriptor; 29] = [
    IndicatorDescriptor {
        kind: IndicatorKind::Sma,
        id: "SMA",
        label: "Simple Moving Average (SMA)",
        category: Category::MovingAverages,
        parameters: MA_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Ema,
        id: "EMA",
        label: "Exponential Moving Average (EMA)",
        category: Category::MovingAverages,
        parameters: MA_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Wma,
        id: "WMA",
        label: "Weighted Moving Average (WMA)",
        category: Category::MovingAverages,
        parameters: MA_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Dema,
        id: "DEMA",
        label: "Double Exponential MA (DEMA)",
        category: Category::MovingAverages,
        parameters: MA_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Tema,
        id: "TEMA",
        label: "Triple Exponential MA (TEMA)",
        category: Category::MovingAverages,
        parameters: MA_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Trima,
        id: "TRIMA",
        label: "Triangular Moving Average (TRIMA)",
        category: Category::MovingAverages,
        parameters: MA_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Kama,
        id: "KAMA",
        label: "Kaufman Adaptive MA (KAMA)",
        category: Category::MovingAverages,
        parameters: &[
            ParameterSpec::number("fast", "Fast Period", 2.0, 1.0, 20.0, 1.0),
            ParameterSpec::number("slow", "Slow Period", 30.0, 10.0, 100.0, 1.0),
            SOURCE,
        ],
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Mama,
        id: "MAMA",
        label: "MESA Adaptive MA (MAMA)",
        category: Category::MovingAverages,
        parameters: &[
            ParameterSpec::number("fastlimit", "Fast Limit", 0.5, 0.1, 1.0, 0.1).with_aliases(&["fastLimit"]),
            ParameterSpec::number("slowlimit", "Slow Limit", 0.05, 0.01, 0.5, 0.01).with_aliases(&["slowLimit"]),
            SOURCE,
        ],
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::T3,
        id: "T3",
        label: "T3 Moving Average",
        category: Category::MovingAverages,
        parameters: &[
            ParameterSpec::number("period", "Period", 20.0, 1.0, 200.0, 1.0),
            ParameterSpec::number("vfactor", "Volume Factor", 0.7, 0.1, 1.0, 0.1).with_aliases(&["vFactor"]),
            SOURCE,
        ],
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Vwap,
        id: "VWAP",
        label: "Volume Weighted Average Price (VWAP)",
        category: Category::VolumePrice,
        parameters: &[
            ParameterSpec::select(
                "resetInterval",
                "Reset Interval",
                "daily",
                &[
                    ParamOption { value: "daily", label: "Daily" },
                    ParamOption { value: "session", label: "Session" },
                    ParamOption { value: "none", label: "None" },
                ],
            ),
            ParameterSpec::select(
                "sdMultipliers",
                "Band Multipliers",
                "1,2,3",
                &[
                    ParamOption { value: "1", label: "1σ" },
                    ParamOption { value: "1,2", label: "1σ, 2σ" },
                    ParamOption { value: "1,2,3", label: "1σ, 2σ, 3σ" },
                ],
            ),
        ],
        aliases: &[],
        inputs: Fixed(&[High, Low, Close, Volume]),
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Candle,
        id: "CANDLE",
        label: "Candle (OHLC)",
        category: Category::VolumePrice,
        parameters: &[ParameterSpec::select(
            "component",
            "Component",
            "close",
            &[
                ParamOption { value: "open", label: "Open" },
                ParamOption { value: "high", label: "High" },
                ParamOption { value: "low", label: "Low" },
                ParamOption { value: "close", label: "Close" },
                ParamOption { value: "volume", label: "Volume" },
            ],
        )],
        aliases: &["CANDLE_COMPONENT"],
        inputs: Selected("component"),
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Number,
        id: "NUMBER",
        label: "User-defined Number",
        category: Category::VolumePrice,
        parameters: &[ParameterSpec::number("value", "Value", 0.0, -1000.0, 10000.0, 0.1)],
        aliases: &[],
        inputs: BarCount,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Rsi,
        id: "RSI",
        label: "Relative Strength Index (RSI)",
        category: Category::Momentum,
        parameters: RSI_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::RsiWilder,
        id: "RSI_WILDER",
        label: "RSI (Wilder Smoothing)",
        category: Category::Momentum,
        parameters: RSI_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Stochastic,
        id: "STOCHASTIC",
        label: "Stochastic Oscillator",
        category: Category::Momentum,
        parameters: &[
            ParameterSpec::number("period", "Period", 14.0, 1.0, 50.0, 1.0),
            ParameterSpec::select(
                "type",
                "Type",
                "fast",
                &[
                    ParamOption { value: "fast", label: "Fast" },
                    ParamOption { value: "slow", label: "Slow" },
                ],
            ),
        ],
        aliases: &["STOCH"],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Macd,
        id: "MACD",
        label: "MACD Line",
        category: Category::Momentum,
        parameters: MACD_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::MacdSignal,
        id: "MACD_SIGNAL",
        label: "MACD Signal Line",
        category: Category::Momentum,
        parameters: MACD_PARAMS,
        aliases: &[],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Supertrend,
        id: "SUPERTREND",
        label: "SuperTrend",
        category: Category::Trend,
        parameters: &[
            ParameterSpec::number("period", "Period", 10.0, 1.0, 100.0, 1.0),
            ParameterSpec::number("atr_period", "ATR Period", 10.0, 1.0, 50.0, 1.0).with_aliases(&["atrPeriod"]),
            ParameterSpec::number("multiplier", "Multiplier", 3.0, 0.1, 10.0, 0.1),
        ],
        aliases: &[],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Adx,
        id: "ADX",
        label: "Average Directional Index (ADX)",
        category: Category::Trend,
        parameters: DIRECTIONAL_PARAMS,
        aliases: &[],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::PlusDi,
        id: "PLUS_DI",
        label: "Plus Directional Indicator (+DI)",
        category: Category::Trend,
        parameters: DIRECTIONAL_PARAMS,
        aliases: &[],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::MinusDi,
        id: "MINUS_DI",
        label: "Minus Directional Indicator (-DI)",
        category: Category::Trend,
        parameters: DIRECTIONAL_PARAMS,
        aliases: &[],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::ParabolicSar,
        id: "PARABOLIC_SAR",
        label: "Parabolic SAR",
        category: Category::Trend,
        parameters: &[
            ParameterSpec::number("acceleration", "Acceleration", 0.02, 0.01, 0.5, 0.01).with_aliases(&["minimum_af"]),
            ParameterSpec::number("maximum", "Maximum", 0.2, 0.1, 1.0, 0.01).with_aliases(&["maximum_af"]),
        ],
        aliases: &["SAR", "PSAR"],
        inputs: Fixed(&[High, Low]),
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Bbands,
        id: "BBANDS",
        label: "Bollinger Bands",
        category: Category::Volatility,
        parameters: &[
            ParameterSpec::number("period", "Period", 20.0, 1.0, 100.0, 1.0),
            ParameterSpec::number("stdDev", "Standard Deviations", 2.0, 0.1, 5.0, 0.1),
            ParameterSpec::optional_number("nbdevup", "Upper Deviation", 0.1, 5.0, 0.1),
            ParameterSpec::optional_number("nbdevdn", "Lower Deviation", 0.1, 5.0, 0.1),
            SOURCE,
        ],
        aliases: &["BOLLINGER_BANDS", "BOLLINGER"],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::Atr,
        id: "ATR",
        label: "Average True Range (ATR)",
        category: Category::Volatility,
        parameters: &[ParameterSpec::number("period", "Period", 14.0, 1.0, 100.0, 1.0)],
        aliases: &[],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::TrueRange,
        id: "TRANGE",
        label: "True Range",
        category: Category::Volatility,
        parameters: &[ParameterSpec::number("smoothing", "Smoothing", 1.0, 1.0, 50.0, 1.0)],
        aliases: &["TRUE_RANGE"],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::PivotPoint,
        id: "PIVOT_POINT",
        label: "Pivot Point",
        category: Category::PivotPoints,
        parameters: &[
            ParameterSpec::select(
                "type",
                "Type",
                "standard",
                &[
                    ParamOption { value: "standard", label: "Standard" },
                    ParamOption { value: "fibonacci", label: "Fibonacci" },
                    ParamOption { value: "camarilla", label: "Camarilla" },
                ],
            ),
            ParameterSpec::select("level", "Level", "pp", PIVOT_LEVELS),
        ],
        aliases: &["PIVOT_POINTS"],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::CamarillaPivot,
        id: "CAMARILLA_PIVOT",
        label: "Camarilla Pivot",
        category: Category::PivotPoints,
        parameters: &[ParameterSpec::select("level", "Level", "pp", CAMARILLA_LEVELS)],
        aliases: &[],
        inputs: HLC,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::LinearRegression,
        id: "LINEAR_REGRESSION",
        label: "Linear Regression",
        category: Category::Regression,
        parameters: REGRESSION_PARAMS,
        aliases: &["LINEARREG"],
        inputs: SOURCE_INPUT,
    },
    IndicatorDescriptor {
        kind: IndicatorKind::LinearRegressionIntercept,
        id: "LINEAR_REGRESSION_INTERCEPT",
        label: "Linear Regression Intercept",
        category: Category::Regression,
        parameters: REGRESSION_PARAMS,
        aliases: &["LINEARREG_INTERCEPT"],
        inputs: SOURCE_INPUT,
    },
];
