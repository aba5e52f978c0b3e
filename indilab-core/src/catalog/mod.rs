//! IndicatorCatalog: the registry of every computable indicator.
//!
//! Each [`IndicatorKind`] maps to a static [`IndicatorDescriptor`]: the
//! canonical identifier and aliases, required input columns, parameter
//! schema, and (through [`compute`]) the function that produces the series.

mod compute;
mod inputs;
mod params;
mod table;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::EngineError;

pub use compute::compute;
pub use inputs::{BarInputs, InputSpec};
pub use params::{ParamDefault, ParamOption, ParamType, ParameterSpec, ResolvedParams};

/// The closed set of supported indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Wma,
    Dema,
    Tema,
    Trima,
    Kama,
    Mama,
    T3,
    Vwap,
    Candle,
    Number,
    Rsi,
    RsiWilder,
    Stochastic,
    Macd,
    MacdSignal,
    Supertrend,
    Adx,
    PlusDi,
    MinusDi,
    ParabolicSar,
    Bbands,
    Atr,
    TrueRange,
    PivotPoint,
    CamarillaPivot,
    LinearRegression,
    LinearRegressionIntercept,
}

impl IndicatorKind {
    /// Every kind, in catalog order.
    pub const ALL: [IndicatorKind; 29] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Wma,
        IndicatorKind::Dema,
        IndicatorKind::Tema,
        IndicatorKind::Trima,
        IndicatorKind::Kama,
        IndicatorKind::Mama,
        IndicatorKind::T3,
        IndicatorKind::Vwap,
        IndicatorKind::Candle,
        IndicatorKind::Number,
        IndicatorKind::Rsi,
        IndicatorKind::RsiWilder,
        IndicatorKind::Stochastic,
        IndicatorKind::Macd,
        IndicatorKind::MacdSignal,
        IndicatorKind::Supertrend,
        IndicatorKind::Adx,
        IndicatorKind::PlusDi,
        IndicatorKind::MinusDi,
        IndicatorKind::ParabolicSar,
        IndicatorKind::Bbands,
        IndicatorKind::Atr,
        IndicatorKind::TrueRange,
        IndicatorKind::PivotPoint,
        IndicatorKind::CamarillaPivot,
        IndicatorKind::LinearRegression,
        IndicatorKind::LinearRegressionIntercept,
    ];

    pub fn descriptor(self) -> &'static IndicatorDescriptor {
        table::descriptor(self)
    }

    /// Canonical upper-case identifier.
    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Resolve an identifier or alias, ignoring case and surrounding space.
    pub fn from_id(id: &str) -> Option<IndicatorKind> {
        let wanted = normalize_id(id);
        IndicatorKind::ALL.into_iter().find(|kind| {
            let d = kind.descriptor();
            d.id == wanted || d.aliases.iter().any(|alias| *alias == wanted)
        })
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Canonical form of a caller-supplied identifier.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}

/// Catalog grouping, serialized under its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "Moving Averages")]
    MovingAverages,
    #[serde(rename = "Volume & Price")]
    VolumePrice,
    #[serde(rename = "Momentum")]
    Momentum,
    #[serde(rename = "Trend")]
    Trend,
    #[serde(rename = "Volatility")]
    Volatility,
    #[serde(rename = "Pivot Points")]
    PivotPoints,
    #[serde(rename = "Regression")]
    Regression,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::MovingAverages,
        Category::VolumePrice,
        Category::Momentum,
        Category::Trend,
        Category::Volatility,
        Category::PivotPoints,
        Category::Regression,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::MovingAverages => "Moving Averages",
            Category::VolumePrice => "Volume & Price",
            Category::Momentum => "Momentum",
            Category::Trend => "Trend",
            Category::Volatility => "Volatility",
            Category::PivotPoints => "Pivot Points",
            Category::Regression => "Regression",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of one indicator, serialized as a catalog entry
/// `{ value, label, category, parameters }`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndicatorDescriptor {
    #[serde(skip)]
    pub kind: IndicatorKind,
    #[serde(rename = "value")]
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    pub parameters: &'static [ParameterSpec],
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Columns the compute function reads; only these are extracted.
    #[serde(skip)]
    pub inputs: InputSpec,
}

impl IndicatorDescriptor {
    pub fn parameter(&self, name: &str) -> Option<&'static ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// The set of indicators an engine will dispatch to.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    kinds: Vec<IndicatorKind>,
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl IndicatorCatalog {
    /// Every supported indicator.
    pub fn standard() -> Self {
        Self {
            kinds: IndicatorKind::ALL.to_vec(),
        }
    }

    /// A restricted catalog. Order and duplicates are normalized.
    pub fn with_kinds(kinds: impl IntoIterator<Item = IndicatorKind>) -> Self {
        let mut kinds: Vec<IndicatorKind> = kinds.into_iter().collect();
        kinds.sort();
        kinds.dedup();
        Self { kinds }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Find the descriptor for an identifier or alias.
    pub fn lookup(&self, id: &str) -> Result<&'static IndicatorDescriptor, EngineError> {
        IndicatorKind::from_id(id)
            .filter(|kind| self.contains(*kind))
            .map(IndicatorKind::descriptor)
            .ok_or_else(|| EngineError::UnknownIndicator(id.trim().to_string()))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static IndicatorDescriptor> + '_ {
        self.kinds.iter().map(|kind| kind.descriptor())
    }

    /// Descriptors grouped by category, each group in catalog order.
    pub fn grouped(&self) -> BTreeMap<Category, Vec<&'static IndicatorDescriptor>> {
        let mut groups: BTreeMap<Category, Vec<&'static IndicatorDescriptor>> = BTreeMap::new();
        for d in self.descriptors() {
            groups.entry(d.category).or_default().push(d);
        }
        groups
    }

    /// The full catalog surface: flat list, grouped form and category names.
    pub fn document(&self) -> CatalogDocument {
        let grouped = self.grouped();
        CatalogDocument {
            indicators: self.descriptors().collect(),
            categories: grouped.keys().copied().collect(),
            grouped,
        }
    }
}

/// Serializable catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDocument {
    pub indicators: Vec<&'static IndicatorDescriptor>,
    pub grouped: BTreeMap<Category, Vec<&'static IndicatorDescriptor>>,
    pub categories: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_its_own_descriptor() {
        for kind in IndicatorKind::ALL {
            assert_eq!(kind.descriptor().kind, kind, "table out of order for {kind:?}");
        }
    }

    #[test]
    fn ids_are_unique_and_upper_case() {
        let mut seen = std::collections::HashSet::new();
        for kind in IndicatorKind::ALL {
            let d = kind.descriptor();
            for name in std::iter::once(&d.id).chain(d.aliases) {
                assert_eq!(*name, name.to_ascii_uppercase());
                assert!(seen.insert(*name), "duplicate identifier {name}");
            }
        }
    }

    #[test]
    fn from_id_is_case_insensitive_and_knows_aliases() {
        assert_eq!(IndicatorKind::from_id("sma"), Some(IndicatorKind::Sma));
        assert_eq!(IndicatorKind::from_id(" Rsi "), Some(IndicatorKind::Rsi));
        assert_eq!(IndicatorKind::from_id("bollinger_bands"), Some(IndicatorKind::Bbands));
        assert_eq!(IndicatorKind::from_id("TRUE_RANGE"), Some(IndicatorKind::TrueRange));
        assert_eq!(IndicatorKind::from_id("pivot_points"), Some(IndicatorKind::PivotPoint));
        assert_eq!(IndicatorKind::from_id("Camarilla_Pivot"), Some(IndicatorKind::CamarillaPivot));
        assert_eq!(IndicatorKind::from_id("FOOBAR"), None);
    }

    #[test]
    fn restricted_catalog_rejects_missing_kinds() {
        let catalog = IndicatorCatalog::with_kinds([IndicatorKind::Sma, IndicatorKind::Ema]);
        assert!(catalog.lookup("sma").is_ok());
        assert_eq!(
            catalog.lookup("RSI").unwrap_err(),
            EngineError::UnknownIndicator("RSI".into())
        );
    }

    #[test]
    fn grouped_covers_every_descriptor() {
        let catalog = IndicatorCatalog::standard();
        let total: usize = catalog.grouped().values().map(Vec::len).sum();
        assert_eq!(total, catalog.len());
        assert_eq!(catalog.grouped().len(), Category::ALL.len());
    }

    #[test]
    fn default_parameters_match_documented_values() {
        let num = |kind: IndicatorKind, name: &str| match kind.descriptor().parameter(name).and_then(|p| p.default) {
            Some(ParamDefault::Number(v)) => v,
            other => panic!("no numeric default for {kind}.{name}: {other:?}"),
        };
        assert_eq!(num(IndicatorKind::Sma, "period"), 20.0);
        assert_eq!(num(IndicatorKind::Rsi, "period"), 14.0);
        assert_eq!(num(IndicatorKind::Macd, "fastPeriod"), 12.0);
        assert_eq!(num(IndicatorKind::Macd, "slowPeriod"), 26.0);
        assert_eq!(num(IndicatorKind::Macd, "signalPeriod"), 9.0);
        assert_eq!(num(IndicatorKind::Bbands, "period"), 20.0);
        assert_eq!(num(IndicatorKind::Bbands, "stdDev"), 2.0);
        assert_eq!(num(IndicatorKind::Kama, "slow"), 30.0);
        assert_eq!(num(IndicatorKind::T3, "vfactor"), 0.7);
        assert_eq!(num(IndicatorKind::Supertrend, "multiplier"), 3.0);
        assert_eq!(num(IndicatorKind::ParabolicSar, "maximum"), 0.2);
        assert_eq!(num(IndicatorKind::TrueRange, "smoothing"), 1.0);
    }

    #[test]
    fn source_driven_indicators_declare_the_selected_column() {
        for kind in IndicatorKind::ALL {
            let d = kind.descriptor();
            if d.parameter("source").is_some() {
                assert_eq!(d.inputs, InputSpec::Selected("source"), "{kind}");
            }
        }
        assert_eq!(IndicatorKind::Number.descriptor().inputs, InputSpec::BarCount);
    }

    #[test]
    fn entry_serializes_with_value_key() {
        let json = serde_json::to_value(IndicatorKind::Sma.descriptor()).unwrap();
        assert_eq!(json["value"], "SMA");
        assert_eq!(json["category"], "Moving Averages");
        assert_eq!(json["parameters"][0]["name"], "period");
        assert!(json.get("aliases").is_none());
    }

    #[test]
    fn document_keys_groups_by_display_name() {
        let json = serde_json::to_value(IndicatorCatalog::standard().document()).unwrap();
        assert!(json["grouped"]["Volume & Price"].is_array());
        assert_eq!(json["categories"][0], "Moving Averages");
        assert_eq!(json["categories"][3], "Trend");
        assert_eq!(json["grouped"]["Pivot Points"].as_array().unwrap().len(), 2);
        assert_eq!(json["indicators"].as_array().unwrap().len(), IndicatorKind::ALL.len());
    }
}
