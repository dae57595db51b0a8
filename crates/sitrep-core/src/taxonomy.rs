//! The fixed report taxonomy.
//!
//! Categories are a closed set in declaration order. That order is the
//! tie-break for every matching rule and the render order of report sections.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    GeopoliticsSecurity,
    EconomicsMarkets,
    AiTechnology,
    HealthScience,
    SportsPerformance,
    SocietyCulture,
}

impl Category {
    /// All categories in taxonomy order.
    pub const ALL: [Category; 6] = [
        Category::GeopoliticsSecurity,
        Category::EconomicsMarkets,
        Category::AiTechnology,
        Category::HealthScience,
        Category::SportsPerformance,
        Category::SocietyCulture,
    ];

    /// Canonical heading text. Downstream consumers parse reports by this
    /// exact string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::GeopoliticsSecurity => "Geopolitics & Security",
            Category::EconomicsMarkets => "Economics & Markets",
            Category::AiTechnology => "AI & Technology",
            Category::HealthScience => "Health & Science",
            Category::SportsPerformance => "Sports & Performance",
            Category::SocietyCulture => "Society & Culture",
        }
    }

    /// Anchor description embedded once per run by the embedding classifier.
    #[must_use]
    pub const fn anchor(self) -> &'static str {
        match self {
            Category::GeopoliticsSecurity => {
                "International relations, military conflicts, wars, diplomacy, sanctions, \
                 NATO, UN, terrorism, espionage, border disputes, and national security."
            }
            Category::EconomicsMarkets => {
                "Stock markets, financial markets, GDP, inflation, interest rates, central banks, \
                 crypto, corporate earnings, trade tariffs, supply chains, and economic policy."
            }
            Category::AiTechnology => {
                "Artificial intelligence, machine learning, software, hardware, startups, \
                 big tech companies, cybersecurity, data privacy, robotics, and scientific computing."
            }
            Category::HealthScience => {
                "Medicine, healthcare, diseases, vaccines, nutrition, fitness, biology, \
                 climate science, space exploration, and scientific research."
            }
            Category::SportsPerformance => {
                "Football, soccer, basketball, tennis, athletics, Olympic sports, \
                 esports, sports results, athlete news, and high-performance competition."
            }
            Category::SocietyCulture => {
                "Social movements, politics, religion, art, music, film, pop culture, \
                 education, gender, race, identity, media, and everyday human trends."
            }
        }
    }

    /// Exact (case-insensitive) lookup by canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Category::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category: {raw}")))
    }
}

/// Deserialize an optional category, mapping unknown labels to `None`.
///
/// Records handed back by external storage may carry labels from an older
/// taxonomy; those posts simply become unclassified.
///
/// # Errors
///
/// Returns the deserializer's error only if the value is not a string or null.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::from_name))
}
