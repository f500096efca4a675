//! Host page configuration (_platform.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the base directory
pub const CONFIG_FILE: &str = "_platform.yml";

/// Main host page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    // Page
    pub title: String,
    pub icon: String,
    pub layout: Layout,

    // Chrome
    #[serde(default)]
    pub header: HeaderConfig,
    pub intro: Option<String>,
    #[serde(default)]
    pub overview: Vec<PanelConfig>,
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,

    // Documents
    pub primary: DocumentSpec,
    pub fallback: Option<DocumentSpec>,

    /// Panels shown only when the primary document rendered
    #[serde(default)]
    pub details: Vec<PanelConfig>,

    #[serde(default)]
    pub footer: FooterConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Advanced Insurance Analytics Platform".to_string(),
            icon: "🚀".to_string(),
            layout: Layout::Wide,

            header: HeaderConfig::default(),
            intro: None,
            overview: vec![PanelConfig {
                title: "🎯 Platform Features & Capabilities".to_string(),
                sections: vec![
                    "#### 🧠 AI Analytics\n\n- ML-powered risk scoring\n- Predictive persistency models\n- Real-time calculations\n- Confidence intervals\n".to_string(),
                    "#### 📊 Smart Insights\n\n- Carrier optimization\n- Market intelligence\n- Lead scoring system\n- Conversion predictions\n".to_string(),
                    "#### 🎨 Advanced UX\n\n- Interactive dashboards\n- Real-time updates\n- Export capabilities\n- Mobile responsive\n".to_string(),
                ],
                highlight: true,
            }],
            metrics: vec![
                MetricConfig::new("Model Accuracy", "97.3%", Some("↗ +2.1%")),
                MetricConfig::new("Avg Response Time", "< 300ms", Some("↗ 15% faster")),
                MetricConfig::new("ZIP Codes Covered", "1000+", Some("↗ +950")),
                MetricConfig::new("Prediction Confidence", "94.7%", Some("↗ +8.2%")),
            ],

            primary: DocumentSpec::new("advanced_analytics_platform.html", 1200),
            fallback: Some(
                DocumentSpec::new("demographic_calculator.html", 1000).with_label("basic calculator"),
            ),

            details: default_details(),
            footer: FooterConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PlatformConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `_platform.yml` from `base_dir`, or use the defaults when absent
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// The single-calculator profile: one document, no fallback, no panels
    pub fn basic() -> Self {
        Self {
            title: "Demographic Persistency Calculator".to_string(),
            icon: String::new(),
            layout: Layout::Wide,
            header: HeaderConfig {
                title: "🎯 Life Insurance Demographic Calculator".to_string(),
                tagline: String::new(),
            },
            intro: Some(
                "**Optimize premium recommendations using ZIP code demographics and persistency data**"
                    .to_string(),
            ),
            overview: Vec::new(),
            metrics: Vec::new(),
            primary: DocumentSpec::new("demographic_calculator.html", 1000),
            fallback: None,
            details: Vec::new(),
            footer: FooterConfig {
                title: String::new(),
                tagline: "**Data Sources:** Census income data, regional demographics, and actual persistency analysis"
                    .to_string(),
                note: String::new(),
            },
        }
    }

    /// Serialize back to YAML, as written by `init`
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Page width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Wide,
    Centered,
}

impl Layout {
    pub fn css_class(self) -> &'static str {
        match self {
            Layout::Wide => "layout-wide",
            Layout::Centered => "layout-centered",
        }
    }
}

/// One document tier and how it is embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSpec {
    /// Path relative to the base directory
    pub path: String,
    /// Embedded region height in pixels
    pub height: u32,
    pub scrolling: bool,
    /// Human name used in the fallback warning
    pub label: Option<String>,
}

impl Default for DocumentSpec {
    fn default() -> Self {
        Self {
            path: "index.html".to_string(),
            height: 1000,
            scrolling: true,
            label: None,
        }
    }
}

impl DocumentSpec {
    pub fn new(path: &str, height: u32) -> Self {
        Self {
            path: path.to_string(),
            height,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Label if set, else the path
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.path)
    }
}

/// Banner at the top of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub title: String,
    pub tagline: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title: "🚀 Advanced Insurance Analytics Platform".to_string(),
            tagline: "AI-Powered Predictive Analytics • Real-Time Calculations • Smart Recommendations"
                .to_string(),
        }
    }
}

/// A single metric widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetricConfig {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

impl MetricConfig {
    pub fn new(label: &str, value: &str, delta: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            delta: delta.map(str::to_string),
        }
    }
}

/// An expandable panel; each section is markdown and becomes one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PanelConfig {
    pub title: String,
    pub sections: Vec<String>,
    /// Draw sections as highlighted cards
    pub highlight: bool,
}

impl PanelConfig {
    fn new(title: &str, sections: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
            highlight: false,
        }
    }
}

/// Footer block; every line is markdown and empty lines are skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub title: String,
    pub tagline: String,
    pub note: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            title: "**Advanced Insurance Analytics Platform v2.0**".to_string(),
            tagline: "Powered by AI • Real-time Analytics • Predictive Intelligence".to_string(),
            note: "© 2024 - Built for competitive advantage in insurance sales".to_string(),
        }
    }
}

fn default_details() -> Vec<PanelConfig> {
    vec![
        PanelConfig::new(
            "🔧 Technical Specifications",
            &[
                "**Core Technologies:**\n\n- ES6+ JavaScript Architecture\n- Chart.js for Visualizations\n- Real-time Debounced Calculations\n- Advanced Caching System\n- Responsive CSS Grid Layout\n",
                "**Analytics Engine:**\n\n- Multiple Regression Models\n- Confidence Interval Calculations\n- Risk Grade Scoring (A+ to F)\n- Seasonal Demand Analysis\n- Market Intelligence Integration\n",
            ],
        ),
        PanelConfig::new(
            "📈 Data Sources & Methodology",
            &["**Data Sources:**\n\n\
- U.S. Census Bureau demographic data\n\
- Real estate market analytics\n\
- Insurance industry persistency studies\n\
- Regional economic indicators\n\
- Carrier-specific approval rates and commission structures\n\n\
**Predictive Models:**\n\n\
- **Risk Scoring**: Multi-factor analysis using income stability, age demographics, education levels, employment status, and regional factors\n\
- **Persistency Prediction**: Based on historical policy retention data with demographic adjustments\n\
- **Conversion Analysis**: Lead scoring combined with seasonal timing and market conditions\n\
- **Lifetime Value**: Calculated using premium estimates, persistency rates, and commission structures\n\
- **Cross-sell Opportunities**: Family composition and income-based product matching\n\n\
**Confidence Levels:**\n\n\
- Model predictions include ±X% confidence intervals\n\
- Risk grades based on percentile scoring (A+ = top 10%, F = bottom 10%)\n\
- Seasonal adjustments based on quarterly performance data\n\
- Regional multipliers derived from cost-of-living and market penetration analysis\n"],
        ),
        PanelConfig::new(
            "💡 Usage Tips & Best Practices",
            &["**Getting Started:**\n\n\
1. Enter a valid 5-digit ZIP code (or select from examples)\n\
2. Adjust age and coverage amount using sliders for real-time updates\n\
3. Provide actual income if known (otherwise auto-estimated from demographics)\n\
4. Review risk grade and confidence intervals for assessment quality\n\n\
**Interpreting Results:**\n\n\
- **A+ Risk Grade**: Proceed with confidence, high success probability\n\
- **Lead Score 80+**: High priority prospect, contact immediately\n\
- **Persistency 70%+**: Strong candidate for standard products\n\
- **High Market Penetration**: Expect more competition, differentiate on service\n\n\
**Advanced Features:**\n\n\
- Use A/B testing simulator to compare premium strategies\n\
- Export reports for CRM integration and client presentations\n\
- Monitor seasonal timing recommendations for optimal approach periods\n\
- Track conversion funnel analytics for process optimization\n"],
        ),
    ]
}
