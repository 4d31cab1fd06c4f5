use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AlexandriaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub news: NewsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "heritage_data.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CollectionConfig {
    pub rate_limit_delay_secs: f64,
    pub batch_size: usize,
    pub max_items_per_source: usize,
    /// Baseline year for registry inscription-age scoring. Frozen by default
    /// so scores are reproducible across runs.
    pub reference_year: i32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_secs: 1.0,
            batch_size: 100,
            max_items_per_source: 1000,
            reference_year: 2024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    pub met_api_base_url: String,
    pub unesco_api_base_url: String,
    pub news_api_base_url: String,
    pub met_department_ids: Vec<u32>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            met_api_base_url: "https://collectionapi.metmuseum.org/public/collection/v1"
                .to_string(),
            unesco_api_base_url: "https://whc.unesco.org/en/list/json".to_string(),
            news_api_base_url: "https://newsapi.org/v2".to_string(),
            met_department_ids: vec![1, 11, 21],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub keywords: Vec<String>,
    pub window_days: i64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            keywords: [
                "museum destroyed",
                "cultural heritage damage",
                "art theft",
                "monument vandalized",
                "archaeological site damaged",
                "library burned",
                "statue toppled",
                "heritage site threatened",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            window_days: 30,
        }
    }
}

impl AlexandriaConfig {
    /// Merge defaults with an optional TOML file. The file may be absent or
    /// partial; every recognized option has a default. The `NEWS_API_KEY`
    /// environment variable fills the news credential when the file doesn't.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        let mut config: AlexandriaConfig = s.try_deserialize()?;
        if config.news.api_key.is_none() {
            config.news.api_key = std::env::var("NEWS_API_KEY").ok();
        }
        Ok(config)
    }
}
