use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

/// Where the historical record lives and how it is aligned.
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    /// Tried in order; the first format that parses wins.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            date_column: default_date_column(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            date_formats: default_date_formats(),
        }
    }
}

fn default_dataset_path() -> String {
    "Hashtag_sum_2_10.csv".into()
}

fn default_date_column() -> String {
    "date".into()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 4, 1).unwrap_or_default()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 4, 20).unwrap_or_default()
}

fn default_date_formats() -> Vec<String> {
    vec!["%d/%m/%Y".into(), "%m/%d/%Y".into()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_true")]
    pub yearly_seasonality: bool,
    #[serde(default = "default_true")]
    pub weekly_seasonality: bool,
    #[serde(default)]
    pub daily_seasonality: bool,
    #[serde(default = "default_changepoint_prior_scale")]
    pub changepoint_prior_scale: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            yearly_seasonality: true,
            weekly_seasonality: true,
            daily_seasonality: false,
            changepoint_prior_scale: default_changepoint_prior_scale(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_changepoint_prior_scale() -> f64 {
    0.05
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_max_periods")]
    pub max_periods: u32,
    #[serde(default = "default_max_concurrent_fits")]
    pub max_concurrent_fits: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_periods: default_max_periods(),
            max_concurrent_fits: default_max_concurrent_fits(),
        }
    }
}

fn default_max_periods() -> u32 {
    3650
}

fn default_max_concurrent_fits() -> usize {
    4
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("HASHCAST")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("dataset.date_formats")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dataset.start_date > self.dataset.end_date {
            anyhow::bail!(
                "dataset.start_date {} is after dataset.end_date {}",
                self.dataset.start_date,
                self.dataset.end_date
            );
        }
        if self.dataset.date_formats.is_empty() {
            anyhow::bail!("dataset.date_formats must name at least one format");
        }
        let scale = self.model.changepoint_prior_scale;
        if !scale.is_finite() || scale <= 0.0 {
            anyhow::bail!(
                "model.changepoint_prior_scale must be positive, got {}",
                self.model.changepoint_prior_scale
            );
        }
        if self.limits.max_periods == 0 || self.limits.max_concurrent_fits == 0 {
            anyhow::bail!("limits.max_periods and limits.max_concurrent_fits must be non-zero");
        }
        Ok(())
    }
}
