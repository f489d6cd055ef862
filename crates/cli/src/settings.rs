use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use web_adapter::HttpSettings;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,

    /// PCGamingWiki API endpoint
    #[serde(default = "default_pcgamingwiki_endpoint")]
    pub pcgamingwiki_endpoint: String,

    /// Base URL of GOG's public wishlist JSON pages
    #[serde(default = "default_gog_embed_base")]
    pub gog_embed_base: String,

    /// Catalogs to check, in report order
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,

    /// Stop at the first catalog that cannot be loaded
    #[serde(default)]
    pub fail_fast: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// One subscription service catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceConfig {
    /// Games matching a PCGamingWiki property condition, e.g. `Ubisoft Plus::true`
    #[serde(rename = "pcgamingwiki")]
    PcGamingWiki { name: String, condition: String },
    Stadia {
        name: String,
        #[serde(default = "default_stadia_url")]
        url: String,
    },
    AppleArcade {
        name: String,
        #[serde(default = "default_apple_arcade_url")]
        url: String,
    },
}

impl ServiceConfig {
    pub fn name(&self) -> &str {
        match self {
            ServiceConfig::PcGamingWiki { name, .. }
            | ServiceConfig::Stadia { name, .. }
            | ServiceConfig::AppleArcade { name, .. } => name,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            pcgamingwiki_endpoint: default_pcgamingwiki_endpoint(),
            gog_embed_base: default_gog_embed_base(),
            services: default_services(),
            fail_fast: false,
            log_level: default_log_level(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment variables.
    ///
    /// Without an explicit path, `wishlist-overlap.{toml,json,yaml}` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("wishlist-overlap").required(false),
        };
        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("WISHLIST_OVERLAP")
                    .separator("__")
                    .try_parsing(true),
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Keeps only the named services, in configured order. Unknown names are an error.
    pub fn select_services(&self, names: &[String]) -> anyhow::Result<Vec<ServiceConfig>> {
        if names.is_empty() {
            return Ok(self.services.clone());
        }
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.services.iter().any(|s| s.name() == n.as_str()))
        {
            let known: Vec<&str> = self.services.iter().map(ServiceConfig::name).collect();
            anyhow::bail!("unknown service '{}', expected one of: {}", unknown, known.join(", "));
        }
        Ok(self
            .services
            .iter()
            .filter(|s| names.iter().any(|n| n == s.name()))
            .cloned()
            .collect())
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            user_agent: self.http.user_agent.clone(),
        }
    }
}

fn default_pcgamingwiki_endpoint() -> String {
    web_adapter::pcgamingwiki::DEFAULT_ENDPOINT.to_string()
}

fn default_gog_embed_base() -> String {
    web_adapter::gog::DEFAULT_EMBED_BASE.to_string()
}

fn default_stadia_url() -> String {
    web_adapter::stadia::DEFAULT_URL.to_string()
}

fn default_apple_arcade_url() -> String {
    web_adapter::apple_arcade::DEFAULT_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    27
}

fn default_connect_timeout_secs() -> u64 {
    3
}

fn default_user_agent() -> String {
    concat!("wishlist-overlap/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn pcgamingwiki(name: &str, condition: &str) -> ServiceConfig {
    ServiceConfig::PcGamingWiki {
        name: name.to_string(),
        condition: condition.to_string(),
    }
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig::AppleArcade {
            name: "Apple Arcade".to_string(),
            url: default_apple_arcade_url(),
        },
        pcgamingwiki("EA Play(Steam)", "EA Play (Steam)::true"),
        pcgamingwiki("EA Play", "EA Play::true"),
        pcgamingwiki("EA Play Pro", "EA Play Pro::true"),
        ServiceConfig::Stadia {
            name: "Stadia".to_string(),
            url: default_stadia_url(),
        },
        pcgamingwiki("Ubisoft+", "Ubisoft Plus::true"),
        pcgamingwiki("Xbox Game Pass for PC(Windows 10)", "Xbox Game Pass for PC::true"),
        pcgamingwiki(
            "Xbox Game Pass for PC(Windows 10) and are Xbox Play Anywhere games",
            "Xbox Game Pass for PC::true|Xbox Play Anywhere::true",
        ),
    ]
}
