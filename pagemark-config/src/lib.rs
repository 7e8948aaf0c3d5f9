//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Every field has a default so the tool runs with no `pagemark.yaml` at
//! all; environment variables use the `PAGEMARK_` prefix with `__` as the
//! section separator (e.g. `PAGEMARK_FETCH__TIMEOUT_SECS=60`). String
//! values may reference `${VAR}` placeholders, expanded recursively after
//! all sources are merged.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Merged, typed configuration for a Pagemark run.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PagemarkConfig {
    pub fetch: FetchConfig,
    pub sanitize: SanitizeConfig,
    pub llm: LlmProvider,
    pub output: OutputConfig,
}

/// Headless-browser fetch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// WebDriver endpoint the driver connects to.
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Quiet window with no new network resources before a page counts as
    /// settled.
    pub settle_ms: u64,
    /// Hard deadline for navigation plus settling.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            settle_ms: 500,
            timeout_secs: 30,
        }
    }
}

/// Which optional masking passes the sanitizer runs.
///
/// The two flags are independent and both default to off.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct SanitizeConfig {
    pub mask_svg: bool,
    pub mask_base64: bool,
}

/// The tag is `provider`; remaining fields are provider-specific.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama {
        model: String,
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,
    },
    Openai {
        model: String,
        auth_token: String,
        #[serde(default = "default_openai_endpoint")]
        endpoint: String,
    },
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Ollama {
            model: "reader-lm:1.5b".to_string(),
            endpoint: default_ollama_endpoint(),
        }
    }
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".into()
}
fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".into()
}

/// Where the rendered Markdown lands and how much of it is echoed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub preview_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.md"),
            preview_chars: 500,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct PagemarkConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PagemarkConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PagemarkConfigLoader {
    /// Start an empty loader; `PAGEMARK_` env overrides are merged on
    /// [`load`](Self::load), after any files.
    ///
    /// ```
    /// use pagemark_config::{LlmProvider, PagemarkConfigLoader};
    ///
    /// let config = PagemarkConfigLoader::new().load().expect("defaults load");
    /// assert!(config.fetch.headless);
    /// assert!(matches!(config.llm, LlmProvider::Ollama { .. }));
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a config file that may be absent; headless deployments can
    /// rely purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use pagemark_config::PagemarkConfigLoader;
    ///
    /// let cfg = PagemarkConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// sanitize:
    ///   mask_svg: true
    /// output:
    ///   path: "page.md"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.sanitize.mask_svg);
    /// assert!(!cfg.sanitize.mask_base64);
    /// assert_eq!(cfg.output.path.to_str(), Some("page.md"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly
    /// typed config.
    ///
    /// `${VAR}` placeholders are expanded (recursively, to a bounded depth)
    /// before the typed structs materialise, so secrets can live in the
    /// environment while the file stays checked in.
    ///
    /// ```
    /// use pagemark_config::{LlmProvider, PagemarkConfigLoader};
    ///
    /// unsafe { std::env::set_var("READER_API_TOKEN", "injected-from-env"); }
    ///
    /// let config = PagemarkConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// llm:
    ///   provider: "openai"
    ///   model: "gpt-4o-mini"
    ///   auth_token: "${READER_API_TOKEN}"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// match &config.llm {
    ///     LlmProvider::Openai { auth_token, endpoint, .. } => {
    ///         assert_eq!(auth_token, "injected-from-env");
    ///         assert_eq!(endpoint, "https://api.openai.com/v1");
    ///     }
    ///     _ => panic!("expected OpenAI configuration"),
    /// }
    ///
    /// unsafe { std::env::remove_var("READER_API_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<PagemarkConfig, ConfigError> {
        // Env is merged last so `PAGEMARK_` variables win over any file.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("PAGEMARK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Merge to a loose value first so env expansion sees every string.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: PagemarkConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use temp_env;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("HOST", Some("local")), ("PORT", Some("9515"))], || {
            let mut v = json!([
                "http://$HOST",
                { "addr": "${HOST}:${PORT}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["http://local", { "addr": "local:9515" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                // BAR references BAZ; FOO references BAR, so two hops.
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles_and_leaves_value_reasonable() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            // Only that the expansion terminates matters here; the depth cap
            // stops the cycle with some ${...} left behind.
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }
}
