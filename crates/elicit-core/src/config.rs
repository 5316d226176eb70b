use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ElicitError, Result};
use crate::types::TaskDefinition;

/// Top-level configuration for an elicitation run.
///
/// Loaded from a TOML file. Each section corresponds to one pipeline
/// concern; components receive their section at construction rather than
/// reading global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElicitConfig {
    pub general: GeneralConfig,
    pub detection: DetectionConfig,
    pub inference: InferenceConfig,
    pub tasks: TasksConfig,
}

impl Default for ElicitConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            detection: DetectionConfig::default(),
            inference: InferenceConfig::default(),
            tasks: TasksConfig::default(),
        }
    }
}

impl ElicitConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ElicitConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field invariants the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.detection.repetitive_click_threshold == 0 {
            return Err(ElicitError::Config(
                "detection.repetitive_click_threshold must be at least 1".to_string(),
            ));
        }
        if !self
            .tasks
            .definitions
            .contains_key(&self.tasks.default_task)
        {
            return Err(ElicitError::Config(format!(
                "tasks.default_task '{}' has no definition",
                self.tasks.default_task
            )));
        }
        for (participant, task_id) in &self.tasks.assignments {
            if !self.tasks.definitions.contains_key(task_id) {
                return Err(ElicitError::Config(format!(
                    "participant '{}' is assigned unknown task '{}'",
                    participant, task_id
                )));
            }
        }
        Ok(())
    }
}

/// Paths and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root directory holding one subdirectory per participant.
    pub dataset_root: String,
    /// Directory for run artifacts (result table or manual guide).
    pub output_dir: String,
    /// Directory for extracted video frames.
    pub frame_cache_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            dataset_root: "./dataset".to_string(),
            output_dir: "./output".to_string(),
            frame_cache_dir: "./output/frames".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Anomaly-detection thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Consecutive same-target clicks that count as repetitive. Must be >= 1.
    pub repetitive_click_threshold: u32,
    /// Event duration strictly above this value flags a long-duration anomaly.
    pub long_duration_threshold_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            repetitive_click_threshold: 3,
            long_duration_threshold_ms: 5000,
        }
    }
}

/// How prompts are delivered to the language model.
///
/// `Api` calls the inference backend directly; `WebUi` skips inference and
/// accumulates a manual-interaction guide a human pastes into a chat UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    Api,
    WebUi,
}

impl FromStr for InteractionMode {
    type Err = ElicitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(InteractionMode::Api),
            "web-ui" | "web_ui" | "webui" => Ok(InteractionMode::WebUi),
            other => Err(ElicitError::Config(format!(
                "unknown interaction mode '{}' (expected 'api' or 'web-ui')",
                other
            ))),
        }
    }
}

/// Language-model backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Delivery mode for assembled prompts.
    pub mode: InteractionMode,
    /// Model identifier sent to the chat-completions endpoint.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            mode: InteractionMode::WebUi,
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Task context resolution.
///
/// Participants are mapped to a task definition through `assignments`,
/// falling back to `default_task` when unassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Task id used for participants without an explicit assignment.
    pub default_task: String,
    /// Task id -> definition.
    pub definitions: HashMap<String, TaskDefinition>,
    /// Participant id -> task id.
    pub assignments: HashMap<String, String>,
}

impl Default for TasksConfig {
    fn default() -> Self {
        let mut definitions = HashMap::new();
        definitions.insert(
            "task1".to_string(),
            TaskDefinition {
                objective: "Upload a courseware file to the system".to_string(),
                expected_actions:
                    "Login -> Navigate to Course -> Click Upload -> Select File -> Confirm"
                        .to_string(),
            },
        );
        definitions.insert(
            "task2".to_string(),
            TaskDefinition {
                objective: "Create a new student account".to_string(),
                expected_actions:
                    "Navigate to User Management -> Click Add User -> Fill Form -> Submit"
                        .to_string(),
            },
        );
        Self {
            default_task: "task1".to_string(),
            definitions,
            assignments: HashMap::new(),
        }
    }
}

impl TasksConfig {
    /// Resolve the task definition for a participant.
    ///
    /// Returns `None` only when the fallback task id itself is undefined,
    /// which `ElicitConfig::validate` rejects up front.
    pub fn resolve(&self, participant_id: &str) -> Option<&TaskDefinition> {
        let task_id = self
            .assignments
            .get(participant_id)
            .unwrap_or(&self.default_task);
        self.definitions.get(task_id)
    }
}
